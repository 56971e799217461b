pub mod errors;
pub mod json;
pub mod ports;
pub mod snapshot;
