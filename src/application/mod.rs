pub mod bootstrap;
pub mod reporting;
