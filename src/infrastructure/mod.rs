pub mod http_transport;
pub mod mock;
pub mod observability;
pub mod scheduler;
