//! Dependency-free JSON encoding for report payloads.

pub mod encoder;
pub mod value;

pub use encoder::{
    IoSink, to_string, to_vec, write_array, write_entries, write_number, write_object,
    write_object_io, write_string, write_value,
};
pub use value::{Number, Object, Value};
