//! Configuration module for the statistics beacon.
//!
//! The library never reads the environment or the filesystem; the embedding
//! host builds a `ReporterConfig` (directly, or from a TOML fragment of its
//! own config file) and hands it over.

mod reporter_config;

pub use reporter_config::ReporterConfig;
