//! Shared helpers

pub mod yaml;

pub use yaml::{read_yaml, set_path, write_yaml};
