// Utility functions

pub mod data_uri;

pub use data_uri::{build_data_uri, encode_uri_component};
