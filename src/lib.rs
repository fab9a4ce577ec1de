pub mod config;
pub mod error;
pub mod generation;
pub mod inference;
pub mod normalizer;
pub mod server;

pub use error::{Error, Result};
