pub mod config;
pub mod error;
pub mod loader;
pub mod scoring;
pub mod server;

pub use error::{LindyError, Result};
