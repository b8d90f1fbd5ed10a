pub mod archive;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod output;
pub mod post;
pub mod twitter;

pub use error::{Error, Result};
