pub mod args;
pub mod blob;
pub mod commands;
mod config;
mod error;
pub mod model;
pub mod query;
pub mod store;
pub mod sync;
#[cfg(test)]
mod test;
mod utils;
pub mod validate;

pub use config::{Config, SyncSettings};
pub use error::Error;
pub use error::Result;
