pub mod classifier;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod error;
pub mod init;
pub mod models;
pub mod server;
pub mod services;

pub use error::JarError;
