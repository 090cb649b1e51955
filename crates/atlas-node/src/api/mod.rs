pub mod config;
pub mod error;
pub mod protocols;
pub mod types;
