pub mod auth;
pub mod config;
pub mod http;
pub mod jobs;
pub mod tools;

pub use config::ServerConfig;
