pub mod config;
pub mod http;
pub mod names;
pub mod stats;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Result<T> = std::result::Result<T, Error>;
