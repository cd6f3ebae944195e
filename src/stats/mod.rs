pub mod cache;
pub mod models;
mod parser;
pub mod query;

// Re-export commonly used types
pub use cache::StatsCache;
pub use models::{InterfaceSnapshot, PeerStat, StatsSnapshot};
pub use query::{Clock, StatusQuery, SystemClock, WgDump};
