pub mod data;
pub mod io;
pub mod orchestrator;

#[cfg(test)]
pub mod tests;

pub use data::{Config, FriendConfig};
pub use io::ConfigError;
pub use orchestrator::ConfigOrchestrator;
