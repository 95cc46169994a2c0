pub mod app;
pub mod builtin_providers;
pub mod config;
pub mod conversation;
pub mod error;
pub mod message;
pub mod mode;
pub mod persona;
pub mod personality;
pub mod provider;
pub mod providers;
pub mod router;
pub mod session;
