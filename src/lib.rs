//! Banter is a terminal chatbot for Claude and ChatGPT with switchable
//! personalities and multi-friend group chats.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the conversation state: personas, per-persona histories,
//!   the dispatch mode, reply routing, provider clients and configuration.
//! - [`commands`] implements slash-command parsing and execution used by the
//!   chat loop.
//! - [`api`] defines the request and response payloads of both provider APIs.
//! - [`server`] exposes the same session over HTTP for the web page.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which resolves credentials, builds a
//! [`core::app::App`] and dispatches into [`cli::chat`], [`cli::say`] or
//! [`server::run`].

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod server;
pub mod utils;
