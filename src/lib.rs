pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod gallery;
pub mod handlers;
pub mod server;
pub mod settings;
