//! User directory: a MongoDB-backed user API and the client that drives it.

pub mod api;
pub mod client;
pub mod config;
pub mod database;
pub mod middleware;
pub mod models;
pub mod utils;
