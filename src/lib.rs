//! serial-auth - Issue, list and redeem limited-use serial codes
//!
//! This library provides the HTTP handlers, middleware chain and SQLite store
//! behind the serial-auth server.

pub mod code;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod models;
