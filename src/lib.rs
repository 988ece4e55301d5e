// Library root: re-exports all modules so integration tests and external
// consumers can access the crate's public API.

pub mod api;
pub mod app;
pub mod cache;
pub mod config;
pub mod mutation;
pub mod protocol;
pub mod sport;
pub mod tui;
