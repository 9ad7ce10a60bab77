//! HTTP API: routing, request parsing and JSON mapping of dashboard reports.

pub mod app;
pub mod middleware;
