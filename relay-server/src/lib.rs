// Library interface for the cobot relay server
// Exposes modules for integration testing

pub mod api;
pub mod bootstrap;
pub mod broadcaster;
pub mod config;
pub mod logging;
