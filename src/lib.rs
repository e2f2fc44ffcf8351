pub mod config;
pub mod constants;
pub mod domain;
pub mod error;
pub mod logging;
pub mod pipeline;

// Layered boundaries: use cases talk to the registries through ports
pub mod app;
pub mod infra;
