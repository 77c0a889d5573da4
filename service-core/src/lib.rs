//! service-core: Shared infrastructure for the student services workspace.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;
pub mod registry;
