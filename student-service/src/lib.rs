//! student-service: HTTP API for student lookups.
pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
