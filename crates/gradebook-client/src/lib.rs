//! gradebook-client — Roster service implementations and configuration.
//!
//! Implements the `RosterService` trait over HTTP against the student-record
//! API, plus an in-memory service for tests and offline use.

pub mod config;
pub mod error;
pub mod http;
pub mod mock;

pub use config::{create_service, load_config_from, GradebookConfig};
pub use error::ServiceError;
pub use http::HttpRosterService;
pub use mock::InMemoryRosterService;
