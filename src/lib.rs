//! In-memory user CRUD service.
//!
//! A single process-wide [`store::UserStore`] holds user records keyed by
//! id behind one exclusive lock. The HTTP layer in [`api`] maps requests
//! onto exactly one store call each:
//!
//! ```text
//! GET    /users      -> get_all      200 [..]
//! GET    /users/:id  -> get_one      200 | 404
//! POST   /users      -> put          201 | 400
//! PUT    /users/:id  -> replace      200 | 400 | 404
//! DELETE /users/:id  -> delete       204 | 404
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Process and HTTP error types
//! - [`store`]: User record type and the guarded store
//! - [`api`]: HTTP routes and handlers
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod store;
pub mod utils;

pub use config::Config;
pub use error::{ApiError, Result, ServiceError};
