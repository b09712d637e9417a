//! In-memory user store.
//!
//! This module handles:
//! - The user record type and its wire shape
//! - The lock-guarded mapping from user id to record

pub mod memory;
pub mod types;

pub use memory::UserStore;
pub use types::User;
