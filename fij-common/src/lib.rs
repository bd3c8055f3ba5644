//! # fi-journal common library
//!
//! Shared code for the fixed-income journal service:
//! - Database bootstrap, schema sync and migrations
//! - Data access for instruments, notes and study notes
//! - Configuration resolution
//! - Session token derivation for the password gate

pub mod auth;
pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
