//! Goal Tracker Core - Domain entities, services, and traits.
//!
//! This crate contains the core business logic for Goal Tracker.
//! It is database-agnostic and AI-provider-agnostic: persistence is
//! implemented by the `storage-sqlite` crate and progress synthesis by the
//! `ai` crate, both through the traits defined here.

pub mod constants;
pub mod errors;
pub mod goals;
pub mod progress;
pub mod utils;

#[cfg(test)]
mod test_support;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
