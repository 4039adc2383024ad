//! SQLite storage implementation for progress updates.

mod model;
mod repository;

pub use model::{NewProgressUpdateDB, ProgressUpdateDB};
pub use repository::ProgressRepository;
