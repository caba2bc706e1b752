//! Shared test fixtures for the autopypath workspace.
//!
//! A dev-dependency only; never published.
//!
//! # Modules
//!
//! - [`markers`]: version-control marker directories
//! - [`repo`]: [`TestRepo`](repo::TestRepo) builder for on-disk project layouts

pub mod markers;
pub mod repo;

pub use repo::TestRepo;
