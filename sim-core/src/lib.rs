//! Core 3-D diffusion-limited aggregation library.
//!
//! Main components:
//! - [`particle`] — particle records and render snapshots.
//! - [`store`] — the owned particle list, seeding and nearest-cluster lookup.
//! - [`aggregation`] — the per-tick update: Brownian motion, bounce,
//!   attraction and attachment.
//! - [`simulation`] — a seeded driver value wrapping store, config and RNG.
//! - [`config`] — tunable simulation parameters.
//! - [`error`] — configuration errors.
//! - [`types`] — shared type aliases and IDs.

pub mod aggregation;
pub mod config;
pub mod error;
pub mod particle;
pub mod simulation;
pub mod store;
pub mod types;

pub use config::Config;
pub use error::ConfigError;
pub use particle::{Particle, Renderable};
pub use simulation::Simulation;
pub use store::{ClusterStats, ParticleStore};
