//! Embeddable core library for zonefix.
//!
//! Provides a clap-free, I/O-abstracted entry point for processing a batch of workouts.
//!
//! # Port traits
//!
//! All I/O is abstracted behind port traits in [`ports`]:
//! - [`SessionPort`](ports::SessionPort): authenticate against the workout service
//! - [`WorkoutStore`](ports::WorkoutStore): list, fetch, and push workouts
//! - [`WritePort`](ports::WritePort): write report artifacts
//!
//! The [`adapters`] module provides filesystem-backed and in-memory implementations.
//!
//! # Entry points
//!
//! - [`run_process`](pipeline::run_process): classify, annotate, and push every listed workout
//! - [`run_list`](pipeline::run_list): list workouts without touching them

pub mod adapters;
pub mod pipeline;
pub mod ports;
pub mod settings;

// Re-export the domain policy so callers don't need zonefix-domain directly.
pub use zonefix_domain::ZonePolicy;
