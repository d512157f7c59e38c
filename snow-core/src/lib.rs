//! Core 1-D snow pile simulation library.
//!
//! Main components:
//! - [`height_field`] — per-column pile and target heights.
//! - [`phases`] — the per-tick passes (growth, melt, relax, smooth).
//! - [`simulator`] — explicit simulation state advanced once per tick.
//! - [`drift`] — falling flakes that deposit into a pile.
//! - [`config`] — tunable parameters and their TOML form.
//! - [`error`] — configuration errors.
//! - [`types`] — pointer samples and column indices.

pub mod config;
pub mod drift;
pub mod error;
pub mod height_field;
pub mod phases;
pub mod simulator;
pub mod types;
