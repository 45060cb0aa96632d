//! Stage simulation for SkyWriters.
//!
//! Owns the hecs ECS world and decides which actors exist on the stage:
//! the spawn ring and its wind-driven arcs, capacity-gated admission,
//! per-actor lifecycles and wrap-around respawn. Produces `StageSnapshot`s
//! for presentation layers and tests.

pub mod engine;
pub mod error;
pub mod factory;
pub mod lifecycle;
pub mod orchestrator;
pub mod regions;
pub mod registry;
pub mod ring;
pub mod spawn_point;
pub mod systems;
pub mod wind;

pub use engine::SimulationEngine;
pub use error::{AdmissionError, FactoryError};
pub use skywriters_core as core;
