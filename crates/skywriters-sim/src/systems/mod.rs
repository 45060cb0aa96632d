//! ECS systems that operate on the simulation world each step.
//!
//! Systems are pure functions that take `&mut World` (or `&World` for read-only).
//! They do not own state. All state lives in components or is passed in.

pub mod cleanup;
pub mod lifecycle;
pub mod snapshot;
