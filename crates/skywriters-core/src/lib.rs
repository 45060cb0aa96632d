//! Core types and definitions for the SkyWriters stage simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geometry helpers, components, configuration, errors, events, the
//! diagnostic snapshot and the weighted selector. It has no dependency on
//! the ECS or any runtime framework.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;
pub mod weighted;
