//! Finite state machines for the SkyWriters stage.
//!
//! A machine tracks which of a closed set of states it is in and owns a
//! timeline of delayed transitions keyed by simulation time. Behaviour is
//! supplied per call through [`fsm::StateBehavior`], so the machine itself is
//! plain data that can live inside an ECS component.

pub mod fsm;
pub mod timeline;

pub use fsm::{DelayGuard, Directive, FiniteStateMachine, StateBehavior, StateChange};
pub use timeline::Timeline;

#[cfg(test)]
mod tests;
