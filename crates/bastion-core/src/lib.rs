//! Core types and definitions for the BASTION tower simulation.
//!
//! This crate defines the vocabulary shared across the other crates:
//! components, weapon definitions, commands, state snapshots, events,
//! configuration errors and constants. It has no dependency on any runtime.

pub mod commands;
pub mod components;
pub mod constants;
pub mod definitions;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;
