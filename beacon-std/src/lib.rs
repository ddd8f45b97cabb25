//! # beacon-std
//!
//! Standard implementations for the Beacon event framework.
//!
//! This crate provides:
//! - **Host embedding**: [`EventTarget`]
//! - **Declarative wiring**: [`AutoListen`], [`AutoListener`], [`wire`]
//! - **Standard listeners**: Logging, Filter
//! - **Testing utilities**: [`testing`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core types
pub use beacon_core;

// Modules
pub mod autowire;
pub mod listeners;
pub mod target;
pub mod testing;

pub use autowire::{AutoHandler, AutoListen, AutoListener, decode_marked_name, wire};
pub use target::EventTarget;
