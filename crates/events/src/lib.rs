//! Synthetic analytics events
//!
//! This crate fabricates the "click event" payloads that the traffic engine
//! fires at a target collector. Records are plain data: they are built once
//! per dispatch by [`synthesize`], encoded, sent and dropped.

pub mod catalog;
pub mod record;
pub mod synth;

pub use record::*;
pub use synth::*;
