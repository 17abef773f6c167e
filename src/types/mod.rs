//! Core types for hybrid-lm.

pub mod capabilities;
pub mod message;
pub mod options;

pub use capabilities::*;
pub use message::*;
pub use options::*;
