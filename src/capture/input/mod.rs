//! Mouse input types
//!
//! [`MouseInput`] is what an input hook reports; [`Event`] is what ends up in
//! a recording once the input has been timestamped and sampled.

pub mod types;

pub use types::{Event, MouseButton, MouseInput};
