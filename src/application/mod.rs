//! Application layer: the kiosk controller and its message types.
//!
//! This module sits between the domain and the outside world. It tracks
//! which screen is up, what the voter has entered, and which requests are
//! still worth waiting for.

pub mod effects;
pub mod state;

pub use effects::*;
pub use state::*;
