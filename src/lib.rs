//! urna - Terminal Ballot Box Library
//!
//! Controller, domain model and I/O ports for a two-digit ballot-box kiosk.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
