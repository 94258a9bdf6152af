//! Presentation layer handling the kiosk screen and keyboard.
//!
//! This module draws the identification and ballot panels with ratatui and
//! maps crossterm key events onto controller operations.

pub mod ui;
pub mod input;

pub use ui::*;
pub use input::*;
