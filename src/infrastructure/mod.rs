//! Infrastructure layer providing the kiosk's connections to the world.
//!
//! This module contains the HTTP client for the voting server, the camera
//! and sound ports, the effect dispatcher, configuration and logging.

pub mod api;
pub mod camera;
pub mod chime;
pub mod dispatcher;
pub mod logging;
pub mod settings;

pub use api::*;
pub use camera::*;
pub use chime::*;
pub use dispatcher::*;
pub use logging::*;
pub use settings::*;
