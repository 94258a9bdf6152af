pub mod models;
pub mod ballot;
pub mod errors;

pub use models::*;
pub use ballot::*;
pub use errors::*;
