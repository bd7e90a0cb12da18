// Library surface for the binary and integration tests.
pub mod config;
pub mod defaults;
pub mod distance;
pub mod error;
pub mod field;
pub mod kick;
pub mod manager;
pub mod render;
pub mod report;
pub mod session;
pub mod store;

pub use error::{KickError, Result};
pub use kick::{KickFields, KickRecord, KickType};
pub use manager::SessionManager;
