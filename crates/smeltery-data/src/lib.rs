//! Data-file loading for the smeltery engine.
//!
//! A data directory holds `items.*`, `recipes.*`, and an optional
//! `smeltery.*` settings file, each in RON, TOML, or JSON.

pub mod loader;
pub mod schema;

pub use loader::{DataLoadError, SmelteryData, load_smeltery_data};
