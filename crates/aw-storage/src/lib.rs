//! aw-storage - Storage library for arc-wrap
//!
//! This crate provides file system access for the wrapper: its own settings,
//! the config documents it reconciles, and the last-sync stamp.

pub mod documents;
pub mod settings;
pub mod stamp;

pub use documents::DocumentStore;
pub use settings::{settings_path, Settings};
pub use stamp::SyncStamp;
