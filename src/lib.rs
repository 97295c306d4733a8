//! Simulated upload queue for a cloud storage console, plus the desktop
//! panel and headless runner that drive it.

pub mod app;
pub mod config;
pub mod error;
pub mod upload;
pub mod utils;

pub use error::{Result, UploaderError};
