// externally visible interfaces
pub mod api;
pub mod config;
pub mod error;
pub mod hash;
pub mod prompt;
