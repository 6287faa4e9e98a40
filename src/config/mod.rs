//! Configuration module for rendering
//!
//! This module provides the `RenderConfig` struct and its builder for
//! configuring viewport metrics and pass tuning with validation and
//! sensible defaults.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod types;

// Re-exports for public API
pub use builder::RenderConfigBuilder;
pub use types::RenderConfig;
