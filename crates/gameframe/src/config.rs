//! # Framework Configuration
//!
//! Loaded once at startup from TOML. Every field has a default, so an empty
//! file is a valid configuration.
//!
//! ```toml
//! [reference]
//! strict_check = true
//!
//! [event]
//! allow_no_handler = true
//! allow_multi_handler = true
//! allow_duplicate_handler = false
//! priority = 100
//!
//! [demo]
//! frames = 3
//! frame_seconds = 0.016
//! producers = 4
//! events_per_producer = 32
//! ```

use std::path::Path;

use gameframe_core::{EventPoolMode, FrameworkError, FrameworkResult};
use serde::Deserialize;

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrameworkConfig {
    /// Reference pool settings.
    pub reference: ReferenceConfig,
    /// Event manager settings.
    pub event: EventConfig,
    /// Demo host settings.
    pub demo: DemoConfig,
}

/// Reference pool settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReferenceConfig {
    /// Verify on release that the exact instance is live.
    pub strict_check: bool,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self { strict_check: true }
    }
}

/// Event manager settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EventConfig {
    /// Drop events nobody subscribed to instead of failing.
    pub allow_no_handler: bool,
    /// Allow several handlers per event id.
    pub allow_multi_handler: bool,
    /// Allow the same handler twice on one event id.
    pub allow_duplicate_handler: bool,
    /// Module priority of the event manager.
    pub priority: i32,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            allow_no_handler: true,
            allow_multi_handler: true,
            allow_duplicate_handler: false,
            priority: 100,
        }
    }
}

impl EventConfig {
    /// The dispatch policy these flags describe.
    #[must_use]
    pub fn mode(&self) -> EventPoolMode {
        let mut mode = EventPoolMode::empty();
        mode.set(EventPoolMode::ALLOW_NO_HANDLER, self.allow_no_handler);
        mode.set(EventPoolMode::ALLOW_MULTI_HANDLER, self.allow_multi_handler);
        mode.set(EventPoolMode::ALLOW_DUPLICATE_HANDLER, self.allow_duplicate_handler);
        mode
    }
}

/// Demo host settings.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig {
    /// Frames to run before shutting down.
    pub frames: u32,
    /// Logical seconds per frame.
    pub frame_seconds: f32,
    /// Producer threads firing events.
    pub producers: usize,
    /// Events each producer fires.
    pub events_per_producer: usize,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            frames: 3,
            frame_seconds: 1.0 / 60.0,
            producers: 4,
            events_per_producer: 32,
        }
    }
}

impl FrameworkConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`FrameworkError::InvalidConfig`] on malformed TOML, unknown
    /// keys or out-of-range values.
    pub fn from_toml_str(source: &str) -> FrameworkResult<Self> {
        let config: Self = toml::from_str(source)
            .map_err(|e| FrameworkError::InvalidConfig(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`FrameworkError::InvalidConfig`] if the file cannot be read or
    /// does not parse.
    pub fn from_file(path: impl AsRef<Path>) -> FrameworkResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            FrameworkError::InvalidConfig(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&source)
    }

    /// Checks value ranges serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`FrameworkError::InvalidConfig`] for a non-positive frame time.
    pub fn validate(&self) -> FrameworkResult<()> {
        if self.demo.frame_seconds.is_nan() || self.demo.frame_seconds <= 0.0 {
            return Err(FrameworkError::InvalidConfig(format!(
                "demo.frame_seconds must be positive, got {}",
                self.demo.frame_seconds
            )));
        }
        Ok(())
    }
}
