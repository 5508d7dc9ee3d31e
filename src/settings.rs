//! Session settings
//!
//! Handed to a level session at construction instead of living in a global
//! options object. Loaded by the front end from whatever storage it uses.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How raw movement input is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum InputMode {
    /// Arrow keys, WASD or on-screen direction buttons
    #[default]
    Keyboard,
    /// Device tilt
    Accelerometer,
}

impl InputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputMode::Keyboard => "Keyboard",
            InputMode::Accelerometer => "Accelerometer",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "keyboard" | "keys" | "pointer" => Some(InputMode::Keyboard),
            "accelerometer" | "tilt" => Some(InputMode::Accelerometer),
            _ => None,
        }
    }
}

/// Physical properties of the player body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorSettings {
    /// Circle radius (world units)
    pub radius: f32,
    pub density: f32,
    pub friction: f32,
    /// Bounciness (0 = none, 1 = perfect)
    pub restitution: f32,
}

impl Default for ActorSettings {
    fn default() -> Self {
        Self {
            radius: 0.35,
            density: 1.0,
            friction: 0.2,
            restitution: 0.1,
        }
    }
}

/// Everything a level session needs from the outside world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Source pixels to world units
    pub scale: f32,
    pub input_mode: InputMode,
    /// When false, no `SoundRequested` events are emitted
    pub sound_enabled: bool,
    pub actor: ActorSettings,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            // 32px tiles become one world unit
            scale: 1.0 / 32.0,
            input_mode: InputMode::Keyboard,
            sound_enabled: true,
            actor: ActorSettings::default(),
        }
    }
}

impl SessionConfig {
    /// Parse settings from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(ConfigError::InvalidScale(self.scale));
        }
        let actor = &self.actor;
        if !actor.radius.is_finite() || actor.radius <= 0.0 {
            return Err(ConfigError::InvalidSetting {
                field: "actor.radius",
                reason: "must be positive",
            });
        }
        if !actor.density.is_finite() || actor.density < 0.0 {
            return Err(ConfigError::InvalidSetting {
                field: "actor.density",
                reason: "must not be negative",
            });
        }
        if !actor.friction.is_finite() || actor.friction < 0.0 {
            return Err(ConfigError::InvalidSetting {
                field: "actor.friction",
                reason: "must not be negative",
            });
        }
        if !(0.0..=1.0).contains(&actor.restitution) {
            return Err(ConfigError::InvalidSetting {
                field: "actor.restitution",
                reason: "must be within 0..=1",
            });
        }
        Ok(())
    }
}
