//! Configuration system
//!
//! `EngineConfig` gathers the tunables the scene core reads at construction
//! time. Every section defaults independently, so a file only needs the
//! keys it wants to change.

pub use serde::{Deserialize, Serialize};

use std::path::Path;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => {
                toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            ConfigFormat::Ron => {
                ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
            }
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
            ConfigFormat::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };

        std::fs::write(path, contents)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Toml,
    Ron,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Values that parse but cannot be used
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Engine-wide configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fixed entity capacity of the world
    pub max_entities: usize,
    /// Camera defaults
    pub camera: CameraConfig,
    /// Follow camera behaviour
    pub follow: FollowConfig,
    /// WASD fly controller
    pub controller: ControllerConfig,
    /// Orbit controller
    pub orbit: OrbitConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_entities: 10_000,
            camera: CameraConfig::default(),
            follow: FollowConfig::default(),
            controller: ControllerConfig::default(),
            orbit: OrbitConfig::default(),
        }
    }
}

impl Config for EngineConfig {}

impl EngineConfig {
    /// Load and validate in one step
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Self::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_entities == 0 {
            return Err(ConfigError::Invalid("max_entities must be greater than zero".into()));
        }
        if u32::try_from(self.max_entities).is_err() {
            return Err(ConfigError::Invalid(format!(
                "max_entities {} does not fit a 32-bit entity index",
                self.max_entities
            )));
        }
        if self.camera.near <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "camera.near must be positive, got {}",
                self.camera.near
            )));
        }
        if self.camera.far <= self.camera.near {
            return Err(ConfigError::Invalid(format!(
                "camera.far ({}) must exceed camera.near ({})",
                self.camera.far, self.camera.near
            )));
        }
        if self.orbit.min_distance > self.orbit.max_distance {
            return Err(ConfigError::Invalid(format!(
                "orbit.min_distance ({}) exceeds orbit.max_distance ({})",
                self.orbit.min_distance, self.orbit.max_distance
            )));
        }
        Ok(())
    }
}

/// Camera defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Use an orthographic projection instead of perspective
    pub orthographic: bool,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Vertical extent of orthographic cameras
    pub ortho_size: f32,
    /// Clear color (RGB)
    pub clear_color: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            orthographic: false,
            fov_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
            ortho_size: 5.0,
            clear_color: [0.2, 0.3, 0.3],
        }
    }
}

/// Follow camera behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowConfig {
    /// Offset from the target, in world space
    pub offset: [f32; 3],
    /// Aim the camera at the target after moving
    pub look_at_target: bool,
}

impl Default for FollowConfig {
    fn default() -> Self {
        Self {
            offset: [0.0, 2.0, -5.0],
            look_at_target: true,
        }
    }
}

/// WASD fly controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Units per second
    pub move_speed: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self { move_speed: 5.0 }
    }
}

/// Orbit controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    /// Starting horizontal angle in degrees
    pub horizontal_angle: f32,
    /// Starting vertical angle in degrees
    pub vertical_angle: f32,
    /// Starting distance from the focus point
    pub distance: f32,
    /// Focus point panning speed (units per second)
    pub pan_speed: f32,
    /// Degrees per pixel of drag, before the 0.1 damping factor
    pub rotation_speed: f32,
    /// Distance per scroll step
    pub zoom_speed: f32,
    /// Closest zoom
    pub min_distance: f32,
    /// Farthest zoom
    pub max_distance: f32,
    /// Vertical angle clamp, in degrees either side of the horizon
    pub vertical_limit: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            horizontal_angle: 0.0,
            vertical_angle: 30.0,
            distance: 5.0,
            pan_speed: 2.0,
            rotation_speed: 0.5,
            zoom_speed: 0.5,
            min_distance: 1.0,
            max_distance: 20.0,
            vertical_limit: 89.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("scene_engine_{}_{name}", std::process::id()))
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
            max_entities = 256

            [camera]
            fov_degrees = 75.0

            [orbit]
            max_distance = 50.0
            "#,
        )
        .unwrap();

        assert_eq!(config.max_entities, 256);
        assert_eq!(config.camera.fov_degrees, 75.0);
        assert_eq!(config.camera.far, 1000.0);
        assert_eq!(config.orbit.max_distance, 50.0);
        assert_eq!(config.orbit.min_distance, 1.0);
        assert_eq!(config.follow, FollowConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_ron_parses() {
        let config: EngineConfig =
            ron::from_str("(max_entities: 64, controller: (move_speed: 12.0))").unwrap();
        assert_eq!(config.max_entities, 64);
        assert_eq!(config.controller.move_speed, 12.0);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = EngineConfig::default();
        config.max_entities = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = EngineConfig::default();
        config.camera.near = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = EngineConfig::default();
        config.camera.far = config.camera.near;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = EngineConfig::default();
        config.orbit.min_distance = 30.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let mut config = EngineConfig::default();
        config.max_entities = 512;
        config.follow.offset = [1.0, 3.0, -7.0];

        for ext in ["toml", "ron"] {
            let path = temp_path(&format!("roundtrip.{ext}"));
            config.save_to_file(&path).unwrap();
            let loaded = EngineConfig::load(&path).unwrap();
            std::fs::remove_file(&path).ok();
            assert_eq!(loaded, config);
        }
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let path = temp_path("settings.json");
        assert!(matches!(
            EngineConfig::default().save_to_file(&path),
            Err(ConfigError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            EngineConfig::load_from_file(temp_path("missing.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}
