//! Engine configuration.
//!
//! Provides configurable parameters for the viewport, frame pacing, the demo
//! run and every particle system. Configuration can be loaded from and saved
//! to a TOML file.

use serde::{Deserialize, Serialize};
use stardrift_common::{ConfigError, StardriftResult};
use stardrift_gameplay::CameraConfig;
use stardrift_kernel::{BurstConfig, PulseConfig, StarfieldConfig, TrailConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Configuration file name.
const CONFIG_FILE: &str = "stardrift.toml";

/// What happens to live trail particles while trails are switched off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisabledTrailPolicy {
    /// Particles stay exactly as they are until trails come back
    #[default]
    Freeze,
    /// Particles keep aging and fading, but nothing new is emitted
    Decay,
}

/// Engine configuration parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Viewport Settings ===
    /// Viewport width in pixels
    pub window_width: u32,
    /// Viewport height in pixels
    pub window_height: u32,

    // === Frame Settings ===
    /// Target frames per second
    pub target_fps: u32,
    /// Sleep between frames to run at the target rate
    pub realtime: bool,
    /// Frames the demo runs before tearing down
    pub demo_frames: u32,
    /// Seed for every random stream (None = random)
    pub seed: Option<u64>,

    // === Trail Settings ===
    /// Whether trails emit at startup
    pub trails_enabled: bool,
    /// Behavior of live trail particles while trails are off
    pub disabled_trail_policy: DisabledTrailPolicy,

    // === Subsystems ===
    /// Trail emitters
    pub trail: TrailConfig,
    /// Click bursts
    pub burst: BurstConfig,
    /// Click pulses
    pub pulse: PulseConfig,
    /// Background stars
    pub starfield: StarfieldConfig,
    /// Camera
    pub camera: CameraConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            // Viewport
            window_width: 1280,
            window_height: 720,

            // Frames
            target_fps: 60,
            realtime: false,
            demo_frames: 1800,
            seed: None,

            // Trails
            trails_enabled: true,
            disabled_trail_policy: DisabledTrailPolicy::Freeze,

            trail: TrailConfig::default(),
            burst: BurstConfig::default(),
            pulse: PulseConfig::default(),
            starfield: StarfieldConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from the default file location.
    /// Returns default config if file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(Self::config_path())
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match Self::read_from(path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("{e}, using defaults");
                Self::default()
            },
        }
    }

    /// Load a config file the user named explicitly.
    ///
    /// Unlike [`Self::load_from`], a missing or invalid file is an error.
    pub fn load_required<P: AsRef<Path>>(path: P) -> StardriftResult<Self> {
        let path = path.as_ref();
        let config = Self::read_from(path)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Read and parse a config file, reporting any failure.
    pub fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        fs::write(path, contents)?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn config_path() -> PathBuf {
        if let Some(config_dir) = dirs_config_path() {
            config_dir.join("stardrift").join(CONFIG_FILE)
        } else {
            // Fall back to current directory
            PathBuf::from(CONFIG_FILE)
        }
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        // Viewport
        self.window_width = self.window_width.clamp(320, 7680);
        self.window_height = self.window_height.clamp(240, 4320);

        // Frames
        self.target_fps = self.target_fps.clamp(15, 240);

        self.trail.validate();
        self.burst.validate();
        self.pulse.validate();
        self.starfield.validate();
        self.camera.validate();
    }

    /// Seed to use for this run, drawing a fresh one if none is configured.
    #[must_use]
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| fastrand::u64(..))
    }
}

/// Get platform-specific config directory.
fn dirs_config_path() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join("Library/Application Support"))
    }

    #[cfg(target_os = "windows")]
    {
        std::env::var("APPDATA").ok().map(PathBuf::from)
    }

    #[cfg(target_os = "linux")]
    {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var("HOME")
                    .ok()
                    .map(|h| PathBuf::from(h).join(".config"))
            })
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
    {
        None
    }
}
