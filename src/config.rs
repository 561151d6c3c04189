use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::Cli;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config")]
    Parse(#[from] serde_json::Error),
    #[error("window size must be non-zero, got {width}x{height}")]
    EmptyWindow { width: u32, height: u32 },
    #[error("sphere detail {detail} is above the limit of {max}")]
    DetailTooHigh { detail: u32, max: u32 },
}

/// Highest icosahedron subdivision accepted for the earth sphere
pub const MAX_DETAIL: u32 = 32;

/// Which demo scene to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemoKind {
    #[default]
    Cube,
    Icosahedron,
    Earth,
    Wormhole,
}

impl DemoKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cube => "cube",
            Self::Icosahedron => "icosahedron",
            Self::Earth => "earth",
            Self::Wormhole => "wormhole",
        }
    }
}

/// Startup options; every field is optional in a config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig {
    pub demo: DemoKind,
    pub width: u32,
    pub height: u32,
    /// Seed for star positions and box placement
    pub seed: u64,
    /// Earth sphere subdivision level
    pub detail: u32,
    pub stars: usize,
    /// Skip the FPS readout in the window title
    pub no_ui: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            demo: DemoKind::default(),
            width: 1280,
            height: 720,
            seed: 0,
            detail: 6,
            stars: 2000,
            no_ui: false,
        }
    }
}

impl DemoConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Config file (if given) with command line flags layered on top
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(demo) = cli.demo {
            config.demo = demo;
        }
        if let Some(width) = cli.width {
            config.width = width;
        }
        if let Some(height) = cli.height {
            config.height = height;
        }
        if let Some(seed) = cli.seed {
            config.seed = seed;
        }
        if let Some(detail) = cli.detail {
            config.detail = detail;
        }
        if let Some(stars) = cli.stars {
            config.stars = stars;
        }
        config.no_ui |= cli.no_ui;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyWindow {
                width: self.width,
                height: self.height,
            });
        }
        if self.detail > MAX_DETAIL {
            return Err(ConfigError::DetailTooHigh {
                detail: self.detail,
                max: MAX_DETAIL,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = DemoConfig::from_json(r#"{ "demo": "wormhole", "seed": 9 }"#).unwrap();
        assert_eq!(config.demo, DemoKind::Wormhole);
        assert_eq!(config.seed, 9);
        assert_eq!(config.width, 1280);
        assert_eq!(config.stars, 2000);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = DemoConfig::from_json(r#"{ "colour": "red" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_zero_size_rejected() {
        let err = DemoConfig::from_json(r#"{ "width": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyWindow { width: 0, .. }));
    }

    #[test]
    fn test_detail_limit() {
        let err = DemoConfig::from_json(r#"{ "detail": 64 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::DetailTooHigh { detail: 64, .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = DemoConfig::load(Path::new("/nonexistent/demo.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_cli_overrides_defaults() {
        let cli = Cli::parse_from(["scene-demos", "--demo", "earth", "--width", "640", "--no-ui"]);
        let config = DemoConfig::from_cli(&cli).unwrap();
        assert_eq!(config.demo, DemoKind::Earth);
        assert_eq!(config.width, 640);
        assert_eq!(config.height, 720);
        assert!(config.no_ui);
    }

    #[test]
    fn test_kind_names_match_cli_values() {
        for kind in DemoKind::value_variants() {
            let value = kind.to_possible_value().unwrap();
            assert_eq!(value.get_name(), kind.name());
        }
    }
}
