use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SketchError};
use crate::fractal::DEFAULT_MAX_DEPTH;

/// Largest canvas side accepted, in pixels.
pub const MAX_SIDE: usize = 16_384;

/// Scene parameters. Every field has a default, so a config file only
/// needs to name what it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    pub width: usize,
    pub height: usize,
    pub rows: usize,
    pub per_row: usize,
    pub fps: usize,
    pub background: u8,
    pub max_depth: u32,
    /// Seed for the animation generator; `None` seeds from entropy.
    pub seed: Option<u64>,
    pub image: Option<PathBuf>,
}

impl Default for SketchConfig {
    fn default() -> Self {
        SketchConfig {
            width: 800,
            height: 800,
            rows: 3,
            per_row: 11,
            fps: 60,
            background: 245,
            max_depth: DEFAULT_MAX_DEPTH,
            seed: None,
            image: None,
        }
    }
}

impl SketchConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config: SketchConfig = serde_json::from_str(&text)
            .map_err(|source| SketchError::ConfigParse { path: path.to_path_buf(), source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SketchError::Config(format!(
                "canvas must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > MAX_SIDE || self.height > MAX_SIDE {
            return Err(SketchError::Config(format!(
                "canvas {}x{} exceeds the {MAX_SIDE}px side limit",
                self.width, self.height
            )));
        }
        if self.rows == 0 || self.per_row == 0 {
            return Err(SketchError::Config("rows and per_row must be at least 1".into()));
        }
        if self.fps == 0 {
            return Err(SketchError::Config("fps must be at least 1".into()));
        }
        Ok(())
    }
}
