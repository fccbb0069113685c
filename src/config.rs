//! Fixture catalog configuration

use serde::{Deserialize, Serialize};

use crate::formats::{ImageFormat, MeshFormat};
use crate::types::{FixtureError, FixtureResult};

/// Named size tiers of the raster matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    Tiny,
    Small,
    Medium,
    Large,
    Ultra,
}

impl SizeClass {
    pub const ALL: [Self; 5] = [Self::Tiny, Self::Small, Self::Medium, Self::Large, Self::Ultra];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Tiny => "tiny",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::Ultra => "ultra",
        }
    }

    /// Default (width, height) for this tier
    pub const fn dimensions(self) -> (u32, u32) {
        match self {
            Self::Tiny => (32, 32),
            Self::Small => (128, 128),
            Self::Medium => (512, 512),
            Self::Large => (1024, 1024),
            Self::Ultra => (2048, 2048),
        }
    }
}

/// Named quality tiers for lossy and lossless codecs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityLevel {
    Low,
    Medium,
    High,
    Lossless,
}

impl QualityLevel {
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Lossless];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Lossless => "lossless",
        }
    }

    /// Codec quality, `None` meaning exact (lossless) encoding
    pub const fn quality(self) -> Option<u8> {
        match self {
            Self::Low => Some(30),
            Self::Medium => Some(75),
            Self::High => Some(95),
            Self::Lossless => None,
        }
    }
}

/// One row of the size table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeEntry {
    pub class: SizeClass,
    pub width: u32,
    pub height: u32,
}

/// One row of the quality table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityEntry {
    pub level: QualityLevel,
    /// `None` for exact encoding
    pub quality: Option<u8>,
}

/// Configuration for a catalog run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureConfig {
    /// size -> dimensions
    pub sizes: Vec<SizeEntry>,
    /// quality -> codec parameter
    pub qualities: Vec<QualityEntry>,
    /// Seed for the geometric pattern and mesh jitter
    pub seed: u64,
    /// Image families to produce
    pub image_formats: Vec<ImageFormat>,
    /// Mesh families to produce
    pub mesh_formats: Vec<MeshFormat>,
    /// Encode independent fixtures on the rayon pool
    pub parallel: bool,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            sizes: SizeClass::ALL
                .iter()
                .map(|&class| {
                    let (width, height) = class.dimensions();
                    SizeEntry { class, width, height }
                })
                .collect(),
            qualities: QualityLevel::ALL
                .iter()
                .map(|&level| QualityEntry { level, quality: level.quality() })
                .collect(),
            seed: 42,
            image_formats: ImageFormat::ALL.to_vec(),
            mesh_formats: MeshFormat::ALL.to_vec(),
            parallel: true,
        }
    }
}

impl FixtureConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn images_only(mut self) -> Self {
        self.mesh_formats.clear();
        self
    }

    pub fn meshes_only(mut self) -> Self {
        self.image_formats.clear();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn dimensions(&self, class: SizeClass) -> Option<(u32, u32)> {
        self.sizes
            .iter()
            .find(|entry| entry.class == class)
            .map(|entry| (entry.width, entry.height))
    }

    pub fn quality(&self, level: QualityLevel) -> Option<Option<u8>> {
        self.qualities
            .iter()
            .find(|entry| entry.level == level)
            .map(|entry| entry.quality)
    }

    pub fn validate(&self) -> FixtureResult<()> {
        for entry in &self.sizes {
            if entry.width == 0 || entry.height == 0 {
                return Err(FixtureError::Config(format!(
                    "size '{}' has zero dimension {}x{}",
                    entry.class.name(),
                    entry.width,
                    entry.height
                )));
            }
            // TGA stores dimensions as u16
            if entry.width > u32::from(u16::MAX) || entry.height > u32::from(u16::MAX) {
                return Err(FixtureError::Config(format!(
                    "size '{}' exceeds 65535 pixels per side",
                    entry.class.name()
                )));
            }
        }

        for (i, entry) in self.sizes.iter().enumerate() {
            if self.sizes[..i].iter().any(|other| other.class == entry.class) {
                return Err(FixtureError::Config(format!(
                    "size '{}' listed twice",
                    entry.class.name()
                )));
            }
        }

        for entry in &self.qualities {
            match (entry.level, entry.quality) {
                (QualityLevel::Lossless, Some(_)) => {
                    return Err(FixtureError::Config("lossless quality must not carry a value".to_string()));
                }
                (level, None) if level != QualityLevel::Lossless => {
                    return Err(FixtureError::Config(format!("quality '{}' needs a value", level.name())));
                }
                (_, Some(q)) if q == 0 || q > 100 => {
                    return Err(FixtureError::Config(format!(
                        "quality '{}' must be between 1 and 100, got {q}",
                        entry.level.name()
                    )));
                }
                _ => {}
            }
        }

        Ok(())
    }

    pub fn summary(&self) -> String {
        let sizes: Vec<String> = self
            .sizes
            .iter()
            .map(|s| format!("{}={}x{}", s.class.name(), s.width, s.height))
            .collect();
        let qualities: Vec<String> = self
            .qualities
            .iter()
            .map(|q| match q.quality {
                Some(v) => format!("{}={v}", q.level.name()),
                None => format!("{}=exact", q.level.name()),
            })
            .collect();
        format!(
            "Fixture configuration:
  Sizes: {}
  Qualities: {}
  Image families: {}, mesh families: {}
  Seed: {}, {} execution",
            sizes.join(", "),
            qualities.join(", "),
            self.image_formats.len(),
            self.mesh_formats.len(),
            self.seed,
            if self.parallel { "parallel" } else { "sequential" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables() {
        let config = FixtureConfig::default();
        assert_eq!(config.dimensions(SizeClass::Tiny), Some((32, 32)));
        assert_eq!(config.dimensions(SizeClass::Ultra), Some((2048, 2048)));
        assert_eq!(config.quality(QualityLevel::Low), Some(Some(30)));
        assert_eq!(config.quality(QualityLevel::Medium), Some(Some(75)));
        assert_eq!(config.quality(QualityLevel::High), Some(Some(95)));
        assert_eq!(config.quality(QualityLevel::Lossless), Some(None));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = FixtureConfig::default().with_seed(7).images_only();
        let json = config.to_json().unwrap();
        assert!(json.contains("\"tiny\""));
        let back = FixtureConfig::from_json(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = FixtureConfig::from_json(r#"{"seed": 9, "parallel": false}"#).unwrap();
        assert_eq!(config.seed, 9);
        assert!(!config.parallel);
        assert_eq!(config.sizes.len(), 5);
    }

    #[test]
    fn test_validation_errors() {
        let mut config = FixtureConfig::default();
        config.sizes[0].width = 0;
        assert!(config.validate().is_err());

        let mut config = FixtureConfig::default();
        config.sizes[1].width = 70_000;
        assert!(config.validate().is_err());

        let mut config = FixtureConfig::default();
        config.qualities[0].quality = Some(0);
        assert!(config.validate().is_err());

        let mut config = FixtureConfig::default();
        config.qualities[3].quality = Some(100);
        assert!(config.validate().is_err());
    }
}
