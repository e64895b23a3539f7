use crate::error::{ExtractError, Result};

pub const DEFAULT_RESOLUTION: usize = 30;
/// Largest accepted resolution. The histogram holds `resolution³` buckets.
pub const MAX_RESOLUTION: usize = 128;
pub const DEFAULT_BRIGHT_THRESHOLD: f64 = 0.6;
pub const DEFAULT_DARK_THRESHOLD: f64 = 0.4;
pub const DEFAULT_DISTINCT_THRESHOLD: f64 = 0.2;
pub const DEFAULT_AVOID_DISTANCE: f64 = 0.5;

/// Tunable constants of the extraction pipeline.
///
/// The defaults are what every convenience entry point uses. A config is checked with [`Config::validate`] before
/// a pipeline runs with it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Number of histogram buckets along each channel axis.
    pub resolution: usize,
    /// With [`crate::Options::ONLY_BRIGHT_COLORS`], pixels with every channel below this are skipped.
    pub bright_threshold: f64,
    /// With [`crate::Options::ONLY_DARK_COLORS`], pixels with any channel above this are skipped.
    pub dark_threshold: f64,
    /// Minimum RGB distance between two colors kept by the distinct filter.
    pub distinct_threshold: f64,
    /// Colors closer than this to an avoided color are dropped.
    pub avoid_distance: f64,
}

impl Config {
    pub fn resolution(self, resolution: usize) -> Self {
        Self { resolution, ..self }
    }

    pub fn bright_threshold(self, bright_threshold: f64) -> Self {
        Self {
            bright_threshold,
            ..self
        }
    }

    pub fn dark_threshold(self, dark_threshold: f64) -> Self {
        Self { dark_threshold, ..self }
    }

    pub fn distinct_threshold(self, distinct_threshold: f64) -> Self {
        Self {
            distinct_threshold,
            ..self
        }
    }

    pub fn avoid_distance(self, avoid_distance: f64) -> Self {
        Self { avoid_distance, ..self }
    }

    pub fn validate(&self) -> Result<()> {
        if self.resolution == 0 || self.resolution > MAX_RESOLUTION {
            return Err(ExtractError::invalid_parameter("resolution", self.resolution));
        }

        let thresholds = [
            ("bright_threshold", self.bright_threshold),
            ("dark_threshold", self.dark_threshold),
            ("distinct_threshold", self.distinct_threshold),
            ("avoid_distance", self.avoid_distance),
        ];

        for (parameter, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return Err(ExtractError::invalid_parameter(parameter, value));
            }
        }

        Ok(())
    }

    /// Parse a config from JSON. Missing fields take their default value.
    #[cfg(feature = "serde")]
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            bright_threshold: DEFAULT_BRIGHT_THRESHOLD,
            dark_threshold: DEFAULT_DARK_THRESHOLD,
            distinct_threshold: DEFAULT_DISTINCT_THRESHOLD,
            avoid_distance: DEFAULT_AVOID_DISTANCE,
        }
    }
}
