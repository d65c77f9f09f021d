use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::{StarfallError, StarfallResult};

/// How a freshly spawned star picks its heading.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeadingMode {
    /// Uniform over the full circle, ignoring the spawn edge.
    #[default]
    Random,
    /// The travel angle paired with the spawn edge (45/135/225/315).
    Edge,
    /// Uniform over whole radians 0..=6, converted to degrees.
    WholeRadian,
}

/// Where the per-star speed draw takes its bounds from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpeedSource {
    /// `[3, 9)` pixels per tick regardless of `min_speed`/`max_speed`.
    #[default]
    Fixed,
    /// `[min_speed, max_speed)`.
    Configured,
}

/// Fill used for the star rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StarPaint {
    #[default]
    Solid,
    /// `hsl(hue, 100%, 50%)` of the live star.
    Hue,
}

pub const FIXED_SPEED_RANGE: (f32, f32) = (3.0, 9.0);

/// Largest accepted star or trail dimension, in pixels.
pub const MAX_SHAPE_SIZE: f32 = 4096.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnimatorConfig {
    pub min_speed: f32,
    pub max_speed: f32,
    pub star_color: Rgb,
    pub trail_color: Rgb,
    pub star_width: f32,
    pub star_height: f32,
    pub trail_width: f32,
    pub trail_length: usize,
    pub tick_interval_ms: u64,
    pub frame_rate: u32,
    pub spawn_threshold: f64,
    pub heading: HeadingMode,
    pub speed_source: SpeedSource,
    pub star_paint: StarPaint,
    pub background: Rgb,
    pub backdrop: bool,
    pub seed: Option<u64>,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            min_speed: 10.0,
            max_speed: 30.0,
            star_color: Rgb(0x9E, 0x00, 0xFF),
            trail_color: Rgb(0x2E, 0xB9, 0xDF),
            star_width: 10.0,
            star_height: 1.0,
            trail_width: 2.0,
            trail_length: 20,
            tick_interval_ms: 50,
            frame_rate: 60,
            spawn_threshold: 0.8,
            heading: HeadingMode::Random,
            speed_source: SpeedSource::Fixed,
            star_paint: StarPaint::Solid,
            background: Rgb::BLACK,
            backdrop: false,
            seed: None,
        }
    }
}

impl AnimatorConfig {
    pub fn from_json_str(s: &str) -> StarfallResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> StarfallResult<Self> {
        let f = File::open(path)?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> StarfallResult<()> {
        if !(self.min_speed.is_finite() && self.max_speed.is_finite()) {
            return Err(StarfallError::config("speeds must be finite"));
        }
        if self.min_speed < 0.0 || self.min_speed > self.max_speed {
            return Err(StarfallError::config(format!(
                "min_speed ({}) must be >= 0 and <= max_speed ({})",
                self.min_speed, self.max_speed
            )));
        }
        let sizes = [
            ("star_width", self.star_width),
            ("star_height", self.star_height),
            ("trail_width", self.trail_width),
        ];
        for (name, value) in sizes {
            if !(value > 0.0 && value <= MAX_SHAPE_SIZE) {
                return Err(StarfallError::config(format!(
                    "{name} must be within (0, {MAX_SHAPE_SIZE}], got {value}"
                )));
            }
        }
        if self.trail_length == 0 {
            return Err(StarfallError::config("trail_length must be >= 1"));
        }
        if self.tick_interval_ms == 0 {
            return Err(StarfallError::config("tick_interval_ms must be >= 1"));
        }
        if self.frame_rate == 0 {
            return Err(StarfallError::config("frame_rate must be >= 1"));
        }
        if !(0.0..=1.0).contains(&self.spawn_threshold) {
            return Err(StarfallError::config(format!(
                "spawn_threshold must be within [0, 1], got {}",
                self.spawn_threshold
            )));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.frame_rate as f64)
    }

    /// Bounds of the per-star speed draw.
    pub fn speed_range(&self) -> (f32, f32) {
        match self.speed_source {
            SpeedSource::Fixed => FIXED_SPEED_RANGE,
            SpeedSource::Configured => (self.min_speed, self.max_speed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_component_props() {
        let cfg = AnimatorConfig::default();
        assert_eq!(cfg.star_color.to_hex(), "#9E00FF");
        assert_eq!(cfg.trail_color.to_hex(), "#2EB9DF");
        assert_eq!((cfg.min_speed, cfg.max_speed), (10.0, 30.0));
        assert_eq!((cfg.star_width, cfg.star_height), (10.0, 1.0));
        assert_eq!(cfg.tick_interval(), Duration::from_millis(50));
        assert_eq!(cfg.trail_length, 20);
        cfg.validate().unwrap();
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg = AnimatorConfig::from_json_str(
            r##"{ "star_color": "#FFFFFF", "heading": "whole-radian", "seed": 9 }"##,
        )
        .unwrap();
        assert_eq!(cfg.star_color, Rgb(255, 255, 255));
        assert_eq!(cfg.heading, HeadingMode::WholeRadian);
        assert_eq!(cfg.seed, Some(9));
        assert_eq!(cfg.trail_color, AnimatorConfig::default().trail_color);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(AnimatorConfig::from_json_str(r##"{ "starColour": "#FFFFFF" }"##).is_err());
    }

    #[test]
    fn validation_catches_inverted_speeds() {
        let cfg = AnimatorConfig {
            min_speed: 40.0,
            ..AnimatorConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("min_speed"));
    }

    #[test]
    fn validation_catches_zero_interval_and_trail() {
        let cfg = AnimatorConfig {
            tick_interval_ms: 0,
            ..AnimatorConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = AnimatorConfig {
            trail_length: 0,
            ..AnimatorConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validation_bounds_shape_sizes() {
        let cfg = AnimatorConfig {
            star_width: f32::INFINITY,
            ..AnimatorConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("star_width"));

        let cfg = AnimatorConfig {
            star_height: f32::NAN,
            ..AnimatorConfig::default()
        };
        assert!(cfg.validate().is_err());

        assert!(AnimatorConfig::from_json_str(r#"{ "trail_width": 1e30 }"#).is_err());
        assert!(AnimatorConfig::from_json_str(r#"{ "star_width": 4096 }"#).is_ok());
    }

    #[test]
    fn speed_range_follows_source() {
        let mut cfg = AnimatorConfig::default();
        assert_eq!(cfg.speed_range(), (3.0, 9.0));
        cfg.speed_source = SpeedSource::Configured;
        assert_eq!(cfg.speed_range(), (10.0, 30.0));
    }
}
