//! Shooting-star particle field: one streak with a fading trail, stepped on a
//! fixed clock and painted by an independent display-rate loop.

pub mod animator;
pub mod backdrop;
pub mod color;
pub mod config;
pub mod error;
pub mod geometry;
pub mod render;
pub mod rng;
pub mod scene;
pub mod schedule;
pub mod surface;
pub mod terminal;
pub mod threaded;

pub use animator::{Activation, AnimatorStats, Pump, ShootingStars, Viewport};
pub use color::Rgb;
pub use config::{AnimatorConfig, HeadingMode, SpeedSource, StarPaint};
pub use error::{StarfallError, StarfallResult};
pub use geometry::{Bounds, Edge, Point};
pub use render::{Canvas, FrameStyle};
pub use rng::{FastRandom, RandomSource, ScriptedRandom};
pub use scene::{Scene, Star, TickOutcome, Trail};
pub use surface::{DrawSurface, PixelSurface, Rect};
