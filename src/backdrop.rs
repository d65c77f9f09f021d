use std::time::Duration;

use noise::{NoiseFn, Perlin};

use crate::color::Rgb;
use crate::geometry::{Bounds, Point};
use crate::surface::{DrawSurface, Rect};

const STAR_DENSITY: f32 = 0.004;
const TWINKLE_SPEED: f64 = 0.8;
const STAR_TINT: Rgb = Rgb(230, 235, 255);

/// Field of faint background stars whose brightness drifts with Perlin noise.
///
/// Twinkle phase is a function of the scene's tick count, so painting twice
/// between ticks yields the same frame.
#[derive(Clone)]
pub struct Backdrop {
    seed: u64,
    noise: Perlin,
    points: Vec<Point>,
    tick_secs: f64,
}

impl Backdrop {
    pub fn new(seed: u64, tick_interval: Duration) -> Self {
        Self {
            seed,
            noise: Perlin::new(seed as u32),
            points: Vec::new(),
            tick_secs: tick_interval.as_secs_f64(),
        }
    }

    /// Scatters stars over `bounds`. Same seed and bounds give the same layout.
    pub fn layout(&mut self, bounds: Bounds) {
        let mut rng = fastrand::Rng::with_seed(self.seed);
        let count = (bounds.width * bounds.height * STAR_DENSITY) as usize;
        self.points = (0..count)
            .map(|_| Point::new(rng.f32() * bounds.width, rng.f32() * bounds.height))
            .collect();
    }

    fn phase(&self, ticks: u64) -> f64 {
        // Keep noise input small enough for f64 precision.
        (ticks as f64 * self.tick_secs * TWINKLE_SPEED) % 10_000.0
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Brightness in `[0, 1]` of star `i` after `ticks` simulation ticks.
    pub fn brightness(&self, i: usize, ticks: u64) -> f32 {
        let n = self.noise.get([i as f64 * 1.618, self.phase(ticks)]) as f32;
        (n * 0.5 + 0.5).clamp(0.0, 1.0).powf(2.0)
    }

    pub fn paint(&self, surface: &mut impl DrawSurface, background: Rgb, ticks: u64) {
        for (i, p) in self.points.iter().enumerate() {
            let b = self.brightness(i, ticks);
            if b < 0.3 {
                continue;
            }
            let color = background.lerp(STAR_TINT, (b - 0.3) / 0.7 * 0.6);
            let rect = Rect {
                x: p.x,
                y: p.y,
                width: 1.0,
                height: 1.0,
            };
            surface.fill_rect(rect, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::PixelSurface;

    const TICK: Duration = Duration::from_millis(50);

    #[test]
    fn layout_is_deterministic_and_scaled() {
        let mut a = Backdrop::new(5, TICK);
        let mut b = Backdrop::new(5, TICK);
        a.layout(Bounds::new(100.0, 50.0));
        b.layout(Bounds::new(100.0, 50.0));
        assert_eq!(a.len(), 20);
        assert_eq!(a.points, b.points);
    }

    #[test]
    fn brightness_stays_in_unit_range() {
        let mut bd = Backdrop::new(11, TICK);
        bd.layout(Bounds::new(200.0, 100.0));
        for ticks in 0..50 {
            for i in 0..bd.len() {
                let v = bd.brightness(i, ticks);
                assert!((0.0..=1.0).contains(&v), "brightness {v}");
            }
        }
    }

    #[test]
    fn paint_is_stable_for_a_tick_count() {
        let mut bd = Backdrop::new(3, TICK);
        bd.layout(Bounds::new(64.0, 32.0));
        let mut first = PixelSurface::new(64, 32).unwrap();
        let mut second = first.clone();
        bd.paint(&mut first, Rgb::BLACK, 26);
        bd.paint(&mut second, Rgb::BLACK, 26);
        assert_eq!(first, second);
    }
}
