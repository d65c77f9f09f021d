//! Simulation state: the live star and its trail.
//!
//! A [`Scene`] is advanced one tick at a time by whoever owns it. Each tick
//! either spawns a replacement star, advances the live one, or does nothing.

use std::collections::VecDeque;

use crate::color::{self, Rgb};
use crate::config::{AnimatorConfig, HeadingMode};
use crate::geometry::{self, Bounds, Point};
use crate::rng::RandomSource;

#[derive(Clone, Debug, PartialEq)]
pub struct Star {
    pub id: u64,
    pub position: Point,
    pub previous_position: Point,
    /// Degrees.
    pub angle: f32,
    /// Pixels per tick.
    pub speed: f32,
    pub size: f32,
    pub opacity: f32,
    pub hue: f32,
}

impl Star {
    pub fn color(&self) -> Rgb {
        Rgb::from_hue(self.hue)
    }

    pub fn css_color(&self) -> String {
        color::hue_css(self.hue)
    }

    /// The same star one tick later, wrapped into `bounds`.
    pub fn advanced(&self, bounds: Bounds) -> Star {
        let delta = geometry::step(self.angle, self.speed);
        let next = bounds.wrap(Point::new(
            self.position.x + delta.x,
            self.position.y + delta.y,
        ));
        Star {
            previous_position: self.position,
            position: next,
            ..self.clone()
        }
    }
}

/// Most recent star positions, oldest first.
#[derive(Clone, Debug, PartialEq)]
pub struct Trail {
    points: VecDeque<Point>,
    capacity: usize,
}

impl Trail {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity + 1),
            capacity: capacity.max(1),
        }
    }

    /// Appends `p`, dropping the oldest point once over capacity.
    pub fn push(&mut self, p: Point) {
        self.points.push_back(p);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> + '_ {
        self.points.iter()
    }

    pub fn last(&self) -> Option<&Point> {
        self.points.back()
    }

    pub fn to_vec(&self) -> Vec<Point> {
        self.points.iter().copied().collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Spawned { id: u64 },
    Advanced,
    Idle,
}

/// Draw parameters for new stars.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnRules {
    pub threshold: f64,
    pub heading: HeadingMode,
    pub speed: (f32, f32),
}

impl SpawnRules {
    pub fn from_config(cfg: &AnimatorConfig) -> Self {
        Self {
            threshold: cfg.spawn_threshold,
            heading: cfg.heading,
            speed: cfg.speed_range(),
        }
    }
}

impl Default for SpawnRules {
    fn default() -> Self {
        Self::from_config(&AnimatorConfig::default())
    }
}

#[derive(Clone, Debug)]
pub struct Scene {
    star: Option<Star>,
    trail: Trail,
    bounds: Bounds,
    rules: SpawnRules,
    next_id: u64,
    ticks: u64,
}

impl Scene {
    pub fn new(rules: SpawnRules, trail_length: usize) -> Self {
        Self {
            star: None,
            trail: Trail::new(trail_length),
            bounds: Bounds::default(),
            rules,
            next_id: 1,
            ticks: 0,
        }
    }

    pub fn from_config(cfg: &AnimatorConfig) -> Self {
        Self::new(SpawnRules::from_config(cfg), cfg.trail_length)
    }

    pub fn star(&self) -> Option<&Star> {
        self.star.as_ref()
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Ticks processed since creation or the last [`Scene::reset`].
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    /// Drops the star and trail. Ids keep increasing.
    pub fn reset(&mut self) {
        self.star = None;
        self.trail.clear();
        self.ticks = 0;
    }

    /// One simulation step.
    pub fn tick(&mut self, rng: &mut impl RandomSource) -> TickOutcome {
        self.ticks += 1;

        if rng.unit() > self.rules.threshold {
            let star = self.spawn(rng);
            let id = star.id;
            tracing::trace!(id, x = star.position.x, y = star.position.y, angle = star.angle, "spawn");
            self.star = Some(star);
            self.trail.clear();
            return TickOutcome::Spawned { id };
        }

        match self.star.take() {
            Some(star) => {
                let next = star.advanced(self.bounds);
                self.trail.push(next.previous_position);
                self.star = Some(next);
                TickOutcome::Advanced
            }
            None => TickOutcome::Idle,
        }
    }

    fn spawn(&mut self, rng: &mut impl RandomSource) -> Star {
        let start = geometry::random_start_point(rng, self.bounds);

        let angle = match self.rules.heading {
            HeadingMode::Random => geometry::random_angle_degrees(rng),
            HeadingMode::WholeRadian => geometry::whole_radian_angle_degrees(rng),
            HeadingMode::Edge => {
                // Keep the draw sequence identical across modes.
                let _ = rng.unit();
                start.edge_angle
            }
        };

        let (lo, hi) = self.rules.speed;
        let speed = rng.range(lo as f64, hi as f64) as f32;
        let size = rng.range(1.0, 4.0) as f32;
        let opacity = rng.unit() as f32;
        let hue = rng.range(0.0, 360.0) as f32;

        let id = self.next_id;
        self.next_id += 1;

        Star {
            id,
            position: start.position,
            previous_position: start.position,
            angle,
            speed,
            size,
            opacity,
            hue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{FastRandom, ScriptedRandom};

    const VIEW: Bounds = Bounds::new(800.0, 600.0);

    fn scene() -> Scene {
        let mut s = Scene::new(SpawnRules::default(), 20);
        s.set_bounds(VIEW);
        s
    }

    // spawn, edge, offset, heading, speed, size, opacity, hue
    fn spawn_draws(edge: f64, offset: f64, heading: f64) -> [f64; 8] {
        [0.9, edge, offset, heading, 0.5, 0.5, 0.5, 0.5]
    }

    #[test]
    fn starts_empty_and_idles() {
        let mut s = scene();
        let mut rng = ScriptedRandom::new([0.1, 0.8]);
        assert_eq!(s.tick(&mut rng), TickOutcome::Idle);
        // Exactly at the threshold is not a spawn.
        assert_eq!(s.tick(&mut rng), TickOutcome::Idle);
        assert!(s.star().is_none());
        assert!(s.trail().is_empty());
    }

    #[test]
    fn spawn_draws_ranges() {
        let mut s = scene();
        let mut rng = ScriptedRandom::new([0.9, 0.0, 0.5, 0.0, 0.0, 0.0, 0.25, 0.5]);
        assert_eq!(s.tick(&mut rng), TickOutcome::Spawned { id: 1 });
        let star = s.star().unwrap();
        assert_eq!(star.position, Point::new(400.0, 0.0));
        assert_eq!(star.previous_position, star.position);
        assert_eq!(star.angle, 0.0);
        assert_eq!(star.speed, 3.0);
        assert_eq!(star.size, 1.0);
        assert_eq!(star.opacity, 0.25);
        assert_eq!(star.hue, 180.0);
        assert_eq!(rng.drawn(), 8);
    }

    #[test]
    fn spawn_clears_trail_and_replaces_star() {
        let mut s = scene();
        let mut rng = ScriptedRandom::new(spawn_draws(0.0, 0.5, 0.125));
        s.tick(&mut rng);
        rng.push([0.1, 0.1, 0.1]);
        for _ in 0..3 {
            assert_eq!(s.tick(&mut rng), TickOutcome::Advanced);
        }
        assert_eq!(s.trail().len(), 3);

        rng.push(spawn_draws(0.75, 0.1, 0.5));
        assert_eq!(s.tick(&mut rng), TickOutcome::Spawned { id: 2 });
        assert!(s.trail().is_empty());
        let star = s.star().unwrap();
        assert_eq!(star.id, 2);
        assert_eq!(star.position, Point::new(0.0, 60.0));
    }

    #[test]
    fn trail_is_bounded_and_ordered() {
        let mut s = scene();
        let mut rng = ScriptedRandom::new(spawn_draws(0.0, 0.5, 0.125)).with_fallback(0.0);
        s.tick(&mut rng);

        let mut expected = Vec::new();
        for _ in 0..57 {
            let before = s.star().unwrap().position;
            s.tick(&mut rng);
            expected.push(before);
            assert!(s.trail().len() <= 20);
            assert_eq!(s.trail().last(), Some(&before));
        }

        let tail: Vec<Point> = expected[expected.len() - 20..].to_vec();
        assert_eq!(s.trail().to_vec(), tail);
    }

    #[test]
    fn edge_heading_uses_edge_angle() {
        let rules = SpawnRules {
            heading: HeadingMode::Edge,
            ..SpawnRules::default()
        };
        let mut s = Scene::new(rules, 20);
        s.set_bounds(VIEW);
        let mut rng = ScriptedRandom::new(spawn_draws(0.25, 0.5, 0.9));
        s.tick(&mut rng);
        assert_eq!(s.star().unwrap().angle, 135.0);
        assert_eq!(rng.drawn(), 8);
    }

    #[test]
    fn wraps_right_edge_to_zero() {
        let mut s = scene();
        s.star = Some(Star {
            id: 1,
            position: Point::new(799.5, 300.0),
            previous_position: Point::new(799.5, 300.0),
            angle: 0.0,
            speed: 3.0,
            size: 1.0,
            opacity: 1.0,
            hue: 0.0,
        });
        s.tick(&mut ScriptedRandom::new([0.0]));
        let star = s.star().unwrap();
        assert_eq!(star.position.x, 0.0);
        assert_eq!(star.previous_position.x, 799.5);
    }

    #[test]
    fn reset_discards_state_but_keeps_ids_unique() {
        let mut s = scene();
        let mut rng = ScriptedRandom::new(spawn_draws(0.0, 0.5, 0.1));
        s.tick(&mut rng);
        s.reset();
        assert!(s.star().is_none());
        assert_eq!(s.ticks(), 0);
        rng.push(spawn_draws(0.0, 0.5, 0.1));
        assert_eq!(s.tick(&mut rng), TickOutcome::Spawned { id: 2 });
    }

    #[test]
    fn random_run_keeps_invariants() {
        let mut s = scene();
        let mut rng = FastRandom::with_seed(1234);
        for _ in 0..5000 {
            let outcome = s.tick(&mut rng);
            assert!(s.trail().len() <= 20);
            if let TickOutcome::Spawned { .. } = outcome {
                assert!(s.trail().is_empty());
            }
            if let Some(star) = s.star() {
                assert!((0.0..=800.0).contains(&star.position.x));
                assert!((0.0..=600.0).contains(&star.position.y));
                assert!((3.0..9.0).contains(&star.speed));
            }
        }
    }
}
