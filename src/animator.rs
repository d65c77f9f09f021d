//! The shooting-star component: owns the scene, the drawing surface and the
//! two schedules, and ties them to an activation lifetime.

use std::ops::{Deref, DerefMut};
use std::time::Instant;

use crate::config::AnimatorConfig;
use crate::geometry::Bounds;
use crate::render::Canvas;
use crate::rng::{FastRandom, RandomSource};
use crate::scene::{Scene, TickOutcome};
use crate::schedule::{FramePacer, Interval};
use crate::surface::{DrawSurface, PixelSurface};

/// Viewport size in surface pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
}

impl Viewport {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Terminal cells to pixels: two pixel rows per cell row.
    pub fn from_cells(cols: u16, rows: u16) -> Self {
        Self::new(cols as usize, rows as usize * 2)
    }

    pub fn bounds(self) -> Bounds {
        Bounds::new(self.width as f32, self.height as f32)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnimatorStats {
    pub ticks: u64,
    pub spawns: u64,
    pub advances: u64,
    pub frames: u64,
}

/// Work done by one [`ShootingStars::pump`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pump {
    pub ticks: u32,
    pub painted: bool,
}

impl Pump {
    pub fn is_idle(&self) -> bool {
        self.ticks == 0 && !self.painted
    }
}

struct Schedules {
    tick: Interval,
    frame: Option<FramePacer>,
}

pub struct ShootingStars<R: RandomSource = FastRandom> {
    config: AnimatorConfig,
    scene: Scene,
    rng: R,
    canvas: Canvas,
    schedules: Option<Schedules>,
    stats: AnimatorStats,
}

impl ShootingStars<FastRandom> {
    /// Uses `config.seed` when set.
    pub fn from_config(config: AnimatorConfig) -> Self {
        let rng = FastRandom::from_seed(config.seed);
        Self::new(config, rng)
    }
}

impl<R: RandomSource> ShootingStars<R> {
    pub fn new(config: AnimatorConfig, mut rng: R) -> Self {
        let canvas = Canvas::from_config(&config, || (rng.unit() * u32::MAX as f64) as u64);
        Self {
            scene: Scene::from_config(&config),
            config,
            rng,
            canvas,
            schedules: None,
            stats: AnimatorStats::default(),
        }
    }

    pub fn config(&self) -> &AnimatorConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn surface(&self) -> Option<&PixelSurface> {
        self.canvas.surface()
    }

    pub fn stats(&self) -> AnimatorStats {
        self.stats
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    pub fn is_active(&self) -> bool {
        self.schedules.is_some()
    }

    /// Whether the frame loop is running. False while active on a zero-area
    /// viewport.
    pub fn is_rendering(&self) -> bool {
        self.schedules.as_ref().is_some_and(|s| s.frame.is_some())
    }

    /// Sizes the surface to `viewport` and arms both loops. The returned guard
    /// deactivates on drop.
    #[tracing::instrument(skip(self, now))]
    pub fn activate(&mut self, viewport: Viewport, now: Instant) -> Activation<'_, R> {
        if self.is_active() {
            tracing::warn!("activate called while active; re-arming");
            self.deactivate();
        }

        self.apply_viewport(viewport);
        let tick = Interval::new(self.config.tick_interval(), now);
        let frame = if self.canvas.has_surface() {
            Some(FramePacer::new(self.config.frame_interval(), now))
        } else {
            tracing::warn!("no drawing surface for viewport; frame loop not started");
            None
        };
        self.schedules = Some(Schedules { tick, frame });
        tracing::info!("shooting stars active");

        Activation { animator: self }
    }

    /// Stops both loops and discards the scene and surface. Safe to call when
    /// inactive.
    pub fn deactivate(&mut self) {
        if self.schedules.take().is_none() {
            return;
        }
        self.scene.reset();
        self.canvas.release();
        tracing::info!(
            ticks = self.stats.ticks,
            frames = self.stats.frames,
            spawns = self.stats.spawns,
            "shooting stars deactivated"
        );
    }

    /// Re-applies the viewport. Surface contents are dropped; the scene keeps
    /// its star, which continues under the new bounds. Ignored while inactive;
    /// the next activation sizes the surface.
    pub fn resize(&mut self, viewport: Viewport, now: Instant) {
        if !self.is_active() {
            tracing::debug!("resize while inactive ignored");
            return;
        }
        tracing::debug!(width = viewport.width, height = viewport.height, "resize");
        self.apply_viewport(viewport);

        let frame_interval = self.config.frame_interval();
        let has_surface = self.canvas.has_surface();
        if let Some(schedules) = self.schedules.as_mut() {
            match (has_surface, schedules.frame.is_some()) {
                (true, false) => schedules.frame = Some(FramePacer::new(frame_interval, now)),
                (false, true) => schedules.frame = None,
                _ => {}
            }
        }
    }

    fn apply_viewport(&mut self, viewport: Viewport) {
        let bounds = self.canvas.fit(viewport);
        self.scene.set_bounds(bounds);
    }

    /// Runs whatever the two schedules have due at `now`: ticks first, then at
    /// most one frame.
    pub fn pump(&mut self, now: Instant) -> Pump {
        let Some(schedules) = self.schedules.as_mut() else {
            return Pump::default();
        };

        let due = schedules.tick.poll(now);
        let frame_due = schedules.frame.as_mut().is_some_and(|f| f.poll(now));

        let mut ticks = 0;
        for _ in 0..due {
            if self.tick().is_some() {
                ticks += 1;
            }
        }
        let painted = frame_due && self.draw_frame();

        Pump { ticks, painted }
    }

    /// Earliest instant at which [`ShootingStars::pump`] has work.
    pub fn next_deadline(&self) -> Option<Instant> {
        let schedules = self.schedules.as_ref()?;
        let tick = schedules.tick.next_due();
        Some(match &schedules.frame {
            Some(frame) => tick.min(frame.next_due()),
            None => tick,
        })
    }

    /// One simulation step. Skipped without a drawing surface.
    pub fn tick(&mut self) -> Option<TickOutcome> {
        if !self.canvas.has_surface() {
            return None;
        }

        let outcome = self.scene.tick(&mut self.rng);
        self.stats.ticks += 1;
        match outcome {
            TickOutcome::Spawned { .. } => self.stats.spawns += 1,
            TickOutcome::Advanced => self.stats.advances += 1,
            TickOutcome::Idle => {}
        }
        Some(outcome)
    }

    /// Paints the current scene onto the owned surface. Skipped without one.
    pub fn draw_frame(&mut self) -> bool {
        if !self.canvas.paint(&self.scene) {
            return false;
        }
        self.stats.frames += 1;
        true
    }

    /// Paints the current scene onto an external surface.
    pub fn draw_onto(&self, surface: &mut impl DrawSurface) {
        self.canvas.paint_onto(&self.scene, surface);
    }
}

impl<R: RandomSource> Drop for ShootingStars<R> {
    fn drop(&mut self) {
        self.deactivate();
    }
}

/// Scoped activation. Dropping it, including during unwinding, stops the tick
/// interval and the frame loop.
pub struct Activation<'a, R: RandomSource = FastRandom> {
    animator: &'a mut ShootingStars<R>,
}

impl<R: RandomSource> Activation<'_, R> {
    /// Deactivates now instead of at end of scope.
    pub fn finish(self) {}
}

impl<R: RandomSource> Deref for Activation<'_, R> {
    type Target = ShootingStars<R>;

    fn deref(&self) -> &Self::Target {
        self.animator
    }
}

impl<R: RandomSource> DerefMut for Activation<'_, R> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.animator
    }
}

impl<R: RandomSource> Drop for Activation<'_, R> {
    fn drop(&mut self) {
        self.animator.deactivate();
    }
}
