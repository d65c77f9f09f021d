use crate::animator::Viewport;
use crate::backdrop::Backdrop;
use crate::color::Rgb;
use crate::config::{AnimatorConfig, StarPaint};
use crate::geometry::{Bounds, Point};
use crate::scene::Scene;
use crate::surface::{DrawSurface, PixelSurface, Rect};

/// Paint settings for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameStyle {
    pub star_color: Rgb,
    pub trail_color: Rgb,
    pub star_width: f32,
    pub star_height: f32,
    pub trail_width: f32,
    pub star_paint: StarPaint,
    pub background: Rgb,
}

impl FrameStyle {
    pub fn from_config(cfg: &AnimatorConfig) -> Self {
        Self {
            star_color: cfg.star_color,
            trail_color: cfg.trail_color,
            star_width: cfg.star_width,
            star_height: cfg.star_height,
            trail_width: cfg.trail_width,
            star_paint: cfg.star_paint,
            background: cfg.background,
        }
    }
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self::from_config(&AnimatorConfig::default())
    }
}

/// Clears `surface` and paints `scene` onto it. Reads the scene only.
pub fn draw_frame(
    scene: &Scene,
    backdrop: Option<&Backdrop>,
    style: &FrameStyle,
    surface: &mut impl DrawSurface,
) {
    surface.clear();

    if let Some(backdrop) = backdrop {
        backdrop.paint(surface, style.background, scene.ticks());
    }

    let trail = scene.trail();
    if trail.len() > 1 {
        let points: Vec<Point> = trail.iter().copied().collect();
        surface.stroke_polyline(&points, style.trail_color, style.trail_width);
    }

    if let Some(star) = scene.star() {
        let color = match style.star_paint {
            StarPaint::Solid => style.star_color,
            StarPaint::Hue => star.color(),
        };
        let rect = Rect {
            x: star.position.x,
            y: star.position.y,
            width: style.star_width,
            height: style.star_height,
        };
        surface.fill_rect(rect, color);
    }
}

/// Owned drawing surface and optional backdrop, sized together to the
/// viewport. Shared by the cooperative and threaded hosts.
pub struct Canvas {
    style: FrameStyle,
    surface: Option<PixelSurface>,
    backdrop: Option<Backdrop>,
}

impl Canvas {
    pub fn new(style: FrameStyle, backdrop: Option<Backdrop>) -> Self {
        Self {
            style,
            surface: None,
            backdrop,
        }
    }

    /// `backdrop_seed` is only called when the backdrop is enabled and
    /// `config.seed` is unset.
    pub fn from_config(config: &AnimatorConfig, backdrop_seed: impl FnOnce() -> u64) -> Self {
        let backdrop = config.backdrop.then(|| {
            let seed = config.seed.unwrap_or_else(backdrop_seed);
            Backdrop::new(seed, config.tick_interval())
        });
        Self::new(FrameStyle::from_config(config), backdrop)
    }

    pub fn style(&self) -> &FrameStyle {
        &self.style
    }

    pub fn surface(&self) -> Option<&PixelSurface> {
        self.surface.as_ref()
    }

    pub fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    /// Sizes the surface to `viewport`, dropping its contents, and lays the
    /// backdrop out again. A zero-area viewport leaves no surface. Returns the
    /// new simulation bounds.
    pub fn fit(&mut self, viewport: Viewport) -> Bounds {
        if viewport.width == 0 || viewport.height == 0 {
            self.surface = None;
        } else if let Some(surface) = self.surface.as_mut() {
            surface.resize(viewport.width, viewport.height);
        } else {
            self.surface = PixelSurface::new(viewport.width, viewport.height);
        }

        let bounds = viewport.bounds();
        if let Some(backdrop) = self.backdrop.as_mut() {
            backdrop.layout(bounds);
        }
        bounds
    }

    pub fn release(&mut self) {
        self.surface = None;
    }

    /// Paints `scene` onto the owned surface. `false` without one.
    pub fn paint(&mut self, scene: &Scene) -> bool {
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        draw_frame(scene, self.backdrop.as_ref(), &self.style, surface);
        true
    }

    pub fn paint_onto(&self, scene: &Scene, surface: &mut impl DrawSurface) {
        draw_frame(scene, self.backdrop.as_ref(), &self.style, surface);
    }
}
