use crate::color::Rgb;
use crate::geometry::{Bounds, Point};

/// Axis-aligned rectangle in surface pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// The 2D drawing primitives the render loop needs.
pub trait DrawSurface {
    fn bounds(&self) -> Bounds;
    /// Resets every pixel to transparent.
    fn clear(&mut self);
    fn stroke_polyline(&mut self, points: &[Point], color: Rgb, line_width: f32);
    fn fill_rect(&mut self, rect: Rect, color: Rgb);
}

/// Software raster target. Pixels are `None` until painted.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelSurface {
    width: usize,
    height: usize,
    pixels: Vec<Option<Rgb>>,
}

impl PixelSurface {
    /// `None` for a zero-area surface.
    pub fn new(width: usize, height: usize) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels: vec![None; width * height],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Resizing drops the current contents.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width * height, None);
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x]
        } else {
            None
        }
    }

    pub fn painted(&self) -> usize {
        self.pixels.iter().filter(|p| p.is_some()).count()
    }

    fn plot(&mut self, x: i64, y: i64, color: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            let idx = y as usize * self.width + x as usize;
            self.pixels[idx] = Some(color);
        }
    }

    /// Clamps `lo..hi` to `0..extent`.
    fn clip(lo: f32, hi: f32, extent: usize) -> std::ops::Range<usize> {
        let extent = extent as f32;
        let lo = lo.clamp(0.0, extent) as usize;
        let hi = hi.clamp(0.0, extent) as usize;
        lo..hi.max(lo)
    }

    /// Square brush of `size` pixels centred on `p`, never larger than the
    /// surface.
    fn stamp(&mut self, p: Point, size: f32, color: Rgb) {
        let limit = self.width.max(self.height) as f32;
        let n = size.round().max(1.0).min(limit);
        let half = (n - 1.0) / 2.0;
        let x0 = (p.x - half).round();
        let y0 = (p.y - half).round();
        for y in Self::clip(y0, y0 + n, self.height) {
            for x in Self::clip(x0, x0 + n, self.width) {
                self.plot(x as i64, y as i64, color);
            }
        }
    }

    fn segment(&mut self, a: Point, b: Point, color: Rgb, line_width: f32) {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            self.stamp(Point::new(a.x + dx * t, a.y + dy * t), line_width, color);
        }
    }
}

impl DrawSurface for PixelSurface {
    fn bounds(&self) -> Bounds {
        Bounds::new(self.width as f32, self.height as f32)
    }

    fn clear(&mut self) {
        self.pixels.fill(None);
    }

    fn stroke_polyline(&mut self, points: &[Point], color: Rgb, line_width: f32) {
        for pair in points.windows(2) {
            self.segment(pair[0], pair[1], color, line_width);
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        let xs = Self::clip(rect.x.floor(), (rect.x + rect.width).ceil(), self.width);
        let ys = Self::clip(rect.y.floor(), (rect.y + rect.height).ceil(), self.height);
        for y in ys {
            for x in xs.clone() {
                self.plot(x as i64, y as i64, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb(255, 0, 0);

    #[test]
    fn zero_area_has_no_surface() {
        assert!(PixelSurface::new(0, 10).is_none());
        assert!(PixelSurface::new(10, 0).is_none());
    }

    #[test]
    fn fill_rect_covers_and_clips() {
        let mut s = PixelSurface::new(20, 10).unwrap();
        s.fill_rect(Rect { x: 15.0, y: 0.0, width: 10.0, height: 1.0 }, RED);
        assert_eq!(s.painted(), 5);
        assert_eq!(s.pixel(15, 0), Some(RED));
        assert_eq!(s.pixel(19, 0), Some(RED));
        assert_eq!(s.pixel(14, 0), None);
        assert_eq!(s.pixel(15, 1), None);
    }

    #[test]
    fn oversized_shapes_are_clipped_to_the_surface() {
        let mut s = PixelSurface::new(80, 48).unwrap();
        s.fill_rect(Rect { x: 10.0, y: 5.0, width: 1.0e9, height: 1.0e9 }, RED);
        assert_eq!(s.painted(), 70 * 43);

        s.clear();
        s.fill_rect(Rect { x: 0.0, y: 0.0, width: f32::INFINITY, height: 1.0 }, RED);
        assert_eq!(s.painted(), 80);

        s.clear();
        s.fill_rect(Rect { x: f32::NAN, y: 0.0, width: 4.0, height: 1.0 }, RED);
        assert_eq!(s.painted(), 0);

        s.clear();
        s.stroke_polyline(&[Point::new(40.0, 24.0), Point::new(41.0, 24.0)], RED, 1.0e9);
        assert_eq!(s.pixel(1, 0), Some(RED));
        assert_eq!(s.pixel(79, 47), Some(RED));
    }

    #[test]
    fn polyline_connects_points() {
        let mut s = PixelSurface::new(20, 20).unwrap();
        let pts = [Point::new(2.0, 2.0), Point::new(12.0, 2.0), Point::new(12.0, 12.0)];
        s.stroke_polyline(&pts, RED, 1.0);
        for x in 2..=12 {
            assert_eq!(s.pixel(x, 2), Some(RED), "x={x}");
        }
        for y in 2..=12 {
            assert_eq!(s.pixel(12, y), Some(RED), "y={y}");
        }
        assert_eq!(s.pixel(5, 5), None);
    }

    #[test]
    fn single_point_polyline_paints_nothing() {
        let mut s = PixelSurface::new(8, 8).unwrap();
        s.stroke_polyline(&[Point::new(3.0, 3.0)], RED, 2.0);
        assert_eq!(s.painted(), 0);
    }

    #[test]
    fn clear_and_resize_drop_contents() {
        let mut s = PixelSurface::new(8, 8).unwrap();
        s.fill_rect(Rect { x: 0.0, y: 0.0, width: 8.0, height: 8.0 }, RED);
        s.clear();
        assert_eq!(s.painted(), 0);
        s.fill_rect(Rect { x: 0.0, y: 0.0, width: 8.0, height: 8.0 }, RED);
        s.resize(4, 3);
        assert_eq!(s.painted(), 0);
        assert_eq!(s.bounds(), Bounds::new(4.0, 3.0));
    }
}
