use std::io::{self, Write};

use crossterm::{
    cursor::{Hide, Show},
    execute,
    style::ResetColor,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};

use crate::animator::Viewport;
use crate::color::Rgb;
use crate::surface::PixelSurface;

/// Raw mode plus alternate screen for as long as the value lives.
pub struct TerminalSession<W: Write> {
    out: W,
}

impl<W: Write> TerminalSession<W> {
    pub fn enter(mut out: W) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        if let Err(e) = execute!(out, EnterAlternateScreen, Hide, Clear(ClearType::All)) {
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }
        Ok(Self { out })
    }

    pub fn viewport(&self) -> io::Result<Viewport> {
        let (cols, rows) = terminal::size()?;
        Ok(Viewport::from_cells(cols, rows))
    }

    pub fn clear(&mut self) -> io::Result<()> {
        execute!(self.out, Clear(ClearType::All))
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.out
    }
}

impl<W: Write> Drop for TerminalSession<W> {
    fn drop(&mut self) {
        let _ = execute!(self.out, ResetColor, Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Writes a [`PixelSurface`] as truecolor lower-half blocks, two pixel rows
/// per terminal row. Unpainted pixels show `background`.
pub struct Presenter {
    output_buf: Vec<u8>,
}

impl Presenter {
    pub fn new() -> Self {
        Self {
            output_buf: Vec::new(),
        }
    }

    /// Encodes `surface` into the internal buffer and returns it.
    pub fn encode(&mut self, surface: &PixelSurface, background: Rgb) -> &[u8] {
        let width = surface.width();
        let height = surface.height();
        self.output_buf.clear();
        self.output_buf.reserve(width * height * 12);
        self.output_buf.extend_from_slice(b"\x1b[H");

        let mut prev_top: Option<Rgb> = None;
        let mut prev_bot: Option<Rgb> = None;

        for y in (0..height).step_by(2) {
            for x in 0..width {
                let top = surface.pixel(x, y).unwrap_or(background);
                let bot = surface.pixel(x, y + 1).unwrap_or(background);

                // Only emit color codes if changed
                if prev_top != Some(top) {
                    self.push_sgr(48, top);
                    prev_top = Some(top);
                }
                if prev_bot != Some(bot) {
                    self.push_sgr(38, bot);
                    prev_bot = Some(bot);
                }
                self.output_buf.extend_from_slice("▄".as_bytes());
            }
            self.output_buf.extend_from_slice(b"\x1b[0m");
            prev_top = None;
            prev_bot = None;
            if y + 2 < height {
                self.output_buf.extend_from_slice(b"\r\n");
            }
        }

        &self.output_buf
    }

    pub fn present(
        &mut self,
        surface: &PixelSurface,
        background: Rgb,
        out: &mut impl Write,
    ) -> io::Result<()> {
        let bytes = self.encode(surface, background);
        out.write_all(bytes)?;
        out.flush()
    }

    fn push_sgr(&mut self, layer: u8, c: Rgb) {
        // Writing into a Vec cannot fail.
        let _ = write!(self.output_buf, "\x1b[{};2;{};{};{}m", layer, c.0, c.1, c.2);
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawSurface, Rect};

    #[test]
    fn blank_surface_is_one_color_per_row() {
        let surface = PixelSurface::new(3, 4).unwrap();
        let mut p = Presenter::new();
        let text = String::from_utf8(p.encode(&surface, Rgb(1, 2, 3)).to_vec()).unwrap();
        assert!(text.starts_with("\x1b[H"));
        assert_eq!(text.matches('▄').count(), 6);
        assert_eq!(text.matches("\x1b[48;2;1;2;3m").count(), 2);
        assert_eq!(text.matches("\r\n").count(), 1);
    }

    #[test]
    fn painted_pixels_set_top_and_bottom_layers() {
        let mut surface = PixelSurface::new(2, 2).unwrap();
        surface.fill_rect(Rect { x: 0.0, y: 1.0, width: 1.0, height: 1.0 }, Rgb(9, 9, 9));
        let mut p = Presenter::new();
        let text = String::from_utf8(p.encode(&surface, Rgb::BLACK).to_vec()).unwrap();
        assert!(text.contains("\x1b[38;2;9;9;9m"));
        assert!(text.contains("\x1b[48;2;0;0;0m"));
    }

    #[test]
    fn present_writes_encoded_bytes() {
        let surface = PixelSurface::new(4, 2).unwrap();
        let mut p = Presenter::new();
        let mut sink = Vec::new();
        p.present(&surface, Rgb::BLACK, &mut sink).unwrap();
        assert_eq!(sink, p.encode(&surface, Rgb::BLACK));
    }
}
