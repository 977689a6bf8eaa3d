//! Terminal presentation layer.
//!
//! The canvas is scaled onto a grid of half-block cells, two pixels per
//! cell: the cell background is the upper pixel and the `▄` glyph is the
//! lower one. Particle pixels persist between frames so a translucent
//! background pass leaves fading trails behind them.

use crate::color::Rgb;
use crate::config::CanvasSize;
use crate::frame::{Drawable, Frame};
use crate::presentation::{Decoration, Overlay, Shape};
use crate::score::ScoreState;
use glam::Vec2;
use std::io::Write;

pub struct TerminalRenderer {
    cols: usize,
    rows: usize,
    canvas: CanvasSize,
    pixels: Vec<Rgb>,
    overlay: Overlay,
    output_buf: Vec<u8>,
}

impl TerminalRenderer {
    /// `term_rows` is the terminal height in cells; the pixel grid is twice that.
    pub fn new(cols: usize, term_rows: usize, canvas: CanvasSize, background: Rgb) -> Self {
        let rows = term_rows * 2;
        Self {
            cols,
            rows,
            canvas,
            pixels: vec![background; cols * rows],
            overlay: Overlay::new(&ScoreState::default(), canvas),
            output_buf: Vec::with_capacity(cols * rows * 25),
        }
    }

    pub fn resize(&mut self, cols: usize, term_rows: usize, background: Rgb) {
        self.cols = cols;
        self.rows = term_rows * 2;
        self.pixels = vec![background; self.cols * self.rows];
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        (x < self.cols && y < self.rows).then(|| self.pixels[y * self.cols + x])
    }

    fn scale(&self) -> Vec2 {
        Vec2::new(
            self.cols as f32 / self.canvas.width,
            self.rows as f32 / self.canvas.height,
        )
    }

    /// Draws one frame into the pixel buffer.
    pub fn paint(&mut self, frame: &Frame) {
        let bg = frame.background;
        for pixel in &mut self.pixels {
            *pixel = pixel.blend(bg.color, bg.opacity);
        }
        for drawable in &frame.drawables {
            self.fill_dot(drawable);
        }
        self.overlay = Overlay::new(&frame.score, self.canvas);
    }

    fn fill_dot(&mut self, drawable: &Drawable) {
        let scale = self.scale();
        let center = drawable.position * scale;
        let radius = (Vec2::splat(drawable.diameter / 2.0) * scale).max(Vec2::splat(1e-3));
        let color = drawable.color.to_rgb();

        let x0 = (center.x - radius.x).floor().max(0.0) as usize;
        let y0 = (center.y - radius.y).floor().max(0.0) as usize;
        let x1 = (center.x + radius.x).floor();
        let y1 = (center.y + radius.y).floor();
        if x1 < 0.0 || y1 < 0.0 {
            return;
        }
        let x1 = (x1 as usize).min(self.cols.saturating_sub(1));
        let y1 = (y1 as usize).min(self.rows.saturating_sub(1));
        let (cx, cy) = (center.x.floor(), center.y.floor());

        for y in y0..=y1 {
            for x in x0..=x1 {
                if x >= self.cols || y >= self.rows {
                    continue;
                }
                let d = (Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - center) / radius;
                // Dots smaller than a pixel still light the pixel under their center
                let is_center = x as f32 == cx && y as f32 == cy;
                if is_center || d.length_squared() <= 1.0 {
                    let idx = y * self.cols + x;
                    self.pixels[idx] = self.pixels[idx].blend(color, drawable.alpha);
                }
            }
        }
    }

    fn compose(&self) -> Vec<Rgb> {
        let mut composed = self.pixels.clone();
        if let Some(decoration) = &self.overlay.decoration {
            let scale = self.scale();
            for y in 0..self.rows {
                for x in 0..self.cols {
                    let point = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) / scale;
                    if covers(decoration, point) {
                        let idx = y * self.cols + x;
                        composed[idx] = composed[idx].blend(decoration.color, decoration.alpha);
                    }
                }
            }
        }
        composed
    }

    fn text_cells(&self) -> Vec<Option<(char, Rgb)>> {
        let term_rows = self.rows / 2;
        let mut cells = vec![None; self.cols * term_rows];
        let scale = self.scale();
        for line in &self.overlay.lines {
            let anchor = line.center * scale;
            let row = (anchor.y / 2.0).floor();
            if row < 0.0 || row as usize >= term_rows {
                continue;
            }
            let row = row as usize;
            let len = line.text.chars().count() as f32;
            let start = (anchor.x - len / 2.0).round().max(0.0) as usize;
            for (i, ch) in line.text.chars().enumerate() {
                let col = start + i;
                if col >= self.cols {
                    break;
                }
                cells[row * self.cols + col] = Some((ch, line.color));
            }
        }
        cells
    }

    /// Writes the current buffer and overlay to the terminal.
    pub fn present<W: Write>(&mut self, out: &mut W) -> std::io::Result<()> {
        let composed = self.compose();
        let text = self.text_cells();

        self.output_buf.clear();
        self.output_buf.extend_from_slice(b"\x1b[H");

        let mut prev_bg: Option<Rgb> = None;
        let mut prev_fg: Option<Rgb> = None;

        for y in (0..self.rows).step_by(2) {
            for x in 0..self.cols {
                let top = composed[y * self.cols + x];
                let bot = if y + 1 < self.rows {
                    composed[(y + 1) * self.cols + x]
                } else {
                    top
                };

                let (bg, fg, glyph) = match text[(y / 2) * self.cols + x] {
                    Some((ch, color)) => (top.average(bot), color, ch),
                    None => (top, bot, '▄'),
                };

                if prev_bg != Some(bg) {
                    write!(self.output_buf, "\x1b[48;2;{};{};{}m", bg.r, bg.g, bg.b)?;
                    prev_bg = Some(bg);
                }
                if prev_fg != Some(fg) {
                    write!(self.output_buf, "\x1b[38;2;{};{};{}m", fg.r, fg.g, fg.b)?;
                    prev_fg = Some(fg);
                }

                let mut utf8 = [0u8; 4];
                self.output_buf.extend_from_slice(glyph.encode_utf8(&mut utf8).as_bytes());
            }
            self.output_buf.extend_from_slice(b"\x1b[0m");
            prev_bg = None;
            prev_fg = None;
            if y + 2 < self.rows {
                self.output_buf.extend_from_slice(b"\r\n");
            }
        }

        out.write_all(&self.output_buf)?;
        out.flush()?;
        Ok(())
    }
}

fn covers(decoration: &Decoration, point: Vec2) -> bool {
    let half = decoration.size / 2.0;
    let d = point - decoration.center;
    match decoration.shape {
        Shape::Circle => d.length_squared() <= half * half,
        Shape::Square => d.x.abs() <= half && d.y.abs() <= half,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Hsb;
    use crate::frame::Background;
    use crate::score::ScoreEvent;

    const CANVAS: CanvasSize = CanvasSize::new(960.0, 540.0);

    fn frame(opacity: u8, drawables: Vec<Drawable>) -> Frame {
        Frame {
            background: Background {
                color: Rgb::WHITE,
                opacity,
            },
            drawables,
            score: ScoreState::default(),
            looping: true,
        }
    }

    fn red_dot(position: Vec2, alpha: u8) -> Drawable {
        Drawable {
            position,
            diameter: 4.0,
            color: Hsb::new(0, 255, 255),
            alpha,
        }
    }

    #[test]
    fn dot_lands_on_scaled_pixel() {
        // 96 x 54 pixels: one pixel per 10 canvas units
        let mut renderer = TerminalRenderer::new(96, 27, CANVAS, Rgb::WHITE);
        renderer.paint(&frame(255, vec![red_dot(Vec2::new(485.0, 275.0), 255)]));
        assert_eq!(renderer.pixel(48, 27), Some(Rgb::new(255, 0, 0)));
        assert_eq!(renderer.pixel(10, 10), Some(Rgb::WHITE));
    }

    #[test]
    fn alpha_blends_toward_background() {
        let mut renderer = TerminalRenderer::new(96, 27, CANVAS, Rgb::WHITE);
        renderer.paint(&frame(255, vec![red_dot(Vec2::new(485.0, 275.0), 0)]));
        assert_eq!(renderer.pixel(48, 27), Some(Rgb::WHITE));
    }

    #[test]
    fn trails_fade_and_full_clear_erases() {
        let mut renderer = TerminalRenderer::new(96, 27, CANVAS, Rgb::WHITE);
        renderer.paint(&frame(255, vec![red_dot(Vec2::new(485.0, 275.0), 255)]));
        renderer.paint(&frame(30, Vec::new()));
        let faded = renderer.pixel(48, 27).unwrap();
        assert_eq!(faded.r, 255);
        assert!(faded.g > 0 && faded.g < 255);

        renderer.paint(&frame(255, Vec::new()));
        assert_eq!(renderer.pixel(48, 27), Some(Rgb::WHITE));
    }

    #[test]
    fn offscreen_dots_are_clipped() {
        let mut renderer = TerminalRenderer::new(96, 27, CANVAS, Rgb::WHITE);
        renderer.paint(&frame(
            255,
            vec![
                red_dot(Vec2::new(-500.0, -500.0), 255),
                red_dot(Vec2::new(5000.0, 5000.0), 255),
            ],
        ));
        assert!(renderer.pixels.iter().all(|p| *p == Rgb::WHITE));
    }

    #[test]
    fn present_writes_text_and_half_blocks() {
        let mut renderer = TerminalRenderer::new(96, 27, CANVAS, Rgb::WHITE);
        let mut f = frame(255, Vec::new());
        f.score.apply(ScoreEvent::new(7.0, 10.0));
        renderer.paint(&f);

        let mut out = Vec::new();
        renderer.present(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("\x1b[H"));
        assert!(text.contains('▄'));
        assert!(text.contains("Score: 7/10"));
        assert!(text.contains("Good result, keep it up."));
        assert_eq!(text.matches("\r\n").count(), 26);
    }

    #[test]
    fn decoration_tints_composed_pixels_only() {
        let mut renderer = TerminalRenderer::new(96, 27, CANVAS, Rgb::WHITE);
        let mut f = frame(255, Vec::new());
        f.score.apply(ScoreEvent::new(10.0, 10.0));
        renderer.paint(&f);

        let composed = renderer.compose();
        // Circle centered at (480, 420) in canvas units, pixel (48, 42)
        assert_ne!(composed[42 * 96 + 48], Rgb::WHITE);
        assert_eq!(renderer.pixel(48, 42), Some(Rgb::WHITE));
    }
}
