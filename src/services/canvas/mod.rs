//! RGBA drawing surface on top of `image`, with shapes from `imageproc`.
//!
//! Every shape is drawn opaque-per-pixel onto a transparent layer the size
//! of its visible box, then composited over the surface with source-over
//! blending. Overlapping parts of one shape therefore blend only once.

mod font;

use std::io::Cursor;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_ellipse_mut, draw_filled_rect_mut};
use serde::Serialize;

use crate::models::color::RgbaColor;
use crate::models::geometry::Rect;

/// Shapes further than this from the origin are not drawn.
const MAX_COORD: f32 = 1.0e6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
}

/// Drawing operations the wallpaper renderer needs.
pub trait Canvas {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn fill(&mut self, color: RgbaColor);
    fn fill_rect(&mut self, rect: Rect, color: RgbaColor);
    fn fill_ellipse(&mut self, rect: Rect, color: RgbaColor);
    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: RgbaColor);
    /// Scale `image` into `rect`; parts outside the canvas are clipped.
    fn draw_image(&mut self, image: &Pixmap, rect: Rect);
    /// Draw `text` with its cap height equal to `size * 0.7`, from the top of `rect`.
    fn draw_text(&mut self, text: &str, rect: Rect, size: f32, color: RgbaColor, align: TextAlign);
}

fn to_rgba(color: RgbaColor) -> Rgba<u8> {
    Rgba([color.r, color.g, color.b, color.a])
}

/// Whole-pixel box of a shape, in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PixelBox {
    left: i64,
    top: i64,
    right: i64,
    bottom: i64,
}

impl PixelBox {
    /// Round `rect` to pixel edges; anything with positive size covers at
    /// least one pixel.
    fn snap(rect: Rect) -> Option<Self> {
        if !rect.is_finite() || rect.width <= 0.0 || rect.height <= 0.0 {
            return None;
        }
        let extent = rect.x.abs().max(rect.y.abs()).max(rect.right().abs()).max(rect.bottom().abs());
        if extent > MAX_COORD {
            return None;
        }
        let left = rect.x.round() as i64;
        let top = rect.y.round() as i64;
        Some(Self {
            left,
            top,
            right: (rect.right().round() as i64).max(left + 1),
            bottom: (rect.bottom().round() as i64).max(top + 1),
        })
    }

    fn width(&self) -> u32 {
        (self.right - self.left) as u32
    }

    fn height(&self) -> u32 {
        (self.bottom - self.top) as u32
    }

    fn clip(&self, width: u32, height: u32) -> Option<Self> {
        let clipped = Self {
            left: self.left.max(0),
            top: self.top.max(0),
            right: self.right.min(i64::from(width)),
            bottom: self.bottom.min(i64::from(height)),
        };
        (clipped.left < clipped.right && clipped.top < clipped.bottom).then_some(clipped)
    }
}

/// Transparent scratch image over the visible part of one shape.
struct Layer {
    image: RgbaImage,
    origin: PixelBox,
    color: Rgba<u8>,
}

impl Layer {
    /// `shape` in layer-local coordinates as (x, y, width, height).
    fn local(&self, shape: PixelBox) -> (i32, i32, u32, u32) {
        (
            (shape.left - self.origin.left) as i32,
            (shape.top - self.origin.top) as i32,
            shape.width(),
            shape.height(),
        )
    }

    fn rect(&mut self, x: i32, y: i32, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        let rect = imageproc::rect::Rect::at(x, y).of_size(width, height);
        draw_filled_rect_mut(&mut self.image, rect, self.color);
    }
}

/// Straight-alpha RGBA8 image.
#[derive(Clone, PartialEq, Eq)]
pub struct Pixmap {
    image: RgbaImage,
}

impl std::fmt::Debug for Pixmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pixmap")
            .field("width", &self.image.width())
            .field("height", &self.image.height())
            .finish()
    }
}

impl From<RgbaImage> for Pixmap {
    fn from(image: RgbaImage) -> Self {
        Self { image }
    }
}

impl Pixmap {
    /// Transparent image; `None` when either side is zero or too large to address.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        Some(Self {
            image: RgbaImage::new(width, height),
        })
    }

    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let len = data.len();
        RgbaImage::from_raw(width, height, data)
            .map(Self::from)
            .ok_or_else(|| anyhow!("pixel buffer of {} bytes does not match {}x{}", len, width, height))
    }

    pub fn data(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<RgbaColor> {
        if x >= self.image.width() || y >= self.image.height() {
            return None;
        }
        let Rgba([r, g, b, a]) = *self.image.get_pixel(x, y);
        Some(RgbaColor::new(r, g, b, a))
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: RgbaColor) {
        if x < self.image.width() && y < self.image.height() {
            self.image.put_pixel(x, y, to_rgba(color));
        }
    }

    fn layer(&self, shape: PixelBox, color: RgbaColor) -> Option<Layer> {
        let origin = shape.clip(self.image.width(), self.image.height())?;
        Some(Layer {
            image: RgbaImage::new(origin.width(), origin.height()),
            origin,
            color: to_rgba(color),
        })
    }

    fn composite(&mut self, layer: Layer) {
        imageops::overlay(&mut self.image, &layer.image, layer.origin.left, layer.origin.top);
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        PngEncoder::new(Cursor::new(&mut bytes))
            .write_image(
                self.image.as_raw(),
                self.image.width(),
                self.image.height(),
                ExtendedColorType::Rgba8,
            )
            .context("Failed to encode PNG")?;
        Ok(bytes)
    }

    /// Decode an image in any enabled format into RGBA8.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(bytes).context("Failed to decode image")?;
        Ok(Self::from(image.to_rgba8()))
    }

    pub fn open(path: &Path) -> Result<Self> {
        let image = image::open(path)
            .with_context(|| format!("Failed to read image {}", path.display()))?;
        Ok(Self::from(image.to_rgba8()))
    }
}

impl Canvas for Pixmap {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn fill(&mut self, color: RgbaColor) {
        let pixel = to_rgba(color);
        for px in self.image.pixels_mut() {
            *px = pixel;
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: RgbaColor) {
        let Some(shape) = PixelBox::snap(rect) else {
            return;
        };
        let Some(mut layer) = self.layer(shape, color) else {
            return;
        };
        let (x, y, width, height) = layer.local(shape);
        layer.rect(x, y, width, height);
        self.composite(layer);
    }

    fn fill_ellipse(&mut self, rect: Rect, color: RgbaColor) {
        let Some(shape) = PixelBox::snap(rect) else {
            return;
        };
        let Some(mut layer) = self.layer(shape, color) else {
            return;
        };
        let (x, y, width, height) = layer.local(shape);
        let rx = (width as i32 - 1) / 2;
        let ry = (height as i32 - 1) / 2;
        if rx == 0 || ry == 0 {
            layer.rect(x, y, width, height);
        } else {
            let centre = (x + width as i32 / 2, y + height as i32 / 2);
            draw_filled_ellipse_mut(&mut layer.image, centre, rx, ry, layer.color);
        }
        self.composite(layer);
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: RgbaColor) {
        let Some(shape) = PixelBox::snap(rect) else {
            return;
        };
        let Some(mut layer) = self.layer(shape, color) else {
            return;
        };
        let (x, y, width, height) = layer.local(shape);
        let (w, h) = (width as i32, height as i32);
        let r = if radius.is_finite() {
            (radius.round().max(0.0) as i32).min((w - 1) / 2).min((h - 1) / 2)
        } else {
            0
        };

        // Cross of two rectangles, plus a disc in each corner.
        layer.rect(x + r, y, (w - 2 * r) as u32, height);
        layer.rect(x, y + r, width, (h - 2 * r) as u32);
        if r > 0 {
            let color = layer.color;
            for (cx, cy) in [
                (x + r, y + r),
                (x + w - 1 - r, y + r),
                (x + r, y + h - 1 - r),
                (x + w - 1 - r, y + h - 1 - r),
            ] {
                draw_filled_circle_mut(&mut layer.image, (cx, cy), r, color);
            }
        }
        self.composite(layer);
    }

    fn draw_image(&mut self, image: &Pixmap, rect: Rect) {
        if image.width() == 0 || image.height() == 0 {
            return;
        }
        let Some(shape) = PixelBox::snap(rect) else {
            return;
        };
        let Some(visible) = shape.clip(self.image.width(), self.image.height()) else {
            return;
        };

        // Only the part of the source that lands on the surface is resized.
        let sx = image.width() as f64 / f64::from(shape.width());
        let sy = image.height() as f64 / f64::from(shape.height());
        let src_left = (((visible.left - shape.left) as f64 * sx).floor() as u32).min(image.width() - 1);
        let src_top = (((visible.top - shape.top) as f64 * sy).floor() as u32).min(image.height() - 1);
        let src_right = (((visible.right - shape.left) as f64 * sx).ceil() as u32)
            .clamp(src_left + 1, image.width());
        let src_bottom = (((visible.bottom - shape.top) as f64 * sy).ceil() as u32)
            .clamp(src_top + 1, image.height());

        let source = imageops::crop_imm(
            &image.image,
            src_left,
            src_top,
            src_right - src_left,
            src_bottom - src_top,
        )
        .to_image();
        let scaled = imageops::resize(&source, visible.width(), visible.height(), FilterType::Triangle);
        imageops::overlay(&mut self.image, &scaled, visible.left, visible.top);
    }

    fn draw_text(&mut self, text: &str, rect: Rect, size: f32, color: RgbaColor, align: TextAlign) {
        let cell = size * 0.7 / font::GLYPH_ROWS as f32;
        if !(cell.is_finite() && cell > 0.0) || text.is_empty() {
            return;
        }

        let text_width = font::text_cells(text) as f32 * cell;
        let start_x = match align {
            TextAlign::Left => rect.x,
            TextAlign::Center => rect.x + (rect.width - text_width) / 2.0,
        };
        let bounds = Rect::new(start_x, rect.y, text_width, font::GLYPH_ROWS as f32 * cell);
        let Some(text_box) = PixelBox::snap(bounds) else {
            return;
        };
        let Some(mut layer) = self.layer(text_box, color) else {
            return;
        };

        let mut pen_x = start_x;
        for c in text.chars() {
            for (row, bits) in font::glyph(c).iter().enumerate() {
                for column in 0..font::GLYPH_COLUMNS {
                    if bits & (1 << (font::GLYPH_COLUMNS - 1 - column)) == 0 {
                        continue;
                    }
                    let cell_rect = Rect::new(
                        pen_x + column as f32 * cell,
                        rect.y + row as f32 * cell,
                        cell,
                        cell,
                    );
                    if let Some(cell_box) = PixelBox::snap(cell_rect) {
                        let (x, y, width, height) = layer.local(cell_box);
                        layer.rect(x, y, width, height);
                    }
                }
            }
            pen_x += font::ADVANCE as f32 * cell;
        }
        self.composite(layer);
    }
}
