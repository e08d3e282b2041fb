//! Background selection: photo, diagonal gradient, or solid fill.
//!
//! A readable photo wins when photos are enabled. Otherwise a gradient is
//! rendered when at least two colours are configured; a failed render falls
//! back to the first gradient colour. Everything else gets `colors.bg`.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use serde::Serialize;

use crate::models::color::RgbaColor;
use crate::models::config::WallpaperConfig;
use crate::models::geometry::{Rect, ScreenGeometry};
use crate::services::canvas::{Canvas, Pixmap};

/// Produces a full-size gradient image.
#[allow(async_fn_in_trait)]
pub trait GradientRenderer {
    async fn render_gradient(&self, colors: &[RgbaColor], width: u32, height: u32)
        -> Result<Pixmap>;
}

/// Linear gradient from the top-left to the bottom-right corner with evenly
/// spaced stops.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeGradientRenderer;

impl NativeGradientRenderer {
    /// Colour at position `t` in `[0, 1]` along evenly spaced `stops`.
    pub fn sample(stops: &[RgbaColor], t: f32) -> RgbaColor {
        match stops {
            [] => RgbaColor::BLACK,
            [only] => *only,
            _ => {
                let segments = (stops.len() - 1) as f32;
                let position = t.clamp(0.0, 1.0) * segments;
                let index = (position.floor() as usize).min(stops.len() - 2);
                stops[index].mix(stops[index + 1], position - index as f32)
            }
        }
    }
}

impl GradientRenderer for NativeGradientRenderer {
    async fn render_gradient(
        &self,
        colors: &[RgbaColor],
        width: u32,
        height: u32,
    ) -> Result<Pixmap> {
        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| anyhow!("cannot render a {}x{} gradient", width, height))?;
        let (w, h) = (width as f32, height as f32);
        let length_sq = w * w + h * h;

        for y in 0..height {
            for x in 0..width {
                // Projection of the pixel centre onto the (0,0)-(w,h) diagonal.
                let t = ((x as f32 + 0.5) * w + (y as f32 + 0.5) * h) / length_sq;
                pixmap.set_pixel(x, y, Self::sample(colors, t));
            }
        }
        Ok(pixmap)
    }
}

/// Rectangle that covers the whole screen with the image's aspect ratio kept,
/// centred so the overflow is cropped evenly.
pub fn aspect_fill(image_width: f32, image_height: f32, screen: ScreenGeometry) -> Rect {
    if !(image_width > 0.0 && image_height > 0.0) {
        return Rect::new(0.0, 0.0, screen.width, screen.height);
    }
    let image_aspect = image_width / image_height;
    let screen_aspect = screen.width / screen.height;

    if image_aspect > screen_aspect {
        let width = screen.height * image_aspect;
        Rect::new(-(width - screen.width) / 2.0, 0.0, width, screen.height)
    } else {
        let height = screen.width / image_aspect;
        Rect::new(0.0, -(height - screen.height) / 2.0, screen.width, height)
    }
}

/// What gets painted behind the calendar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BackgroundPlan {
    #[serde(rename_all = "camelCase")]
    Photo {
        path: PathBuf,
        rect: Rect,
        overlay_opacity: f32,
    },
    Gradient {
        colors: Vec<RgbaColor>,
    },
    Solid {
        color: RgbaColor,
    },
}

/// A plan together with the image it needs, if any.
#[derive(Debug, Clone)]
pub struct Background {
    pub plan: BackgroundPlan,
    pub image: Option<Pixmap>,
}

impl Background {
    pub fn solid(color: RgbaColor) -> Self {
        Self {
            plan: BackgroundPlan::Solid { color },
            image: None,
        }
    }

    /// Choose and prepare the background for this run.
    pub async fn prepare<R: GradientRenderer>(
        config: &WallpaperConfig,
        photo: Option<&str>,
        screen: ScreenGeometry,
        renderer: &R,
    ) -> Self {
        if config.show_wallpaper {
            if let Some(background) = photo.and_then(|photo| Self::load_photo(config, photo, screen)) {
                return background;
            }
        }

        let colors = &config.gradient_colors;
        if config.use_gradient && colors.len() > 1 {
            let width = screen.width.round().max(0.0) as u32;
            let height = screen.height.round().max(0.0) as u32;
            return match renderer.render_gradient(colors, width, height).await {
                Ok(image) => Self {
                    plan: BackgroundPlan::Gradient {
                        colors: colors.clone(),
                    },
                    image: Some(image),
                },
                Err(err) => {
                    log::error!("Gradient rendering failed, using solid fill: {:#}", err);
                    Self::solid(colors[0])
                }
            };
        }

        Self::solid(config.colors.bg)
    }

    fn load_photo(config: &WallpaperConfig, photo: &str, screen: ScreenGeometry) -> Option<Self> {
        let path = Path::new(photo.strip_prefix("file://").unwrap_or(photo));
        if !path.exists() {
            log::warn!("Background photo {} not found, ignoring", path.display());
            return None;
        }
        match Pixmap::open(path) {
            Ok(image) => {
                let rect = aspect_fill(image.width() as f32, image.height() as f32, screen);
                log::debug!("Photo {}x{} drawn into {:?}", image.width(), image.height(), rect);
                Some(Self {
                    plan: BackgroundPlan::Photo {
                        path: path.to_path_buf(),
                        rect,
                        overlay_opacity: config.overlay_opacity,
                    },
                    image: Some(image),
                })
            }
            Err(err) => {
                log::warn!("Ignoring background photo: {:#}", err);
                None
            }
        }
    }

    pub fn paint<C: Canvas>(&self, canvas: &mut C) {
        let full = Rect::new(0.0, 0.0, canvas.width() as f32, canvas.height() as f32);
        canvas.fill(RgbaColor::BLACK);

        match (&self.plan, &self.image) {
            (BackgroundPlan::Photo { rect, overlay_opacity, .. }, Some(image)) => {
                canvas.draw_image(image, *rect);
                if *overlay_opacity > 0.0 {
                    let alpha = (overlay_opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
                    canvas.fill_rect(full, RgbaColor::new(0, 0, 0, alpha));
                }
            }
            (BackgroundPlan::Gradient { .. }, Some(image)) => canvas.draw_image(image, full),
            (BackgroundPlan::Solid { color }, _) => canvas.fill_rect(full, *color),
            (plan, None) => log::warn!("Background {:?} has no image, leaving black", plan),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct FailingRenderer;

    impl GradientRenderer for FailingRenderer {
        async fn render_gradient(&self, _: &[RgbaColor], _: u32, _: u32) -> Result<Pixmap> {
            Err(anyhow!("no rendering surface"))
        }
    }

    fn small() -> ScreenGeometry {
        ScreenGeometry::new(8.0, 16.0)
    }

    #[test]
    fn test_sample_endpoints_and_middle() {
        let stops = [RgbaColor::BLACK, RgbaColor::WHITE];
        assert_eq!(NativeGradientRenderer::sample(&stops, 0.0), RgbaColor::BLACK);
        assert_eq!(NativeGradientRenderer::sample(&stops, 1.0), RgbaColor::WHITE);

        let three = [RgbaColor::BLACK, RgbaColor::rgb(255, 0, 0), RgbaColor::WHITE];
        assert_eq!(NativeGradientRenderer::sample(&three, 0.5), RgbaColor::rgb(255, 0, 0));
    }

    #[tokio::test]
    async fn test_gradient_runs_corner_to_corner() {
        let stops = [RgbaColor::BLACK, RgbaColor::WHITE];
        let image = NativeGradientRenderer
            .render_gradient(&stops, 10, 20)
            .await
            .unwrap();

        let top_left = image.pixel(0, 0).unwrap();
        let bottom_right = image.pixel(9, 19).unwrap();
        assert!(top_left.r < 20);
        assert!(bottom_right.r > 235);
    }

    #[test]
    fn test_aspect_fill_wide_image_crops_sides() {
        let rect = aspect_fill(400.0, 100.0, ScreenGeometry::new(100.0, 200.0));
        assert_eq!(rect, Rect::new(-350.0, 0.0, 800.0, 200.0));
    }

    #[test]
    fn test_aspect_fill_tall_image_crops_top_and_bottom() {
        let rect = aspect_fill(100.0, 400.0, ScreenGeometry::new(100.0, 200.0));
        assert_eq!(rect, Rect::new(0.0, -100.0, 100.0, 400.0));
    }

    #[tokio::test]
    async fn test_gradient_chosen_without_photo() {
        let config = WallpaperConfig::default();
        let background = Background::prepare(&config, None, small(), &NativeGradientRenderer).await;
        assert!(matches!(background.plan, BackgroundPlan::Gradient { .. }));
        assert!(background.image.is_some());
    }

    #[tokio::test]
    async fn test_failed_gradient_falls_back_to_first_color() {
        let config = WallpaperConfig::default();
        let background = Background::prepare(&config, None, small(), &FailingRenderer).await;
        assert_eq!(
            background.plan,
            BackgroundPlan::Solid {
                color: config.gradient_colors[0]
            }
        );
    }

    #[tokio::test]
    async fn test_single_gradient_color_uses_solid_bg() {
        let config = WallpaperConfig {
            gradient_colors: vec![RgbaColor::WHITE],
            ..WallpaperConfig::default()
        };
        let background = Background::prepare(&config, None, small(), &NativeGradientRenderer).await;
        assert_eq!(
            background.plan,
            BackgroundPlan::Solid {
                color: config.colors.bg
            }
        );
    }

    #[tokio::test]
    async fn test_photo_with_file_url_prefix() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("photo.png");
        let mut photo = Pixmap::new(4, 4).unwrap();
        photo.fill(RgbaColor::WHITE);
        std::fs::write(&path, photo.encode_png().unwrap()).unwrap();

        let config = WallpaperConfig::default();
        let url = format!("file://{}", path.display());
        let background =
            Background::prepare(&config, Some(&url), small(), &FailingRenderer).await;

        match background.plan {
            BackgroundPlan::Photo { rect, overlay_opacity, .. } => {
                assert_eq!(rect, Rect::new(-4.0, 0.0, 16.0, 16.0));
                assert!((overlay_opacity - 0.3).abs() < f32::EPSILON);
            }
            other => panic!("expected photo, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_jpeg_photo_is_used() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("camera.jpg");
        image::RgbImage::from_pixel(16, 8, image::Rgb([200, 200, 200]))
            .save(&path)
            .unwrap();

        let config = WallpaperConfig::default();
        let photo = path.display().to_string();
        let background =
            Background::prepare(&config, Some(&photo), small(), &FailingRenderer).await;

        assert!(matches!(background.plan, BackgroundPlan::Photo { .. }));
        let image = background.image.unwrap();
        assert_eq!((image.width(), image.height()), (16, 8));
    }

    #[tokio::test]
    async fn test_unreadable_photo_falls_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();

        let config = WallpaperConfig {
            use_gradient: false,
            ..WallpaperConfig::default()
        };
        let photo = path.display().to_string();
        let background =
            Background::prepare(&config, Some(&photo), small(), &NativeGradientRenderer).await;
        assert_eq!(background.plan, BackgroundPlan::Solid { color: config.colors.bg });
    }

    #[tokio::test]
    async fn test_missing_photo_is_ignored() {
        let config = WallpaperConfig {
            use_gradient: false,
            ..WallpaperConfig::default()
        };
        let background = Background::prepare(
            &config,
            Some("/definitely/not/here.png"),
            small(),
            &NativeGradientRenderer,
        )
        .await;
        assert_eq!(background.plan, BackgroundPlan::Solid { color: config.colors.bg });
    }

    #[test]
    fn test_photo_overlay_darkens() {
        let mut photo = Pixmap::new(2, 2).unwrap();
        photo.fill(RgbaColor::WHITE);
        let background = Background {
            plan: BackgroundPlan::Photo {
                path: PathBuf::from("photo.png"),
                rect: Rect::new(0.0, 0.0, 2.0, 2.0),
                overlay_opacity: 0.5,
            },
            image: Some(photo),
        };

        let mut canvas = Pixmap::new(2, 2).unwrap();
        background.paint(&mut canvas);
        let px = canvas.pixel(1, 1).unwrap();
        assert!((126..=129).contains(&px.r));
        assert_eq!(px.a, 255);
    }
}
