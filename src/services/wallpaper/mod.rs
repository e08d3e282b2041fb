//! One-shot wallpaper pipeline.
//!
//! Fetch events, prepare the background, plan the grid, then paint it all
//! onto a pixmap. Fetch and gradient failures degrade instead of aborting.

mod plan;
mod render;

use std::path::PathBuf;

use anyhow::{anyhow, Result};

pub use plan::{
    ContainerPlan, DayMark, DayPlan, MonthPlan, StatsPlan, TextItem, WallpaperPlan,
    WallpaperPlanner,
};
pub use render::paint_plan;

use crate::models::config::WallpaperConfig;
use crate::models::geometry::ScreenGeometry;
use crate::services::background::{Background, GradientRenderer};
use crate::services::canvas::Pixmap;
use crate::services::event_index::{EventIndex, EventProvider};
use crate::services::output::OutputSink;
use crate::utils::date::Clock;

/// A planned wallpaper and the background it will be painted on.
#[derive(Debug, Clone)]
pub struct Wallpaper {
    pub plan: WallpaperPlan,
    pub background: Background,
}

impl Wallpaper {
    pub fn render(&self) -> Result<Pixmap> {
        let width = self.plan.screen.width.round();
        let height = self.plan.screen.height.round();
        if !(width.is_finite() && height.is_finite() && width >= 1.0 && height >= 1.0) {
            return Err(anyhow!("invalid output size {}x{}", width, height));
        }

        let mut pixmap = Pixmap::new(width as u32, height as u32)
            .ok_or_else(|| anyhow!("cannot allocate a {}x{} image", width, height))?;
        self.background.paint(&mut pixmap);
        paint_plan(&mut pixmap, &self.plan);
        Ok(pixmap)
    }

    /// Render, encode as PNG and hand the bytes to `sink`.
    pub fn write_png<S: OutputSink>(&self, sink: &S) -> Result<PathBuf> {
        let bytes = self.render()?.encode_png()?;
        sink.write(&bytes)
    }
}

pub struct WallpaperGenerator<'a, P, R, C> {
    config: &'a WallpaperConfig,
    provider: P,
    renderer: R,
    clock: C,
}

impl<'a, P, R, C> WallpaperGenerator<'a, P, R, C>
where
    P: EventProvider,
    R: GradientRenderer,
    C: Clock,
{
    pub fn new(config: &'a WallpaperConfig, provider: P, renderer: R, clock: C) -> Self {
        Self {
            config,
            provider,
            renderer,
            clock,
        }
    }

    pub async fn generate(&self, screen: ScreenGeometry, photo: Option<&str>) -> Wallpaper {
        let now = self.clock.now();
        log::info!(
            "Generating {}x{} wallpaper for {}",
            screen.width,
            screen.height,
            now.date()
        );

        let index = EventIndex::build(&self.provider, self.config, now.date()).await;
        log::info!("Using {} calendars", index.calendars().len());

        let background = Background::prepare(self.config, photo, screen, &self.renderer).await;
        let plan = WallpaperPlanner::new(self.config, screen).plan(&index, now, background.plan.clone());

        Wallpaper { plan, background }
    }
}
