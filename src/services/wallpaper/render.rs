use super::plan::{DayMark, TextItem, WallpaperPlan};
use crate::services::canvas::Canvas;

fn draw_text<C: Canvas>(canvas: &mut C, item: &TextItem) {
    canvas.draw_text(&item.text, item.rect, item.font_size, item.color, item.align);
}

/// Paint everything in `plan` except the background.
pub fn paint_plan<C: Canvas>(canvas: &mut C, plan: &WallpaperPlan) {
    if let Some(container) = &plan.container {
        canvas.fill_rounded_rect(container.rect, container.radius, container.color);
    }

    for month in &plan.months {
        draw_text(canvas, &month.header);
        for day in &month.days {
            match &day.mark {
                DayMark::Dot { rect } => canvas.fill_ellipse(*rect, day.appearance.to_rgba()),
                DayMark::Number(item) => draw_text(canvas, item),
            }
        }
    }

    if let Some(stats) = &plan.stats {
        draw_text(canvas, &stats.text);
    }
}
