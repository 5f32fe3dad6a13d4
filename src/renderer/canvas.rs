//! 2D canvas surface for the browser host

use glam::Vec2;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::Surface;
use super::vertex::Color;

/// CSS `rgba()` string for a color
pub fn css_color(color: Color) -> String {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "rgba({}, {}, {}, {})",
        channel(color[0]),
        channel(color[1]),
        channel(color[2]),
        color[3].clamp(0.0, 1.0)
    )
}

/// Draws directly on a `<canvas>` 2D context
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d) -> Self {
        Self { canvas, ctx }
    }

    /// Match the backing store to a new size in pixels
    pub fn resize(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn set_fill(&self, color: Color) {
        self.ctx.set_fill_style_str(&css_color(color));
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> Vec2 {
        Vec2::new(self.canvas.width() as f32, self.canvas.height() as f32)
    }

    fn clear(&mut self, color: Color) {
        let size = self.size();
        self.set_fill(color);
        self.ctx.fill_rect(0.0, 0.0, size.x as f64, size.y as f64);
    }

    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Color) {
        self.set_fill(color);
        self.ctx
            .fill_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.set_fill(color);
        self.ctx.begin_path();
        self.ctx.move_to(first.x as f64, first.y as f64);
        for p in rest {
            self.ctx.line_to(p.x as f64, p.y as f64);
        }
        self.ctx.close_path();
        self.ctx.fill();
    }

    fn fill_arc(&mut self, center: Vec2, radius: f32, start: f32, end: f32, color: Color) {
        self.set_fill(color);
        self.ctx.begin_path();
        // Start at the center so the fill is a sector, not a chord segment
        self.ctx.move_to(center.x as f64, center.y as f64);
        if let Err(e) = self.ctx.arc(
            center.x as f64,
            center.y as f64,
            radius as f64,
            start as f64,
            end as f64,
        ) {
            log::warn!("Canvas arc failed: {:?}", e);
            return;
        }
        self.ctx.close_path();
        self.ctx.fill();
    }
}
