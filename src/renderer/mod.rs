//! Rendering module
//!
//! Drawing goes through the [`Surface`] trait: a pixel-sized target that can
//! fill rectangles, polygons and arcs. [`draw::draw_frame`] turns a game state
//! into those primitives; the surfaces decide what a primitive becomes.

pub mod draw;
pub mod shapes;
pub mod vertex;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

use glam::Vec2;
use std::f32::consts::TAU;

pub use draw::draw_frame;
pub use shapes::MeshSurface;
pub use vertex::{Color, Vertex, colors};

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;

/// A render target measured in pixels, origin top-left, y down
pub trait Surface {
    /// Width and height in pixels
    fn size(&self) -> Vec2;

    /// Fill the whole surface, discarding what was drawn before
    fn clear(&mut self, color: Color);

    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Color);

    /// Fill a closed convex path
    fn fill_polygon(&mut self, points: &[Vec2], color: Color);

    /// Fill the sector between two angles (radians, clockwise on screen)
    fn fill_arc(&mut self, center: Vec2, radius: f32, start: f32, end: f32, color: Color);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.fill_arc(center, radius, 0.0, TAU, color);
    }
}
