//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// RGBA color, components in [0, 1]
pub type Color = [f32; 4];

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: Color,
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: Color) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    /// Raw bytes of a vertex slice, ready for a GPU buffer upload
    pub fn as_bytes(vertices: &[Vertex]) -> &[u8] {
        bytemuck::cast_slice(vertices)
    }
}

/// Opaque color from a 0xRRGGBB literal
pub const fn rgb(hex: u32) -> Color {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        1.0,
    ]
}

/// Colors for game elements
pub mod colors {
    use super::{Color, rgb};

    pub const BACKGROUND: Color = rgb(0x000033);
    pub const STAR: Color = [1.0, 1.0, 1.0, 1.0];
    pub const PLAYER: Color = rgb(0x4fc3f7);
    pub const COCKPIT: Color = [1.0, 1.0, 1.0, 0.8];
    pub const PROJECTILE: Color = rgb(0xffeb3b);
    pub const LIGHT_ENEMY: Color = rgb(0xf44336);
    pub const HEAVY_ENEMY: Color = rgb(0xff9800);
    pub const METEOR: Color = rgb(0x795548);
    pub const CAPSULE: Color = rgb(0x4caf50);
    /// One boss color per level
    pub const BOSSES: [Color; 4] = [rgb(0xe91e63), rgb(0x9c27b0), rgb(0x673ab7), rgb(0x3f51b5)];

    /// Boss color for a level (1-based), reusing the last for deeper levels
    pub fn boss(level: u8) -> Color {
        let index = usize::from(level.max(1) - 1).min(BOSSES.len() - 1);
        BOSSES[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_components() {
        assert_eq!(rgb(0xff0000), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(rgb(0x000033)[2], 0x33 as f32 / 255.0);
    }

    #[test]
    fn test_boss_palette_by_level() {
        assert_eq!(colors::boss(1), colors::BOSSES[0]);
        assert_eq!(colors::boss(4), colors::BOSSES[3]);
        assert_eq!(colors::boss(9), colors::BOSSES[3]);
        assert_eq!(colors::boss(0), colors::BOSSES[0]);
    }

    #[test]
    fn test_vertex_bytes() {
        let vertices = [Vertex::new(1.0, 2.0, colors::STAR); 3];
        assert_eq!(Vertex::as_bytes(&vertices).len(), 3 * 24);
    }
}
