//! Screen-space text and panels drawn on top of the scene.

use bytemuck::{Pod, Zeroable};

use crate::font::{glyph_index, glyph_uv, CELL_HEIGHT, CELL_WIDTH};

/// Vertex for screen-space text / UI overlay.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct OverlayVertex {
    /// NDC position (x, y) in -1..1
    pub position: [f32; 2],
    /// UV into font atlas (negative x = solid color quad)
    pub tex_coords: [f32; 2],
    pub color: [f32; 4],
}

impl OverlayVertex {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
            0 => Float32x2,
            1 => Float32x2,
            2 => Float32x4
        ];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<OverlayVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// UV sentinel telling the shader to skip the atlas.
const SOLID_UV: [f32; 2] = [-1.0, -1.0];

/// Builds overlay quads for one frame. Coordinates are window pixels with
/// the origin at the top-left.
pub struct OverlayTextBuilder {
    pub vertices: Vec<OverlayVertex>,
    pub indices: Vec<u32>,
    screen_w: f32,
    screen_h: f32,
}

impl OverlayTextBuilder {
    pub fn new(screen_w: f32, screen_h: f32) -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            screen_w: screen_w.max(1.0),
            screen_h: screen_h.max(1.0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Pixel size of `text` at `scale`: (width, height).
    pub fn measure(text: &str, scale: f32) -> (f32, f32) {
        (
            text.chars().count() as f32 * CELL_WIDTH as f32 * scale,
            CELL_HEIGHT as f32 * scale,
        )
    }

    fn px_to_ndc(&self, px: f32, py: f32) -> [f32; 2] {
        [(px / self.screen_w) * 2.0 - 1.0, 1.0 - (py / self.screen_h) * 2.0]
    }

    fn push_quad(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, uv: [f32; 4], color: [f32; 4]) {
        let tl = self.px_to_ndc(x0, y0);
        let br = self.px_to_ndc(x1, y1);
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&[
            OverlayVertex { position: [tl[0], tl[1]], tex_coords: [uv[0], uv[1]], color },
            OverlayVertex { position: [br[0], tl[1]], tex_coords: [uv[2], uv[1]], color },
            OverlayVertex { position: [br[0], br[1]], tex_coords: [uv[2], uv[3]], color },
            OverlayVertex { position: [tl[0], br[1]], tex_coords: [uv[0], uv[3]], color },
        ]);
        self.indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Solid-colour rectangle.
    pub fn add_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) {
        let uv = [SOLID_UV[0], SOLID_UV[1], SOLID_UV[0], SOLID_UV[1]];
        self.push_quad(x, y, x + w, y + h, uv, color);
    }

    /// Text with its top-left corner at (x, y). `scale` 1.0 = 6x8 pixels
    /// per glyph. Unknown characters leave a gap.
    pub fn add_text(&mut self, x: f32, y: f32, text: &str, scale: f32, color: [f32; 4]) {
        let gw = CELL_WIDTH as f32 * scale;
        let gh = CELL_HEIGHT as f32 * scale;
        let mut cx = x;
        for ch in text.chars() {
            if let Some(index) = glyph_index(ch) {
                if ch != ' ' {
                    self.push_quad(cx, y, cx + gw, y + gh, glyph_uv(index), color);
                }
            }
            cx += gw;
        }
    }

    /// Text on a padded background box. Returns the box height.
    pub fn add_text_with_bg(
        &mut self,
        x: f32,
        y: f32,
        text: &str,
        scale: f32,
        text_color: [f32; 4],
        bg_color: [f32; 4],
    ) -> f32 {
        let (text_w, text_h) = Self::measure(text, scale);
        let padding = 2.0 * scale;
        self.add_rect(x, y, text_w + padding * 2.0, text_h + padding * 2.0, bg_color);
        self.add_text(x + padding, y + padding, text, scale, text_color);
        text_h + padding * 2.0
    }

    /// Several lines inside one background panel whose bottom-left corner
    /// sits at (x, bottom). Returns the panel's top edge.
    pub fn add_panel(
        &mut self,
        x: f32,
        bottom: f32,
        lines: &[&str],
        scale: f32,
        text_color: [f32; 4],
        bg_color: [f32; 4],
    ) -> f32 {
        let padding = 4.0 * scale;
        let line_h = (CELL_HEIGHT as f32 + 2.0) * scale;
        let width = lines.iter().map(|l| Self::measure(l, scale).0).fold(0.0, f32::max);
        let height = lines.len() as f32 * line_h + padding * 2.0;
        let top = bottom - height;
        self.add_rect(x, top, width + padding * 2.0, height, bg_color);
        for (i, line) in lines.iter().enumerate() {
            self.add_text(x + padding, top + padding + i as f32 * line_h, line, scale, text_color);
        }
        top
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_covers_whole_screen_in_ndc() {
        let mut builder = OverlayTextBuilder::new(800.0, 600.0);
        builder.add_rect(0.0, 0.0, 800.0, 600.0, [1.0; 4]);
        assert_eq!(builder.vertices[0].position, [-1.0, 1.0]);
        assert_eq!(builder.vertices[2].position, [1.0, -1.0]);
        assert_eq!(builder.vertices[0].tex_coords, SOLID_UV);
        assert_eq!(builder.indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn spaces_take_room_but_no_quads() {
        let mut builder = OverlayTextBuilder::new(800.0, 600.0);
        builder.add_text(0.0, 0.0, "A B", 1.0, [1.0; 4]);
        assert_eq!(builder.vertices.len(), 8);
        assert_eq!(OverlayTextBuilder::measure("A B", 2.0), (36.0, 16.0));
    }

    #[test]
    fn panel_grows_upward_from_bottom() {
        let mut builder = OverlayTextBuilder::new(800.0, 600.0);
        let top = builder.add_panel(10.0, 590.0, &["one", "two"], 1.0, [1.0; 4], [0.0; 4]);
        assert!(top < 590.0);
        assert!((590.0 - top - (2.0 * 10.0 + 8.0)).abs() < 1e-4);
        assert!(!builder.is_empty());
    }
}
