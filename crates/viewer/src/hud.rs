//! Help panel, mode indicator and body labels drawn over the scene.

use renderer::OverlayTextBuilder;
use solar_system::Label;

use crate::camera_control::CameraMode;

pub const HELP_LINES: &[&str] = &[
    "Solar system controls",
    "",
    "Orbit view",
    " Rotate: drag with left mouse button",
    " Zoom: mouse wheel",
    "",
    "Fly view (press V)",
    " Move: W/A/S/D",
    " Up/Down: Space / Left Shift",
    " Look: hold left button and move mouse",
    " Switch view: V",
];

const MARGIN: f32 = 10.0;
const TEXT_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const PANEL_BG: [f32; 4] = [0.0, 0.0, 0.0, 0.6];
const LABEL_BG: [f32; 4] = [0.0, 0.0, 0.0, 0.5];
const MODE_COLOR: [f32; 4] = [1.0, 0.85, 0.4, 1.0];

/// What to draw on top of the scene this frame.
#[derive(Debug, Clone, Copy)]
pub struct HudSettings {
    pub show_help: bool,
    pub show_labels: bool,
    /// Glyph scale; 1.0 = 6x8 pixels.
    pub scale: f32,
}

/// Label text with its top-left corner at the projected body position.
pub fn draw_labels(builder: &mut OverlayTextBuilder, labels: &[Label], scale: f32) {
    for label in labels.iter().filter(|l| l.visible) {
        builder.add_text_with_bg(
            label.screen_position.x,
            label.screen_position.y,
            &label.text,
            scale,
            TEXT_COLOR,
            LABEL_BG,
        );
    }
}

/// Help panel anchored bottom-left with the mode indicator just above it.
pub fn draw_help(builder: &mut OverlayTextBuilder, mode: CameraMode, screen_height: f32, scale: f32) {
    let top = builder.add_panel(MARGIN, screen_height - MARGIN, HELP_LINES, scale, TEXT_COLOR, PANEL_BG);
    let (_, text_h) = OverlayTextBuilder::measure(mode.label(), scale);
    builder.add_text_with_bg(MARGIN, top - MARGIN - text_h - 4.0 * scale, mode.label(), scale, MODE_COLOR, PANEL_BG);
}

/// Build the whole overlay for one frame.
pub fn build_overlay(
    width: f32,
    height: f32,
    labels: &[Label],
    mode: CameraMode,
    settings: HudSettings,
) -> OverlayTextBuilder {
    let mut builder = OverlayTextBuilder::new(width, height);
    if settings.show_labels {
        draw_labels(&mut builder, labels, settings.scale);
    }
    if settings.show_help {
        draw_help(&mut builder, mode, height, settings.scale);
    }
    builder
}
