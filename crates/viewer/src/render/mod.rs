//! Per-frame drawing: scene batches, then labels and the help panel.

mod batches;

pub use batches::GpuScene;

use anyhow::Result;

use crate::hud::{self, HudSettings};
use crate::state::AppState;

/// Render one frame. Lost or outdated surfaces are reconfigured and the
/// frame is skipped.
pub fn run(state: &mut AppState) -> Result<()> {
    let (output, mut encoder) = match state.renderer.begin_frame() {
        Ok(frame) => frame,
        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
            log::debug!("Surface lost or outdated, reconfiguring");
            state.renderer.reconfigure();
            return Ok(());
        }
        Err(wgpu::SurfaceError::OutOfMemory) => {
            state.running = false;
            anyhow::bail!("GPU out of memory");
        }
        Err(e) => {
            log::warn!("Skipping frame: {}", e);
            return Ok(());
        }
    };
    let output_view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

    state.renderer.update_camera(&state.camera, &state.lighting);

    let frame = state.gpu_scene.frame_instances(&state.world, state.camera.position());
    let draws = state.gpu_scene.draw_batches(&frame);
    state.renderer.render_scene(&mut encoder, &output_view, &draws);

    let (width, height) = state.renderer.dimensions();
    let settings = HudSettings {
        show_help: state.config.show_help,
        show_labels: state.config.show_labels,
        scale: state.hud_scale(),
    };
    let overlay = hud::build_overlay(
        width as f32,
        height as f32,
        &state.scene.labels,
        state.controller.mode(),
        settings,
    );
    state.renderer.render_overlay(&mut encoder, &output_view, &overlay);

    state.renderer.end_frame(output, encoder);
    Ok(())
}
