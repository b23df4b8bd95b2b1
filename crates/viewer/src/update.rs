//! Per-frame update: drain input, advance the bodies, move the camera, project labels.

use glam::Vec2;
use solar_system::{kinematics, update_labels};

use crate::state::AppState;

/// Frames between FPS log lines.
const FPS_LOG_INTERVAL: u64 = 300;

impl AppState {
    pub(crate) fn update(&mut self) {
        self.time.update();

        self.process_input();
        kinematics::step(&mut self.world);
        self.controller.update(&mut self.camera, &self.movement);

        let (width, height) = self.renderer.dimensions();
        update_labels(
            &self.world,
            &mut self.scene.labels,
            self.camera.view_projection_matrix(),
            Vec2::new(width as f32, height as f32),
        );

        if self.time.frame_count() % FPS_LOG_INTERVAL == 0 {
            log::debug!(
                "Frame {} | {:.1} fps | {:.0}s elapsed",
                self.time.frame_count(),
                self.time.fps(),
                self.time.elapsed_seconds()
            );
        }
    }

    /// Apply every queued event in arrival order.
    fn process_input(&mut self) {
        let viewport_height = self.renderer.dimensions().1 as f32;
        for event in self.input_queue.drain() {
            self.input.apply(&event);
            self.movement.apply(&event);
            self.controller
                .handle_event(&event, &self.camera, self.input.mouse_position(), viewport_height);
        }
    }
}
