use std::path::Path;

use egui;
use winit::event::WindowEvent;
use winit::window::Window;

use crate::config::publish_tags;
use crate::engine::FrameStats;
use crate::expression::Emotion;
use crate::gaze::Direction;
use crate::renderer::{FramePresenter, Overlay};

/// The state the operator is about to publish.
#[derive(Clone, Copy, Default)]
pub struct PublishDraft {
    pub emotion: Emotion,
    pub direction: Direction,
}

pub fn inspector_panel(
    ctx: &egui::Context,
    stats: Option<&FrameStats>,
    draft: &mut PublishDraft,
    state_path: &Path,
) {
    egui::SidePanel::right("eye_inspector")
        .default_width(240.0)
        .show(ctx, |ui| {
            ui.heading("Eye Inspector");
            ui.separator();

            if let Some(stats) = stats {
                ui.label(format!("Emotion: {}", stats.state.emotion.as_str()));
                ui.label(format!("Direction: {}", stats.state.direction.as_str()));
                ui.label(format!(
                    "Blink: {} ({:.2})",
                    stats.blink_phase.as_str(),
                    stats.blink_amount
                ));
                for (name, offset) in ["Left", "Right"].iter().zip(stats.offsets) {
                    let [x, y] = offset;
                    ui.label(format!("{name} pupil: ({x:.1}, {y:.1})"));
                }
            }

            ui.separator();

            egui::CollapsingHeader::new("Publish")
                .default_open(true)
                .show(ui, |ui| {
                    egui::ComboBox::from_label("Emotion")
                        .selected_text(draft.emotion.as_str())
                        .show_ui(ui, |ui| {
                            for e in Emotion::ALL {
                                ui.selectable_value(&mut draft.emotion, e, e.as_str());
                            }
                        });
                    egui::ComboBox::from_label("Direction")
                        .selected_text(draft.direction.as_str())
                        .show_ui(ui, |ui| {
                            for d in Direction::ALL {
                                ui.selectable_value(&mut draft.direction, d, d.as_str());
                            }
                        });

                    if ui.button("Publish").clicked() {
                        let emotion = draft.emotion.as_str();
                        let direction = draft.direction.as_str();
                        if let Err(e) = publish_tags(state_path, emotion, direction) {
                            log::error!("publish failed: {e}");
                        }
                    }
                });

            ui.separator();
            ui.label(format!("Store: {}", state_path.display()));
        });
}

/// egui context, winit glue and wgpu renderer for the inspector panel.
pub struct InspectorOverlay {
    pub visible: bool,
    draft: PublishDraft,
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
    paint_jobs: Vec<egui::ClippedPrimitive>,
    textures: egui::TexturesDelta,
    screen: egui_wgpu::ScreenDescriptor,
}

impl InspectorOverlay {
    pub fn new(presenter: &FramePresenter) -> Self {
        let window = presenter.window();
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            ctx.viewport_id(),
            window.as_ref(),
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let renderer =
            egui_wgpu::Renderer::new(presenter.device(), presenter.format(), None, 1, false);
        let (width, height) = presenter.surface_size();

        Self {
            visible: false,
            draft: PublishDraft::default(),
            ctx,
            state,
            renderer,
            paint_jobs: Vec::new(),
            textures: egui::TexturesDelta::default(),
            screen: egui_wgpu::ScreenDescriptor {
                size_in_pixels: [width, height],
                pixels_per_point: window.scale_factor() as f32,
            },
        }
    }

    /// Returns true when egui consumed the event.
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.visible && self.state.on_window_event(window, event).consumed
    }

    /// Build this frame's UI; call before [`FramePresenter::present`].
    pub fn run(
        &mut self,
        window: &Window,
        surface_size: (u32, u32),
        stats: Option<&FrameStats>,
        state_path: &Path,
    ) {
        let raw_input = self.state.take_egui_input(window);
        let draft = &mut self.draft;
        let full_output = self.ctx.run(raw_input, |ctx| {
            inspector_panel(ctx, stats, draft, state_path);
        });
        self.state
            .handle_platform_output(window, full_output.platform_output);

        self.paint_jobs = self
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        self.textures.append(full_output.textures_delta);
        self.screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [surface_size.0, surface_size.1],
            pixels_per_point: window.scale_factor() as f32,
        };
    }
}

impl Overlay for InspectorOverlay {
    fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
    ) {
        for (id, delta) in &self.textures.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }
        self.renderer
            .update_buffers(device, queue, encoder, &self.paint_jobs, &self.screen);
    }

    fn paint(&self, pass: &mut wgpu::RenderPass<'static>) {
        self.renderer.render(pass, &self.paint_jobs, &self.screen);
    }

    fn finish(&mut self) {
        for id in &self.textures.free {
            self.renderer.free_texture(id);
        }
        self.textures = egui::TexturesDelta::default();
    }
}
