//! Window and event loop around [`EyeEngine`].

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

use crate::engine::{Clock, EyeEngine, QuitSignal};
use crate::error::EngineError;
use crate::renderer::FramePresenter;

#[cfg(feature = "gui")]
use crate::gui::InspectorOverlay;

struct App<C: Clock> {
    engine: EyeEngine<C>,
    quit: QuitSignal,
    title: String,
    state: Option<AppState>,
    error: Option<EngineError>,
}

struct AppState {
    window: Arc<Window>,
    presenter: FramePresenter,
    #[cfg(feature = "gui")]
    inspector: InspectorOverlay,
}

/// Run until `quit` is cancelled. The quit keys and a window close cancel it
/// too, so the loop has a single exit point checked once per frame.
/// Display acquisition failures are returned; everything else degrades.
pub fn run<C: Clock>(
    engine: EyeEngine<C>,
    title: &str,
    quit: QuitSignal,
) -> Result<(), EngineError> {
    let event_loop = EventLoop::new()?;
    let mut app = App {
        engine,
        quit,
        title: title.to_string(),
        state: None,
        error: None,
    };
    event_loop.run_app(&mut app)?;

    // Dropping the app state releases the surface and window.
    drop(app.state.take());
    match app.error {
        Some(e) => Err(e),
        None => {
            log::info!("render loop stopped");
            Ok(())
        }
    }
}

fn is_quit_key(key: &Key) -> bool {
    match key {
        Key::Named(NamedKey::Escape) => true,
        Key::Character(c) => c.as_str() == "q",
        _ => false,
    }
}

fn request_quit(quit: &QuitSignal, window: &Window) {
    log::info!("quit requested");
    quit.cancel();
    window.request_redraw();
}

impl<C: Clock> App<C> {
    fn init(&self, event_loop: &ActiveEventLoop) -> Result<AppState, EngineError> {
        let (width, height) = self.engine.size();
        let window = Arc::new(
            event_loop.create_window(
                Window::default_attributes()
                    .with_title(self.title.as_str())
                    .with_inner_size(winit::dpi::LogicalSize::new(width, height)),
            )?,
        );

        let presenter = pollster::block_on(FramePresenter::new(window.clone()))?;

        Ok(AppState {
            #[cfg(feature = "gui")]
            inspector: InspectorOverlay::new(&presenter),
            window,
            presenter,
        })
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if self.quit.is_cancelled() {
            event_loop.exit();
            return;
        }
        let Some(state) = &mut self.state else {
            return;
        };

        let canvas = self.engine.tick();

        #[cfg(feature = "gui")]
        {
            if state.inspector.visible {
                state.inspector.run(
                    &state.window,
                    state.presenter.surface_size(),
                    self.engine.last_frame(),
                    self.engine.config_source().path(),
                );
                state.presenter.present(&canvas, Some(&mut state.inspector));
            } else {
                state.presenter.present(&canvas, None);
            }
        }
        #[cfg(not(feature = "gui"))]
        state.presenter.present(&canvas, None);

        state.window.request_redraw();
    }
}

impl<C: Clock> ApplicationHandler for App<C> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        match self.init(event_loop) {
            Ok(state) => {
                log::info!(
                    "display ready, reading face state from {}",
                    self.engine.config_source().path().display()
                );
                state.window.request_redraw();
                self.state = Some(state);
            }
            Err(e) => {
                log::error!("display initialisation failed: {e}");
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        #[cfg(feature = "gui")]
        if state.inspector.on_window_event(&state.window, &event) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                request_quit(&self.quit, &state.window);
            }
            WindowEvent::Resized(new_size) => {
                state.presenter.resize(new_size.width, new_size.height);
                state.window.request_redraw();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => match logical_key {
                key if is_quit_key(&key) => request_quit(&self.quit, &state.window),
                #[cfg(feature = "gui")]
                Key::Named(NamedKey::Tab) => {
                    state.inspector.visible = !state.inspector.visible;
                }
                _ => {}
            },
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_keys() {
        assert!(is_quit_key(&Key::Named(NamedKey::Escape)));
        assert!(is_quit_key(&Key::Character("q".into())));
        assert!(!is_quit_key(&Key::Character("Q".into())));
        assert!(!is_quit_key(&Key::Character("w".into())));
        assert!(!is_quit_key(&Key::Named(NamedKey::Tab)));
    }
}
