use anyhow::{anyhow, Result};
use glam::Vec2;
use log::{debug, error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, WindowId};

use crate::demo::{Demo, KeyOutcome};
use crate::hud::{HudPresenter, HudSink};
use crate::input::{KeyCode, MouseButton};
use crate::raycast::pointer_to_ndc;
use crate::render::{CameraParams, LightParams, Renderer};

/// Window event loop driver shared by the desktop binary and the browser entry point.
pub struct App {
    renderer: Renderer,
    demo: Demo,
    hud: Box<dyn HudSink>,
    presenter: HudPresenter,
    /// Desktop draws the crosshair on the GPU; the browser uses a DOM overlay.
    draw_crosshair: bool,
    last_error: Option<anyhow::Error>,
}

impl App {
    pub fn new(
        renderer: Renderer,
        mut demo: Demo,
        hud: Box<dyn HudSink>,
        draw_crosshair: bool,
    ) -> Self {
        demo.set_aspect(renderer.aspect());
        let mut app = Self {
            renderer,
            demo,
            hud,
            presenter: HudPresenter::new(),
            draw_crosshair,
            last_error: None,
        };
        app.present_hud();
        app
    }

    pub fn demo(&self) -> &Demo {
        &self.demo
    }

    /// The error that stopped the loop, if any.
    pub fn take_error(&mut self) -> Option<anyhow::Error> {
        self.last_error.take()
    }

    fn process_window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        event: WindowEvent,
    ) -> Result<()> {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                self.renderer.resize(size);
                self.demo.set_aspect(self.renderer.aspect());
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                let size = self.renderer.window().inner_size();
                self.renderer.resize(size);
                self.demo.set_aspect(self.renderer.aspect());
            }
            WindowEvent::Focused(false) => self.release_pointer(),
            WindowEvent::KeyboardInput { event, .. } => self.handle_keyboard(&event),
            WindowEvent::CursorMoved { position, .. } => {
                let size = self.renderer.size();
                let ndc = pointer_to_ndc(
                    Vec2::new(position.x as f32, position.y as f32),
                    (size.width, size.height),
                );
                self.demo.set_pointer(ndc);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.handle_mouse_button(state, map_mouse_button(button));
            }
            WindowEvent::RedrawRequested => self.redraw()?,
            _ => {}
        }
        Ok(())
    }

    fn handle_keyboard(&mut self, event: &KeyEvent) {
        if event.repeat {
            return;
        }
        let Some(keycode) = map_keycode(&event.physical_key) else {
            return;
        };
        let pressed = event.state == ElementState::Pressed;
        if self.demo.handle_key(keycode, pressed) == KeyOutcome::Unlocked {
            self.release_cursor_grab();
        }
    }

    fn handle_mouse_button(&mut self, state: ElementState, button: MouseButton) {
        if state == ElementState::Pressed {
            if self.demo.handle_mouse_down() {
                info!("{}", self.demo.counter().label());
            }
            self.present_hud();
        }
        if requests_pointer_lock(state, button, self.demo.is_locked()) {
            self.request_pointer_lock();
        }
    }

    /// Desktop grabs synchronously, so the demo locks only when the grab succeeds.
    #[cfg(not(target_arch = "wasm32"))]
    fn request_pointer_lock(&mut self) {
        let window = self.renderer.window();
        let grabbed = window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
        if let Err(err) = &grabbed {
            warn!("Cursor grab unavailable: {err}");
        }
        if self.demo.set_pointer_locked(grabbed.is_ok()) {
            window.set_cursor_visible(false);
        }
    }

    /// The browser answers asynchronously; `sync_browser_pointer_lock` adopts the result.
    #[cfg(target_arch = "wasm32")]
    fn request_pointer_lock(&mut self) {
        if let Err(err) = self.renderer.window().set_cursor_grab(CursorGrabMode::Locked) {
            warn!("Pointer lock request failed: {err}");
        }
    }

    fn release_pointer(&mut self) {
        if self.demo.set_pointer_locked(false) {
            self.release_cursor_grab();
        }
    }

    fn release_cursor_grab(&self) {
        let window = self.renderer.window();
        if let Err(err) = window.set_cursor_grab(CursorGrabMode::None) {
            debug!("Failed to release cursor grab: {err}");
        }
        window.set_cursor_visible(true);
    }

    fn redraw(&mut self) -> Result<()> {
        self.demo.advance_frame();
        let camera = CameraParams::from_camera(self.demo.camera());
        let light = LightParams::from_lighting(&self.demo.scene().lights);
        self.renderer.update_globals(&camera, &light);
        self.present_hud();

        let crosshair = self.draw_crosshair.then(|| self.demo.crosshair());
        if let Err(err) = self.renderer.render(crosshair) {
            match err {
                wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                    let size = self.renderer.window().inner_size();
                    self.renderer.resize(size);
                }
                wgpu::SurfaceError::OutOfMemory => {
                    return Err(anyhow!("GPU is out of memory"));
                }
                wgpu::SurfaceError::Timeout => {
                    info!("Surface timeout; retrying next frame");
                }
                wgpu::SurfaceError::Other => {
                    warn!("Surface reported an unknown error; retrying next frame");
                }
            }
        }
        Ok(())
    }

    fn present_hud(&mut self) {
        self.presenter
            .present(self.hud.as_mut(), self.demo.counter(), self.demo.crosshair());
    }

    /// Browsers grant, deny and leave pointer lock on their own (Escape, tab
    /// switch), so the demo follows `document.pointerLockElement` both ways.
    #[cfg(target_arch = "wasm32")]
    fn sync_browser_pointer_lock(&mut self) {
        let locked = crate::web::pointer_locked();
        if locked == self.demo.is_locked() {
            return;
        }
        if locked {
            self.demo.set_pointer_locked(true);
            self.renderer.window().set_cursor_visible(false);
        } else {
            self.release_pointer();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Poll);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if window_id != self.renderer.window_id() {
            return;
        }
        if let Err(err) = self.process_window_event(event_loop, event) {
            error!("{err:?}");
            self.last_error = Some(err);
            event_loop.exit();
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.demo
                .handle_pointer_motion(Vec2::new(delta.0 as f32, delta.1 as f32));
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        #[cfg(target_arch = "wasm32")]
        self.sync_browser_pointer_lock();
        self.renderer.window().request_redraw();
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        info!("Exiting; {}", self.demo.counter().label());
    }
}

/// Left-button release while the pointer is free asks the platform for a lock.
/// A denied request leaves the demo unlocked, so the next click asks again.
fn requests_pointer_lock(state: ElementState, button: MouseButton, locked: bool) -> bool {
    state == ElementState::Released && button == MouseButton::LEFT && !locked
}

/// Translates a winit physical key into the demo's key identifier.
pub fn map_keycode(key: &PhysicalKey) -> Option<KeyCode> {
    let PhysicalKey::Code(code) = key else {
        return None;
    };
    Some(match code {
        WinitKeyCode::Escape => KeyCode::Escape,
        WinitKeyCode::KeyW => KeyCode::Character('W'),
        WinitKeyCode::KeyA => KeyCode::Character('A'),
        WinitKeyCode::KeyS => KeyCode::Character('S'),
        WinitKeyCode::KeyD => KeyCode::Character('D'),
        _ => return None,
    })
}

/// Maps winit buttons onto DOM button numbering (left 0, middle 1, right 2).
pub fn map_mouse_button(button: winit::event::MouseButton) -> MouseButton {
    use winit::event::MouseButton as WinitMouseButton;
    let index = match button {
        WinitMouseButton::Left => 0,
        WinitMouseButton::Middle => 1,
        WinitMouseButton::Right => 2,
        WinitMouseButton::Back => 3,
        WinitMouseButton::Forward => 4,
        WinitMouseButton::Other(value) => value.min(u8::MAX as u16) as u8,
    };
    MouseButton::new(index)
}
