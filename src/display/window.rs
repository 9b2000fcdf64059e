// Host window: winit event loop + pixels surface driving the emulator
//
// The event loop is the single executor: each redraw runs exactly one
// emulated frame (controller sample, `run_frame`, palette conversion,
// blit). Audio produced during the frame lands in the ring buffer via
// the emulator's sink.

use std::sync::Arc;
use std::time::{Duration, Instant};

use pixels::{Pixels, SurfaceTexture};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use super::FrameBuffer;
use crate::emulator::Emulator;
use crate::input::{Controller, KeyboardMapping};

/// NTSC field rate
const TARGET_FPS: u64 = 60;

/// Window parameters handed over by the CLI
pub struct HostOptions {
    pub title: String,
    /// Integer scale factor for the 256x240 output
    pub scale: u32,
    pub vsync: bool,
}

struct App {
    emulator: Emulator,
    framebuffer: FrameBuffer,
    mapping: KeyboardMapping,
    pad: Controller,
    paused: bool,

    options: HostOptions,
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    last_frame_time: Instant,
}

impl App {
    fn new(emulator: Emulator, options: HostOptions) -> Self {
        App {
            emulator,
            framebuffer: FrameBuffer::new(),
            mapping: KeyboardMapping::default(),
            pad: Controller::new(),
            paused: false,
            options,
            window: None,
            pixels: None,
            last_frame_time: Instant::now(),
        }
    }

    fn handle_key(&mut self, event: KeyEvent, event_loop: &ActiveEventLoop) {
        let pressed = event.state == ElementState::Pressed;

        if self.mapping.apply(event.physical_key, pressed, &mut self.pad) {
            return;
        }

        if !pressed {
            return;
        }
        match event.physical_key {
            PhysicalKey::Code(KeyCode::Escape) => event_loop.exit(),
            PhysicalKey::Code(KeyCode::KeyP) => self.paused = !self.paused,
            PhysicalKey::Code(KeyCode::KeyR) => self.emulator.reset(),
            _ => {}
        }
    }

    /// One emulated frame plus the blit
    fn render_frame(&mut self) -> Result<(), pixels::Error> {
        if !self.paused {
            self.emulator.set_controller(0, self.pad.to_byte());
            self.emulator.run_frame();
        }

        self.framebuffer.update(self.emulator.frame());

        if let Some(pixels) = &mut self.pixels {
            pixels
                .frame_mut()
                .copy_from_slice(self.framebuffer.as_bytes());
            pixels.render()?;
        }

        Ok(())
    }

    fn frame_due(&mut self) -> bool {
        let frame_duration = Duration::from_micros(1_000_000 / TARGET_FPS);
        if self.last_frame_time.elapsed() >= frame_duration {
            self.last_frame_time = Instant::now();
            true
        } else {
            false
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let width = FrameBuffer::width() * self.options.scale;
        let height = FrameBuffer::height() * self.options.scale;

        let attributes = Window::default_attributes()
            .with_title(self.options.title.clone())
            .with_inner_size(LogicalSize::new(width, height))
            .with_resizable(false);

        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .expect("failed to create window"),
        );

        let size = window.inner_size();
        let surface = SurfaceTexture::new(size.width, size.height, window.clone());
        let pixels = Pixels::new(FrameBuffer::width(), FrameBuffer::height(), surface)
            .expect("failed to create pixel surface");

        self.window = Some(window);
        self.pixels = Some(pixels);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event, event_loop),

            WindowEvent::RedrawRequested => {
                if self.frame_due() {
                    if let Err(err) = self.render_frame() {
                        log::error!("render failed: {}", err);
                        event_loop.exit();
                    }
                }

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Open the window and run the emulator until the user quits. The
/// emulator is dropped on return, which flushes battery WRAM.
pub fn run(emulator: Emulator, options: HostOptions) -> Result<(), Box<dyn std::error::Error>> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(if options.vsync {
        ControlFlow::Wait
    } else {
        ControlFlow::Poll
    });

    let mut app = App::new(emulator, options);
    event_loop.run_app(&mut app)?;

    Ok(())
}
