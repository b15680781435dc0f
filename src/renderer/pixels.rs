use super::GUIEvent;
use super::{DisplayEvent, EmuStarter, FrameBuffer, Renderer};
use pixels::{wgpu, Pixels, PixelsBuilder, SurfaceTexture};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;
use tracing::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};
use crate::core::config::{Config, InputMapper};
use crate::core::emu::EMU_NAME;
use crate::core::gfx::{SCREEN_HEIGHT, SCREEN_WIDTH};

const FPS_PERIOD : f64 = 2.0;

pub struct PixelsDisplay {
    event_proxy: EventLoopProxy<DisplayEvent>,
}

impl PixelsDisplay {
    pub fn new(event_proxy: EventLoopProxy<DisplayEvent>) -> Self {
        Self { event_proxy }
    }
}

impl Renderer for PixelsDisplay {
    fn render_frame(&mut self, frame: FrameBuffer) {
        let _ = self.event_proxy.send_event(DisplayEvent::NewFrame(frame));
    }
    fn set_warp_mode(&mut self,enabled:bool) {
        let _ = self.event_proxy.send_event(DisplayEvent::WarpMode(enabled));
    }
    fn set_paused(&mut self,paused:bool) {
        let _ = self.event_proxy.send_event(DisplayEvent::Paused(paused));
    }
}

pub fn run_loop(start:EmuStarter<PixelsDisplay>,config:Config) -> Result<(),String> {
    let event_loop = EventLoop::<DisplayEvent>::with_user_event()
        .build()
        .map_err(|e| format!("Cannot create event loop: {}",e))?;

    event_loop.set_control_flow(ControlFlow::Wait);
    let proxy = event_loop.create_proxy();

    let (gui_event_tx, gui_event_rx) = mpsc::channel::<GUIEvent>();

    let mut gui = PixelsWindow::new(config.display.scale.max(1),gui_event_tx,config.input_mapper());
    thread::Builder::new()
        .name("emu".to_string())
        .spawn(move || start(PixelsDisplay::new(proxy),gui_event_rx,config))
        .map_err(|e| format!("Cannot start emulator thread: {}",e))?;

    event_loop.run_app(&mut gui).map_err(|e| format!("Event loop error: {}",e))
}

struct PixelsWindow {
    window: Option<&'static Window>,
    pixels: Option<Pixels<'static>>,
    scale: usize,
    fps_last: Instant,
    fps_frames: u32,
    gui_event_tx: mpsc::Sender<GUIEvent>,
    input_mapper: InputMapper,
    warp_mode: bool,
    paused: bool,
}

impl PixelsWindow {
    fn new(scale: usize,gui_event_tx: mpsc::Sender<GUIEvent>,input_mapper: InputMapper) -> Self {
        Self {
            window: None,
            pixels: None,
            scale,
            fps_last: Instant::now(),
            fps_frames: 0,
            gui_event_tx,
            input_mapper,
            warp_mode: false,
            paused: false,
        }
    }

    fn update_fps(&mut self,update_now:bool) {
        self.fps_frames += 1;
        let duration = self.fps_last.elapsed().as_secs_f64();
        if duration >= FPS_PERIOD || update_now {
            let fps = self.fps_frames as f64 / duration;
            if let Some(window) = self.window {
                let mut info = String::new();
                if self.warp_mode {
                    info.push_str(" - warp mode");
                }
                if self.paused {
                    info.push_str(" - paused");
                }
                window.set_title(&format!("{} - FPS: {:.2}{info}",EMU_NAME,fps));
            }
            self.fps_frames = 0;
            self.fps_last = Instant::now();
        }
    }

    fn new_frame(&mut self, frame: &FrameBuffer) {
        if let (Some(pixels),Some(window)) = (&mut self.pixels,self.window) {
            let frame_buffer = pixels.frame_mut();
            if frame_buffer.len() != frame.pixels().len() {
                warn!("Frame size mismatch: {}x{}",frame.width(),frame.height());
                return;
            }
            frame_buffer.copy_from_slice(frame.pixels());

            if let Err(e) = pixels.render() {
                warn!("Pixels render error: {}",e);
            }
            window.request_redraw();
        }
    }
}

impl ApplicationHandler<DisplayEvent> for PixelsWindow {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let window_attrs = Window::default_attributes()
            .with_title(EMU_NAME)
            .with_inner_size(winit::dpi::LogicalSize::new(
                (SCREEN_WIDTH * self.scale) as u32,
                (SCREEN_HEIGHT * self.scale) as u32,
            ))
            .with_resizable(true);

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => window,
            Err(e) => {
                error!("Cannot create window: {}",e);
                event_loop.exit();
                return;
            }
        };
        let window_ref: &'static Window = Box::leak(Box::new(window));

        let window_size = window_ref.inner_size();
        let surface_texture = SurfaceTexture::new(window_size.width, window_size.height,window_ref);
        let builder = PixelsBuilder::new(SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32, surface_texture)
            .request_adapter_options(wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            });
        let mut pixels = match builder.build() {
            Ok(pixels) => pixels,
            Err(e) => {
                error!("Cannot create pixels surface: {}",e);
                event_loop.exit();
                return;
            }
        };
        pixels.set_present_mode(wgpu::PresentMode::Fifo);
        info!("Window created: {}x{} scale {}",SCREEN_WIDTH,SCREEN_HEIGHT,self.scale);

        self.window = Some(window_ref);
        self.pixels = Some(pixels);

        self.fps_last = Instant::now();
        self.fps_frames = 0;

        window_ref.request_redraw();
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: DisplayEvent) {
        match event {
            DisplayEvent::NewFrame(frame) => {
                self.new_frame(&frame);
            }
            DisplayEvent::WarpMode(on) => {
                self.warp_mode = on;
                self.update_fps(true);
            }
            DisplayEvent::Paused(paused) => {
                self.paused = paused;
                self.update_fps(true);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(new_size) => {
                if let Some(pixels) = &mut self.pixels {
                    if let Err(e) = pixels.resize_surface(new_size.width, new_size.height) {
                        warn!("Pixels surface resize error: {}",e);
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                self.update_fps(false);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if !event.state.is_pressed() || event.repeat {
                    return;
                }
                if let PhysicalKey::Code(keycode) = event.physical_key {
                    if let Some(gui_event) = self.input_mapper.map_key(keycode) {
                        let _ = self.gui_event_tx.send(gui_event);
                    }
                }
            }
            _ => {}
        }
    }
}
