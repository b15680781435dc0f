use crate::core::config::Config;
use crate::core::e3d::HwEngine3d;
use crate::core::gfx::{LayerBuffer, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::core::scene;
use crate::log::Logger;
use crate::renderer::{FrameBuffer, GUIEvent, Renderer};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

pub const EMU_NAME : &str = "NDS 3D Engine";
pub const EMU_VERSION : &str = env!("CARGO_PKG_VERSION");
pub const EMU_BUILD_DATE_TIME : &str = build_time::build_time_local!("%Y-%m-%d %H:%M:%S");

const VERBOSE_LOG_LEVEL : &str = "debug";

pub struct Emulator {
    config: Config,
    logger: Logger,
    renderer: Box<dyn Renderer>,
    gui_event_rx: Receiver<GUIEvent>,
    layer: LayerBuffer,
    frame_period: Duration,
    frames: u64,
    warp_mode_enabled: bool,
    paused: bool,
    verbose: bool,
    base_log_level: String,
    last_throttle_timestamp: Instant,
}

impl Emulator {
    pub fn new(config:Config,logger: Logger,renderer:Box<dyn Renderer>,gui_event_rx: Receiver<GUIEvent>) -> Self {
        info!("Building emulator ...");
        let fps = config.display.fps.max(1);
        let base_log_level = logger.level().to_string();
        Self {
            config,
            logger,
            renderer,
            gui_event_rx,
            layer: LayerBuffer::new(),
            frame_period: Duration::from_secs_f64(1.0 / fps as f64),
            frames: 0,
            warp_mode_enabled: false,
            paused: false,
            verbose: false,
            base_log_level,
            last_throttle_timestamp: Instant::now(),
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /*
    Display loop. The 3D engine and the scene producer run on their own threads; here each
    display frame the current 3D frame is rasterized into the layer while holding the frame
    lock, then converted and handed to the renderer.
    Returns when the requested number of frames has been displayed (headless mode), or with
    an error as soon as the engine halted on a fatal fault.
     */
    pub fn emulate(&mut self) -> Result<(),String> {
        let engine = HwEngine3d::new(&self.config.engine)?;
        let stop = Arc::new(AtomicBool::new(false));
        let producer = scene::spawn_producer(engine.sender(),stop.clone(),self.frame_period)?;
        let max_frames = self.config.display.headless_frames;

        self.last_throttle_timestamp = Instant::now();
        while !engine.is_halted() {
            self.check_input();
            if self.paused {
                thread::sleep(Duration::from_millis(100));
                continue;
            }

            self.display_frame(&engine);
            self.frames += 1;
            if max_frames.is_some_and(|max| self.frames >= max) {
                break;
            }
            self.throttle();
        }

        stop.store(true,Ordering::Relaxed);
        if producer.join().is_err() {
            warn!("Scene producer panicked");
        }
        match engine.shutdown() {
            Ok(_) => {
                info!("Emulation stopped after {} frames",self.frames);
                Ok(())
            }
            Err(fault) => {
                // the fault itself has already been logged by the engine thread
                info!("Emulation halted after {} frames",self.frames);
                Err(fault.to_string())
            }
        }
    }

    fn display_frame(&mut self,engine:&HwEngine3d) {
        self.layer.clear();
        let mut frame = engine.begin_frame();
        let frame_count = frame.frame_count();
        frame.draw(&mut self.layer.ctx(),0,&self.config.raster);
        frame.end_frame();
        trace!("Display frame #{} shows 3D frame #{}",self.frames,frame_count);

        let rgba = self.layer.to_rgba(self.config.display.backdrop);
        self.renderer.render_frame(FrameBuffer::new(Arc::new(rgba),SCREEN_WIDTH,SCREEN_HEIGHT));
    }

    fn throttle(&mut self) {
        if !self.warp_mode_enabled {
            let elapsed = self.last_throttle_timestamp.elapsed();
            if elapsed < self.frame_period {
                thread::sleep(self.frame_period - elapsed);
            }
        }
        self.last_throttle_timestamp = Instant::now();
    }

    fn check_input(&mut self) {
        while let Ok(event) = self.gui_event_rx.try_recv() {
            match event {
                GUIEvent::Toggle3D => {
                    self.config.raster.layer_enabled ^= true;
                    info!("3D layer enabled: {}",self.config.raster.layer_enabled);
                }
                GUIEvent::WarpMode => {
                    self.warp_mode_enabled ^= true;
                    self.renderer.set_warp_mode(self.warp_mode_enabled);
                    info!("Throttling enabled: {}",!self.warp_mode_enabled);
                }
                GUIEvent::Paused => {
                    self.paused ^= true;
                    self.renderer.set_paused(self.paused);
                    if !self.paused {
                        self.last_throttle_timestamp = Instant::now();
                    }
                }
                GUIEvent::Verbose => {
                    self.verbose ^= true;
                    let level = if self.verbose { VERBOSE_LOG_LEVEL } else { self.base_log_level.as_str() };
                    match self.logger.set_log_level(level) {
                        Ok(_) => debug!("Log level set to {}",level),
                        Err(e) => warn!("{}",e),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{mpsc, Mutex};

    struct RecordingRenderer(Arc<Mutex<Vec<FrameBuffer>>>);

    impl Renderer for RecordingRenderer {
        fn render_frame(&mut self, frame: FrameBuffer) {
            self.0.lock().unwrap().push(frame);
        }
        fn set_warp_mode(&mut self, _enabled: bool) {}
        fn set_paused(&mut self, _paused: bool) {}
    }

    #[test]
    fn test_headless_run() {
        let mut config = Config::default();
        config.display.headless_frames = Some(5);
        config.display.fps = 240;
        let frames = Arc::new(Mutex::new(Vec::new()));
        let (gui_tx, gui_rx) = mpsc::channel();
        gui_tx.send(GUIEvent::WarpMode).unwrap();

        let mut emu = Emulator::new(config, Logger::new("warn"), Box::new(RecordingRenderer(frames.clone())), gui_rx);
        emu.emulate().unwrap();
        assert_eq!(emu.frames(), 5);

        let frames = frames.lock().unwrap();
        assert_eq!(frames.len(), 5);
        assert!(frames.iter().all(|f| f.pixels().len() == SCREEN_WIDTH * SCREEN_HEIGHT * 4));
    }
}
