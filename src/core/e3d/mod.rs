pub mod command;
pub mod dump;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod polygon;
pub mod raster;
pub mod vertex;
#[cfg(test)]
pub(crate) mod test_utils;

use std::sync::MutexGuard;
use std::thread;
use std::thread::JoinHandle;
use tracing::{info, warn};
use crate::core::config::E3dConfig;
use crate::core::e3d::command::E3dSender;
use crate::core::e3d::dump::SceneDumper;
use crate::core::e3d::error::E3dFault;
use crate::core::e3d::frame::{lock_frame, CurrentFrame, SharedFrame};
use crate::core::e3d::geometry::GeometryEngine;
use crate::core::e3d::raster::RasterConfig;
use crate::core::gfx::LayerCtx;

/*
3D engine
The geometry coprocessor pushes commands into a bounded FIFO; a dedicated thread ("e3d")
drains it and builds the next frame. The display side only sees the current frame, while
holding the frame lock between begin_frame and the end of the frame.
 */
pub struct HwEngine3d {
    sender: E3dSender,
    current: SharedFrame,
    worker: JoinHandle<Result<(),E3dFault>>,
}

impl HwEngine3d {
    pub fn new(config:&E3dConfig) -> Result<Self,String> {
        let capacity = config.command_queue_capacity.max(1);
        let (sender,rx) = command::channel(capacity);

        let mut geometry = GeometryEngine::new();
        if let Some(path) = &config.dump_scene {
            match SceneDumper::create(path) {
                Ok(dumper) => {
                    info!("3D scenes will be dumped to {}",path.display());
                    geometry.set_dumper(dumper);
                }
                Err(e) => warn!("{}",e),
            }
        }
        let current = geometry.shared_frame();

        let worker = thread::Builder::new()
            .name("e3d".to_string())
            .spawn(move || geometry.run(rx))
            .map_err(|e| format!("Cannot start 3D engine thread: {}",e))?;

        info!("3D engine started, command FIFO capacity {}",capacity);
        Ok(Self { sender, current, worker })
    }

    /// New producer handle for the geometry coprocessor
    pub fn sender(&self) -> E3dSender {
        self.sender.clone()
    }

    /// The engine thread stopped: a fatal fault occurred (see shutdown)
    pub fn is_halted(&self) -> bool {
        self.worker.is_finished()
    }

    /// Acquires the current frame until the guard is dropped
    pub fn begin_frame(&self) -> FrameGuard<'_> {
        FrameGuard { frame: lock_frame(&self.current) }
    }

    /// Closes the FIFO and waits for the engine thread. Every other producer handle
    /// must be dropped already, otherwise this blocks.
    pub fn shutdown(self) -> Result<(),E3dFault> {
        drop(self.sender);
        match self.worker.join() {
            Ok(result) => result,
            Err(_) => Err(E3dFault::WorkerPanicked),
        }
    }
}

pub struct FrameGuard<'a> {
    frame: MutexGuard<'a,CurrentFrame>,
}

impl FrameGuard<'_> {
    pub fn frame_count(&self) -> u64 {
        self.frame.frame_count()
    }

    pub fn draw(&mut self,ctx:&mut LayerCtx,y:i32,cfg:&RasterConfig) {
        self.frame.draw(ctx,y,cfg);
    }

    pub fn end_frame(self) {}
}
