pub mod pixels;
pub mod png;

use std::sync::{mpsc, Arc};
use crate::core::config::Config;

#[derive(Debug, Clone)]
pub enum DisplayEvent {
    NewFrame(FrameBuffer),
    WarpMode(bool),
    Paused(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GUIEvent {
    Toggle3D,
    WarpMode,
    Paused,
    Verbose,
}

/*
Frame Buffer Structure
Holds a frame to be presented by a renderer.
Each pixel is represented by 4 bytes (RGBA).
 */
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    frame: Arc<Vec<u8>>,
    width: usize,
    height: usize,
}

impl FrameBuffer {
    pub fn new(frame: Arc<Vec<u8>>, width: usize, height: usize) -> FrameBuffer {
        FrameBuffer { frame, width, height }
    }

    pub fn pixels(&self) -> &[u8] {
        &self.frame
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }
}

pub type EmuStarter<R> = fn(R,mpsc::Receiver<GUIEvent>,Config);

pub trait Renderer {
    fn render_frame(&mut self, frame: FrameBuffer);
    fn set_warp_mode(&mut self,enabled:bool);
    fn set_paused(&mut self,paused:bool);
}
