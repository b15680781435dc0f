use std::fs;
use std::path::{Path, PathBuf};
use image::RgbaImage;
use tracing::{info, warn};
use super::{FrameBuffer, Renderer};

/// Headless renderer: every frame is saved as frame_NNNNN.png in the output directory.
/// Without an output directory frames are only counted.
pub struct PngRenderer {
    output_dir: Option<PathBuf>,
    frames: u64,
}

impl PngRenderer {
    pub fn new(output_dir: Option<PathBuf>) -> Result<Self,String> {
        if let Some(dir) = &output_dir {
            fs::create_dir_all(dir).map_err(|e| format!("Cannot create output directory {}: {}",dir.display(),e))?;
            info!("Frames will be saved in {}",dir.display());
        }
        Ok(Self { output_dir, frames: 0 })
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn save(&self, dir: &Path, frame: &FrameBuffer) -> Result<(),String> {
        let image = RgbaImage::from_raw(frame.width() as u32, frame.height() as u32, frame.pixels().to_vec())
            .ok_or_else(|| format!("Invalid frame size {}x{}",frame.width(),frame.height()))?;
        let path = dir.join(format!("frame_{:05}.png",self.frames));
        image.save(&path).map_err(|e| format!("Cannot save {}: {}",path.display(),e))
    }
}

impl Renderer for PngRenderer {
    fn render_frame(&mut self, frame: FrameBuffer) {
        if let Some(dir) = &self.output_dir {
            if let Err(e) = self.save(dir, &frame) {
                warn!("{}",e);
            }
        }
        self.frames += 1;
    }

    fn set_warp_mode(&mut self, enabled: bool) {
        info!("Warp mode: {}",enabled);
    }

    fn set_paused(&mut self, paused: bool) {
        info!("Paused: {}",paused);
    }
}
