use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use crate::core::e3d::frame::FrameSlot;

/// Writes a textual description of every prepared scene, for debugging the geometry pipeline
pub struct SceneDumper {
    out: Box<dyn Write + Send>,
}

impl SceneDumper {
    /// Creates (or truncates) the dump file
    pub fn create(path:&Path) -> Result<Self,String> {
        match File::create(path) {
            Ok(file) => Ok(Self::new(Box::new(BufWriter::new(file)))),
            Err(e) => Err(format!("Cannot create scene dump file {}: {}",path.display(),e)),
        }
    }

    pub fn new(out:Box<dyn Write + Send>) -> Self {
        Self { out }
    }

    pub fn write_scene(&mut self,slot:&FrameSlot) -> std::io::Result<()> {
        let vram = slot.vertices();
        writeln!(self.out,"begin scene")?;
        for (idx,poly) in slot.polygons().iter().enumerate() {
            let [v0,v1,v2] = [&vram[poly.vtx[0]],&vram[poly.vtx[1]],&vram[poly.vtx[2]]];
            writeln!(self.out,"tri {}:",idx)?;
            writeln!(self.out,"    ccoord: ({},{},{},{})-({},{},{},{})-({},{},{},{})",
                     v0.cx,v0.cy,v0.cz,v0.cw,
                     v1.cx,v1.cy,v1.cz,v1.cw,
                     v2.cx,v2.cy,v2.cz,v2.cw)?;
            writeln!(self.out,"    scoord: ({},{})-({},{})-({},{})",v0.sx,v0.sy,v1.sx,v1.sy,v2.sx,v2.sy)?;
        }
        self.out.flush()
    }
}
