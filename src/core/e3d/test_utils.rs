use std::io::Write;
use std::sync::{Arc, Mutex};
use crate::core::e3d::command::E3dCommand;
use crate::core::e3d::vertex::Viewport;
use crate::core::fixed::Fixed12;

/// Clip space vertex (w = 1) landing exactly on (sx,sy) with the full screen viewport
pub fn screen_vertex(sx:i32,sy:i32) -> E3dCommand {
    let x = Fixed12::from_raw(sx * 32 - 0x1000);
    // 192 lines is not a power of two: round up so that the transform floors back to sy
    let y = Fixed12::from_raw((sy * 128 + 2) / 3 - 0x1000);
    E3dCommand::Vertex { x, y, z: Fixed12::ZERO, w: Fixed12::ONE }
}

pub fn triangle_at(points:[(i32,i32);3]) -> Vec<E3dCommand> {
    let mut cmds = vec![E3dCommand::SetViewport(Viewport::FULL_SCREEN)];
    cmds.extend(points.iter().map(|&(x,y)| screen_vertex(x,y)));
    cmds.push(E3dCommand::Polygon { vtx: [0,1,2,0], attr: 0 });
    cmds
}

/// Vec<u8> writer that can be inspected after being moved into the engine
#[derive(Clone)]
pub struct SharedBuffer(pub Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
