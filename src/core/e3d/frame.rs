use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use crate::core::e3d::error::E3dFault;
use crate::core::e3d::polygon::RenderPolygon;
use crate::core::e3d::vertex::RenderVertex;

pub const VERTEX_RAM_SIZE : usize = 4096;
pub const POLYGON_RAM_SIZE : usize = 4096;

/*
One generation of Vertex RAM + Polygon RAM.
Only two slots exist (bank 0 and bank 1): they are allocated once and then reused
alternately, clearing them by truncation.
 */
#[derive(Debug)]
pub struct FrameSlot {
    bank: usize,
    pub(super) vertices: Vec<RenderVertex>,
    pub(super) polygons: Vec<RenderPolygon>,
}

impl FrameSlot {
    fn new(bank:usize) -> Self {
        Self {
            bank,
            vertices: Vec::with_capacity(VERTEX_RAM_SIZE),
            polygons: Vec::with_capacity(POLYGON_RAM_SIZE),
        }
    }

    #[cfg(test)]
    pub fn bank(&self) -> usize {
        self.bank
    }

    pub fn vertices(&self) -> &[RenderVertex] {
        &self.vertices
    }

    pub fn polygons(&self) -> &[RenderPolygon] {
        &self.polygons
    }

    fn clear(&mut self) {
        self.vertices.clear();
        self.polygons.clear();
    }

    /// Runs triangle setup on every stored polygon
    pub(super) fn prepare(&mut self) -> Result<(),E3dFault> {
        for (index,poly) in self.polygons.iter_mut().enumerate() {
            poly.setup(index,&self.vertices)?;
        }
        Ok(())
    }
}

/// The frame being displayed, shared between the geometry thread and the display
#[derive(Debug)]
pub struct CurrentFrame {
    frame_count: u64,
    pub(super) slot: FrameSlot,
}

impl CurrentFrame {
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    #[cfg(test)]
    pub fn slot(&self) -> &FrameSlot {
        &self.slot
    }
}

pub type SharedFrame = Arc<Mutex<CurrentFrame>>;

/// Locks the current frame. A panic on the other side can't leave the slot half swapped,
/// so a poisoned lock is simply taken over.
pub fn lock_frame(frame:&Mutex<CurrentFrame>) -> MutexGuard<'_,CurrentFrame> {
    frame.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct FrameStore {
    next: FrameSlot,
    current: SharedFrame,
}

impl FrameStore {
    pub fn new() -> Self {
        Self {
            next: FrameSlot::new(0),
            current: Arc::new(Mutex::new(CurrentFrame { frame_count: 0, slot: FrameSlot::new(1) })),
        }
    }

    pub fn next(&self) -> &FrameSlot {
        &self.next
    }

    pub(super) fn next_mut(&mut self) -> &mut FrameSlot {
        &mut self.next
    }

    pub fn shared(&self) -> SharedFrame {
        self.current.clone()
    }

    /*
    Promotes "next" to "current". The two slots are exchanged while holding the lock, so the
    display never sees a slot that is being refilled: the old current one becomes the new
    (empty) next. Returns the new frame counter.
     */
    pub fn swap(&mut self) -> u64 {
        let mut current = lock_frame(&self.current);
        current.frame_count += 1;
        std::mem::swap(&mut current.slot,&mut self.next);
        self.next.clear();
        debug_assert_eq!(self.next.bank as u64,current.frame_count & 1);
        current.frame_count
    }
}
