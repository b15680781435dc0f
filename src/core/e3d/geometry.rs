use crossbeam_channel::Receiver;
use tracing::{debug, error, trace, warn};
use crate::core::e3d::command::E3dCommand;
use crate::core::e3d::dump::SceneDumper;
use crate::core::e3d::error::E3dFault;
use crate::core::e3d::frame::{FrameStore, SharedFrame, POLYGON_RAM_SIZE, VERTEX_RAM_SIZE};
use crate::core::e3d::polygon::RenderPolygon;
use crate::core::e3d::vertex::{RenderVertex, Viewport};
use crate::core::fixed::Fixed12;

/*
Geometry state machine.
Consumes the commands of the geometry coprocessor in order, building the next frame into
the "next" Vertex/Polygon RAM. Nothing here is shared with the display apart from the
frame promoted by SwapBuffers.
 */
pub struct GeometryEngine {
    store: FrameStore,
    viewport: Viewport,
    dumper: Option<SceneDumper>,
    dropped_polygons: usize,
}

impl GeometryEngine {
    pub fn new() -> Self {
        Self {
            store: FrameStore::new(),
            viewport: Viewport::default(),
            dumper: None,
            dropped_polygons: 0,
        }
    }

    pub fn set_dumper(&mut self,dumper:SceneDumper) {
        self.dumper = Some(dumper);
    }

    pub fn shared_frame(&self) -> SharedFrame {
        self.store.shared()
    }

    #[cfg(test)]
    pub fn store(&self) -> &FrameStore {
        &self.store
    }

    /// Drains the command FIFO until every producer has gone away or a fatal fault occurs
    pub fn run(&mut self,rx:Receiver<E3dCommand>) -> Result<(),E3dFault> {
        for cmd in rx.iter() {
            if let Err(fault) = self.execute(cmd) {
                error!("3D engine fault: {}",fault);
                return Err(fault);
            }
        }
        debug!("3D engine command FIFO closed");
        Ok(())
    }

    pub fn execute(&mut self,cmd:E3dCommand) -> Result<(),E3dFault> {
        match cmd {
            E3dCommand::SetViewport(viewport) => {
                trace!("E3D set viewport {:?}",viewport);
                self.viewport = viewport;
                Ok(())
            }
            E3dCommand::Vertex { x, y, z, w } => self.cmd_vertex(x,y,z,w),
            E3dCommand::Polygon { vtx, attr } => self.cmd_polygon(vtx,attr),
            E3dCommand::SwapBuffers => self.cmd_swap_buffers(),
        }
    }

    fn cmd_vertex(&mut self,x:Fixed12,y:Fixed12,z:Fixed12,w:Fixed12) -> Result<(),E3dFault> {
        let vram = &mut self.store.next_mut().vertices;
        if vram.len() >= VERTEX_RAM_SIZE {
            return Err(E3dFault::VertexRamOverflow { capacity: VERTEX_RAM_SIZE });
        }
        let vtx = RenderVertex::new(x,y,z,w);
        trace!("E3D vertex #{} ({},{},{},{}) {:?}",vram.len(),x,y,z,w,vtx.flags);
        vram.push(vtx);
        Ok(())
    }

    fn cmd_polygon(&mut self,vtx:[usize;4],attr:u32) -> Result<(),E3dFault> {
        let poly = RenderPolygon::new(vtx,attr);
        let count = poly.vertex_count();
        let slot = self.store.next_mut();

        // every index must be in range, even if the polygon ends up being dropped
        for &index in &poly.vtx[..count] {
            if index >= slot.vertices.len() {
                return Err(E3dFault::BadVertexIndex { index, vertex_count: slot.vertices.len(), polygon: vtx });
            }
        }

        // TODO: clip against the view volume instead of dropping the whole polygon
        if poly.vtx[..count].iter().any(|&i| slot.vertices[i].is_clipped()) {
            trace!("E3D polygon {:?} dropped: clipped",&poly.vtx[..count]);
            self.dropped_polygons += 1;
            return Ok(());
        }

        let needed = if poly.is_quad() { 2 } else { 1 };
        if slot.polygons.len() + needed > POLYGON_RAM_SIZE {
            return Err(E3dFault::PolygonRamOverflow { capacity: POLYGON_RAM_SIZE, polygon: vtx });
        }

        for &index in &poly.vtx[..count] {
            self.viewport.transform(&mut slot.vertices[index]);
        }

        if poly.is_quad() {
            slot.polygons.extend_from_slice(&poly.split_quad());
        }
        else {
            slot.polygons.push(poly);
        }
        Ok(())
    }

    fn cmd_swap_buffers(&mut self) -> Result<(),E3dFault> {
        // full-frame processing is done before taking the lock, the display may still be drawing
        self.store.next_mut().prepare()?;

        if let Some(dumper) = &mut self.dumper {
            if let Err(e) = dumper.write_scene(self.store.next()) {
                warn!("Cannot write scene dump, disabling it: {}",e);
                self.dumper = None;
            }
        }

        let (vertices,polygons) = (self.store.next().vertices().len(),self.store.next().polygons().len());
        let frame = self.store.swap();
        debug!("E3D frame #{} swapped: {} vertices, {} triangles, {} polygons dropped",frame,vertices,polygons,self.dropped_polygons);
        self.dropped_polygons = 0;
        Ok(())
    }
}
