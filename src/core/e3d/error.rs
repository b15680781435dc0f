use std::fmt;

/// Unrecoverable inconsistencies in the command stream received by the 3D engine.
/// They mean that the geometry coprocessor model upstream produced a state the real
/// hardware can never reach, so the emulation session is halted.
#[derive(Debug,Clone,PartialEq,Eq)]
pub enum E3dFault {
    /// A vertex was pushed while Vertex RAM was full
    VertexRamOverflow { capacity: usize },
    /// A polygon (or one of the two triangles of a quad) didn't fit Polygon RAM
    PolygonRamOverflow { capacity: usize, polygon: [usize;4] },
    /// A polygon referenced a vertex that is not in Vertex RAM (yet)
    BadVertexIndex { index: usize, vertex_count: usize, polygon: [usize;4] },
    /// Triangle setup found vertices not ordered by Y after sorting
    InvalidYOrder { polygon: usize, sy: [i32;3] },
    /// The engine thread is no longer draining commands
    EngineHalted,
    /// The engine thread died without reporting a fault
    WorkerPanicked,
}

impl fmt::Display for E3dFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            E3dFault::VertexRamOverflow { capacity } => {
                write!(f,"vertex RAM overflow: more than {} vertices in one frame",capacity)
            }
            E3dFault::PolygonRamOverflow { capacity, polygon } => {
                write!(f,"polygon RAM overflow: polygon {:?} exceeds {} triangles in one frame",polygon,capacity)
            }
            E3dFault::BadVertexIndex { index, vertex_count, polygon } => {
                write!(f,"wrong polygon index: {} (num vtx: {}) in polygon {:?}",index,vertex_count,polygon)
            }
            E3dFault::InvalidYOrder { polygon, sy } => {
                write!(f,"invalid y order in polygon #{}: {:?}",polygon,sy)
            }
            E3dFault::EngineHalted => write!(f,"3D engine halted"),
            E3dFault::WorkerPanicked => write!(f,"3D engine thread panicked"),
        }
    }
}

impl std::error::Error for E3dFault {}
