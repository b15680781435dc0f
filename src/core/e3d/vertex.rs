use bitflags::bitflags;
use crate::core::fixed::Fixed12;

bitflags! {
    #[derive(Debug,Copy,Clone,Default,PartialEq,Eq)]
    pub struct VertexFlags: u32 {
        const CLIP_LEFT = 1 << 0;
        const CLIP_RIGHT = 1 << 1;
        const CLIP_TOP = 1 << 2;
        const CLIP_BOTTOM = 1 << 3;
        const CLIP_NEAR = 1 << 4;
        const CLIP_FAR = 1 << 5;
        /// vertex has already been transformed to screen space
        const TRANSFORMED = 1 << 6;

        const CLIP_ANY = 0x3F;
    }
}

/// Viewport in pixel coordinates (0-255 / 0-191), bounds inclusive
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub struct Viewport {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport::FULL_SCREEN
    }
}

impl Viewport {
    pub const FULL_SCREEN : Viewport = Viewport { x0: 0, y0: 0, x1: 255, y1: 191 };

    pub const fn new(x0:i32,y0:i32,x1:i32,y1:i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.x1 - self.x0 + 1
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.y1 - self.y0 + 1
    }

    /*
    Clip space to screen space:
      sx = (v.x + v.w) * viewwidth / (2*v.w) + viewx0
      sy = (v.y + v.w) * viewheight / (2*v.w) + viewy0
      sz = (v.z + v.w) / (2*v.w)
    viewsize / (2*v.w) is computed in two steps: viewwidth can be 256<<12, which would overflow
    when further shifted in preparation for the division. The order of operations also
    determines the rounding, so it must not be rearranged.
    A vertex is transformed only once, even if shared by several polygons.
     */
    pub fn transform(&self,vtx:&mut RenderVertex) {
        if vtx.flags.contains(VertexFlags::TRANSFORMED) {
            return;
        }
        debug_assert!(vtx.cw.raw() > 0,"transforming a clipped vertex");

        let view_width = Fixed12::new(self.width());
        let view_height = Fixed12::new(self.height());
        let dx = view_width.div(2).div_fixed(vtx.cw);
        let dy = view_height.div(2).div_fixed(vtx.cw);

        vtx.sx = vtx.cx.add_fixed(vtx.cw).mul_fixed(dx).add(self.x0).to_i32();
        vtx.sy = vtx.cy.add_fixed(vtx.cw).mul_fixed(dy).add(self.y0).to_i32();
        vtx.sz = vtx.cz.add_fixed(vtx.cw).div(2).div_fixed(vtx.cw).to_i32();

        vtx.flags.insert(VertexFlags::TRANSFORMED);
    }
}

#[derive(Debug,Copy,Clone,Default)]
pub struct RenderVertex {
    // Coordinates in clip-space
    pub cx: Fixed12,
    pub cy: Fixed12,
    pub cz: Fixed12,
    pub cw: Fixed12,

    pub flags: VertexFlags,

    // Screen coordinates, valid once TRANSFORMED is set
    pub sx: i32,
    pub sy: i32,
    pub sz: i32,
}

impl RenderVertex {
    /// Builds a vertex from clip-space coordinates, computing its clipping flags.
    /// Depth (near/far) tests are not performed: only the w == 0 rule can set them.
    pub fn new(x:Fixed12,y:Fixed12,z:Fixed12,w:Fixed12) -> Self {
        let mut vtx = RenderVertex { cx: x, cy: y, cz: z, cw: w, ..Default::default() };

        let (cx,cy,cw) = (x.raw(),y.raw(),w.raw());
        if cx < cw.wrapping_neg() {
            vtx.flags.insert(VertexFlags::CLIP_LEFT);
        }
        if cx > cw {
            vtx.flags.insert(VertexFlags::CLIP_RIGHT);
        }
        if cy < cw.wrapping_neg() {
            vtx.flags.insert(VertexFlags::CLIP_TOP);
        }
        if cy > cw {
            vtx.flags.insert(VertexFlags::CLIP_BOTTOM);
        }

        // w == 0 can't be projected: the vertex is flagged as fully outside of the screen
        if cw == 0 {
            vtx.flags.insert(VertexFlags::CLIP_ANY);
        }

        vtx
    }

    #[inline]
    pub fn is_clipped(&self) -> bool {
        self.flags.intersects(VertexFlags::CLIP_ANY)
    }

    #[inline]
    pub fn is_transformed(&self) -> bool {
        self.flags.contains(VertexFlags::TRANSFORMED)
    }
}
