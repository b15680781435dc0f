use bitflags::bitflags;
use crate::core::e3d::error::E3dFault;
use crate::core::e3d::vertex::RenderVertex;
use crate::core::fixed::Fixed12;

bitflags! {
    /// Polygon attribute word. These flags match the polygon attribute defined by the
    /// geometry coprocessor.
    #[derive(Debug,Copy,Clone,Default,PartialEq,Eq)]
    pub struct PolygonFlags: u32 {
        const QUAD = 1 << 31;

        // the remaining attribute bits are carried along untouched
        const _ = !0;
    }
}

#[derive(Debug,Copy,Clone,Default)]
pub struct RenderPolygon {
    /// indices of vertices in Vertex RAM
    pub vtx: [usize;4],
    pub flags: PolygonFlags,

    /// y coordinate of the middle vertex
    pub hy: i32,

    // Slopes between vertices (left/right, top-half/bottom-half)
    pub dl0: Fixed12,
    pub dl1: Fixed12,
    pub dr0: Fixed12,
    pub dr1: Fixed12,

    // Current segment
    pub cx0: Fixed12,
    pub cx1: Fixed12,

    // Segment at the first drawn line
    start_cx0: Fixed12,
    start_cx1: Fixed12,
}

impl RenderPolygon {
    pub fn new(vtx:[usize;4],attr:u32) -> Self {
        Self { vtx, flags: PolygonFlags::from_bits_retain(attr), ..Default::default() }
    }

    #[inline]
    pub fn is_quad(&self) -> bool {
        self.flags.contains(PolygonFlags::QUAD)
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        if self.is_quad() { 4 } else { 3 }
    }

    /*
    Once clipping is done, quads are split in two triangles so that the renderer only
    cares about triangles. The second triangle reuses the first one with vertex #1
    replaced by vertex #3: (v0,v1,v2) and (v0,v3,v2). Both share the v0-v2 edge.
     */
    pub fn split_quad(&self) -> [RenderPolygon;2] {
        let mut p1 = *self;
        let mut p2 = *self;
        p1.flags.remove(PolygonFlags::QUAD);
        p2.flags.remove(PolygonFlags::QUAD);
        p2.vtx[1] = p2.vtx[3];
        [p1,p2]
    }

    /*
    Triangle setup, done once per frame before the frame is promoted to be drawn.
    1. sort the three vertices by screen Y (v0=top, v1=middle, v2=bottom)
    2. compute the four slopes (two of which are identical) assuming the middle vertex is
       on the left, then swap left and right if it isn't
    3. a zero-height top half is skipped by pre-stepping the span once, so the first line
       drawn is the middle vertex one
     */
    pub fn setup(&mut self,index:usize,vram:&[RenderVertex]) -> Result<(),E3dFault> {
        let sy = |i:usize| vram[i].sy;
        let vtx = &mut self.vtx;
        if sy(vtx[0]) > sy(vtx[1]) {
            vtx.swap(0,1);
        }
        if sy(vtx[0]) > sy(vtx[2]) {
            vtx.swap(0,2);
        }
        if sy(vtx[1]) > sy(vtx[2]) {
            vtx.swap(1,2);
        }
        let (v0,v1,v2) = (&vram[vtx[0]],&vram[vtx[1]],&vram[vtx[2]]);

        let hy1 = v1.sy - v0.sy;
        let hy2 = v2.sy - v1.sy;
        if hy1 < 0 || hy2 < 0 {
            return Err(E3dFault::InvalidYOrder { polygon: index, sy: [v0.sy,v1.sy,v2.sy] });
        }

        self.cx0 = Fixed12::new(v0.sx);
        self.cx1 = Fixed12::new(v0.sx);

        self.dl0 = if hy1 > 0 {
            Fixed12::new(v1.sx - v0.sx).div(hy1)
        } else {
            Fixed12::new(v1.sx - v0.sx)
        };
        self.dl1 = if hy2 > 0 {
            Fixed12::new(v2.sx - v1.sx).div(hy2)
        } else {
            Fixed12::new(v2.sx - v1.sx)
        };
        if hy1 + hy2 > 0 {
            self.dr0 = Fixed12::new(v2.sx - v0.sx).div(hy1 + hy2);
        } else {
            self.dr0 = Fixed12::ZERO;
        }
        self.dr1 = self.dr0;

        if self.dl0 > self.dr0 {
            std::mem::swap(&mut self.dl0,&mut self.dr0);
            std::mem::swap(&mut self.dl1,&mut self.dr1);
        }
        if hy1 == 0 {
            self.cx0 = self.cx0.add_fixed(self.dl0);
            self.cx1 = self.cx1.add_fixed(self.dr0);
        }

        self.hy = v1.sy;
        self.start_cx0 = self.cx0;
        self.start_cx1 = self.cx1;
        Ok(())
    }

    /// Rewinds the span to the first line, before a new drawing pass
    #[inline]
    pub fn restart(&mut self) {
        self.cx0 = self.start_cx0;
        self.cx1 = self.start_cx1;
    }

    /// Advances the span after line `y` has been drawn
    #[inline]
    pub fn step(&mut self,y:i32) {
        if y < self.hy {
            self.cx0 = self.cx0.add_fixed(self.dl0);
            self.cx1 = self.cx1.add_fixed(self.dr0);
        }
        else {
            self.cx0 = self.cx0.add_fixed(self.dl1);
            self.cx1 = self.cx1.add_fixed(self.dr1);
        }
    }

    /// Span of the current line, in pixels (inclusive)
    #[inline]
    pub fn span(&self) -> (i32,i32) {
        (self.cx0.to_i32(),self.cx1.to_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::e3d::vertex::VertexFlags;

    fn screen_vertex(sx:i32,sy:i32) -> RenderVertex {
        let mut v = RenderVertex::default();
        v.sx = sx;
        v.sy = sy;
        v.flags.insert(VertexFlags::TRANSFORMED);
        v
    }

    fn setup(points:&[(i32,i32)]) -> (RenderPolygon,Vec<RenderVertex>) {
        let vram : Vec<RenderVertex> = points.iter().map(|&(x,y)| screen_vertex(x,y)).collect();
        let mut poly = RenderPolygon::new([0,1,2,0],0);
        poly.setup(0,&vram).unwrap();
        (poly,vram)
    }

    #[test]
    fn test_quad_split_topology() {
        let quad = RenderPolygon::new([10,11,12,13],0x8000_0000 | 0x1F);
        assert_eq!(quad.vertex_count(),4);
        let [a,b] = quad.split_quad();
        assert_eq!(&a.vtx[..3],&[10,11,12]);
        assert_eq!(&b.vtx[..3],&[10,13,12]);
        assert!(!a.is_quad() && !b.is_quad());
        // other attribute bits survive the split
        assert_eq!(a.flags.bits(),0x1F);
    }

    #[test]
    fn test_setup_sorts_by_y() {
        let permutations = [[0,1,2],[0,2,1],[1,0,2],[1,2,0],[2,0,1],[2,1,0]];
        let vram = vec![screen_vertex(5,40),screen_vertex(80,3),screen_vertex(30,17)];
        for p in permutations {
            let mut poly = RenderPolygon::new([p[0],p[1],p[2],0],0);
            poly.setup(0,&vram).unwrap();
            let ys : Vec<i32> = poly.vtx[..3].iter().map(|&i| vram[i].sy).collect();
            assert_eq!(ys,vec![3,17,40],"permutation {:?}",p);
            assert_eq!(poly.hy,17);
        }
    }

    #[test]
    fn test_setup_slopes() {
        let (poly,_) = setup(&[(100,10),(50,50),(150,50)]);
        assert_eq!(poly.dl0,Fixed12::from_raw(-5120)); // -1.25
        assert_eq!(poly.dr0,Fixed12::from_raw(5120));
        // zero height bottom half: raw delta
        assert_eq!(poly.dl1,Fixed12::new(100));
        assert_eq!(poly.span(),(100,100));
        assert_eq!(poly.hy,50);
    }

    #[test]
    fn test_left_bound_never_starts_right_of_right_bound() {
        // middle vertex on the right side
        let (poly,_) = setup(&[(100,10),(150,50),(50,90)]);
        assert!(poly.dl0 <= poly.dr0);
        let mut poly = poly;
        for y in 10..90 {
            let (x0,x1) = poly.span();
            assert!(x0 <= x1,"line {}: {} > {}",y,x0,x1);
            poly.step(y);
        }
    }

    #[test]
    fn test_zero_height_top_is_prestepped() {
        let (poly,_) = setup(&[(50,20),(150,20),(100,60)]);
        // the first drawn line already starts from the flat top edge
        let (x0,x1) = poly.span();
        assert_eq!((x0,x1),(51,150));
        assert_eq!(poly.hy,20);
    }

    #[test]
    fn test_restart_rewinds_span() {
        let (mut poly,_) = setup(&[(100,10),(50,50),(150,50)]);
        for y in 10..30 {
            poly.step(y);
        }
        assert_ne!(poly.span(),(100,100));
        poly.restart();
        assert_eq!(poly.span(),(100,100));
    }

    #[test]
    fn test_flat_triangle() {
        // no height at all: the whole triangle is the span of its single line
        let (poly,_) = setup(&[(10,30),(20,30),(40,30)]);
        assert_eq!(poly.dl0,Fixed12::ZERO);
        assert_eq!(poly.span(),(10,20));
        assert_eq!(poly.hy,30);
    }
}
