use serde::Deserialize;
use crate::core::e3d::frame::CurrentFrame;
use crate::core::gfx::{LayerCtx, SCREEN_HEIGHT, SCREEN_WIDTH};

/// Debug knobs of the 3D layer, read once per displayed frame
#[derive(Debug,Clone,Copy,PartialEq,Eq,Deserialize)]
#[serde(default)]
pub struct RasterConfig {
    pub layer_enabled: bool,
    pub fill_color: u16,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self { layer_enabled: true, fill_color: 0xFFFF }
    }
}

impl CurrentFrame {
    /*
    Scanline rasterization of the current frame, starting at screen line y.
    First every polygon is put in the bucket of each line it covers, then the lines are
    walked top to bottom filling the spans of the polygons active on that line. Spans
    are advanced incrementally, so lines must be drawn in order, one at a time.
     */
    pub fn draw(&mut self,ctx:&mut LayerCtx,mut y:i32,cfg:&RasterConfig) {
        if !cfg.layer_enabled {
            while ctx.next_line().is_some() {}
            return;
        }

        let vram = &self.slot.vertices;
        let polys = &mut self.slot.polygons;

        let mut poly_per_line : [Vec<u16>;SCREEN_HEIGHT] = std::array::from_fn(|_| Vec::new());
        for (idx,poly) in polys.iter_mut().enumerate() {
            poly.restart();
            let (top,bottom) = (vram[poly.vtx[0]].sy,vram[poly.vtx[2]].sy);
            for line in top.max(0)..=bottom.min(SCREEN_HEIGHT as i32 - 1) {
                poly_per_line[line as usize].push(idx as u16);
            }
        }

        let max_x = SCREEN_WIDTH as i32 - 1;
        while let Some(mut line) = ctx.next_line() {
            if (0..SCREEN_HEIGHT as i32).contains(&y) {
                for &idx in &poly_per_line[y as usize] {
                    let poly = &mut polys[idx as usize];
                    let (x0,x1) = poly.span();
                    for x in x0.max(0)..=x1.min(max_x) {
                        line.set16(x as usize,cfg.fill_color);
                    }
                    poly.step(y);
                }
            }
            y += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::e3d::command::E3dCommand;
    use crate::core::e3d::frame::lock_frame;
    use crate::core::e3d::geometry::GeometryEngine;
    use crate::core::e3d::test_utils::{screen_vertex, triangle_at};
    use crate::core::e3d::vertex::Viewport;
    use crate::core::fixed::Fixed12;
    use crate::core::gfx::LayerBuffer;

    fn render(cmds:Vec<E3dCommand>,cfg:&RasterConfig) -> LayerBuffer {
        let mut engine = GeometryEngine::new();
        for cmd in cmds {
            engine.execute(cmd).unwrap();
        }
        engine.execute(E3dCommand::SwapBuffers).unwrap();
        let shared = engine.shared_frame();
        let mut layer = LayerBuffer::new();
        lock_frame(&shared).draw(&mut layer.ctx(),0,cfg);
        layer
    }

    fn filled(layer:&LayerBuffer,y:usize) -> Vec<usize> {
        layer.line(y).iter().enumerate().filter(|(_,p)| **p != 0).map(|(x,_)| x).collect()
    }

    #[test]
    fn test_triangle_scenario() {
        let layer = render(triangle_at([(100,10),(50,50),(150,50)]),&RasterConfig::default());
        assert!(filled(&layer,9).is_empty());
        assert_eq!(filled(&layer,10),vec![100]);
        assert_eq!(filled(&layer,50),(50..=150).collect::<Vec<_>>());
        assert!(filled(&layer,51).is_empty());
        assert_eq!(layer.pixel(100,10),0xFFFF);
        // spans grow monotonically in the top half
        for y in 11..50 {
            assert!(filled(&layer,y).len() >= filled(&layer,y - 1).len(),"line {}",y);
        }
    }

    #[test]
    fn test_zero_height_top() {
        let layer = render(triangle_at([(50,20),(150,20),(100,60)]),&RasterConfig::default());
        assert!(filled(&layer,19).is_empty());
        assert_eq!(filled(&layer,20),(51..=150).collect::<Vec<_>>());
        assert!(filled(&layer,60).len() <= 2);
    }

    #[test]
    fn test_clipped_polygon_draws_nothing() {
        let cmds = vec![
            screen_vertex(100,10),
            screen_vertex(50,50),
            E3dCommand::Vertex { x: Default::default(), y: Default::default(), z: Default::default(), w: Default::default() },
            E3dCommand::Polygon { vtx: [0,1,2,0], attr: 0 },
        ];
        let layer = render(cmds,&RasterConfig::default());
        assert!((0..SCREEN_HEIGHT).all(|y| filled(&layer,y).is_empty()));
    }

    #[test]
    fn test_lines_below_screen_are_ignored() {
        let layer = render(triangle_at([(10,150),(200,192),(10,192)]),&RasterConfig::default());
        assert!(!filled(&layer,191).is_empty());
    }

    #[test]
    fn test_span_outside_screen_is_skipped() {
        // 512 pixels wide viewport: the right half of the triangle is off screen
        let vertex = |x:i32,y:i32| E3dCommand::Vertex { x: Fixed12::new(x), y: Fixed12::new(y), z: Fixed12::ZERO, w: Fixed12::ONE };
        let cmds = vec![
            E3dCommand::SetViewport(Viewport::new(0,0,511,191)),
            vertex(-1,-1),vertex(1,0),vertex(-1,0),
            E3dCommand::Polygon { vtx: [0,1,2,0], attr: 0 },
        ];
        let layer = render(cmds,&RasterConfig::default());
        assert_eq!(filled(&layer,96),(0..SCREEN_WIDTH).collect::<Vec<_>>());
        assert_eq!(filled(&layer,24),(0..=127).collect::<Vec<_>>());
    }

    #[test]
    fn test_disabled_layer_drains_lines() {
        let mut engine = GeometryEngine::new();
        for cmd in triangle_at([(100,10),(50,50),(150,50)]) {
            engine.execute(cmd).unwrap();
        }
        engine.execute(E3dCommand::SwapBuffers).unwrap();
        let shared = engine.shared_frame();
        let mut layer = LayerBuffer::new();
        let mut ctx = layer.ctx();
        let cfg = RasterConfig { layer_enabled: false, ..Default::default() };
        lock_frame(&shared).draw(&mut ctx,0,&cfg);
        assert!(ctx.next_line().is_none());
        assert!((0..SCREEN_HEIGHT).all(|y| filled(&layer,y).is_empty()));
    }

    #[test]
    fn test_frame_can_be_drawn_twice() {
        let mut engine = GeometryEngine::new();
        for cmd in triangle_at([(100,10),(50,50),(150,50)]) {
            engine.execute(cmd).unwrap();
        }
        engine.execute(E3dCommand::SwapBuffers).unwrap();
        let shared = engine.shared_frame();
        let cfg = RasterConfig { fill_color: 0x801F, ..Default::default() };

        let mut first = LayerBuffer::new();
        lock_frame(&shared).draw(&mut first.ctx(),0,&cfg);
        let mut second = LayerBuffer::new();
        lock_frame(&shared).draw(&mut second.ctx(),0,&cfg);
        for y in 0..SCREEN_HEIGHT {
            assert_eq!(first.line(y),second.line(y),"line {}",y);
        }
        assert_eq!(second.pixel(100,30),0x801F);
    }
}
