use std::slice::ChunksExactMut;

pub const SCREEN_WIDTH : usize = 256;
pub const SCREEN_HEIGHT : usize = 192;

/// bit 15 of a layer pixel: the pixel is opaque and must be mixed by the compositor
pub const PIXEL_OPAQUE : u16 = 0x8000;

const fn generate_rgb5_to_rgb8_table() -> [u8; 32] {
    let mut table = [0u8; 32];
    let mut i = 0;
    while i < 32 {
        table[i] = ((i << 3) | (i >> 2)) as u8;
        i += 1;
    }
    table
}

static RGB5_TO_RGB8: [u8; 32] = generate_rgb5_to_rgb8_table();

/*
Layer buffer
One 256x192 layer as produced by a graphic engine, before being mixed with the other
layers by the compositor. Each pixel is 16 bit: RGB555 + opaque attribute (bit 15).
 */
#[derive(Debug,Clone)]
pub struct LayerBuffer {
    pixels: Vec<u16>,
}

impl LayerBuffer {
    pub fn new() -> Self {
        Self { pixels: vec![0;SCREEN_WIDTH * SCREEN_HEIGHT] }
    }

    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    #[inline]
    pub fn pixel(&self,x:usize,y:usize) -> u16 {
        self.pixels[y * SCREEN_WIDTH + x]
    }

    pub fn line(&self,y:usize) -> &[u16] {
        &self.pixels[y * SCREEN_WIDTH..(y + 1) * SCREEN_WIDTH]
    }

    /// Line cursor over the whole layer, top to bottom
    pub fn ctx(&mut self) -> LayerCtx<'_> {
        LayerCtx { lines: self.pixels.chunks_exact_mut(SCREEN_WIDTH) }
    }

    /// RGBA8 conversion, transparent pixels are painted with the backdrop color
    pub fn to_rgba(&self,backdrop:u16) -> Vec<u8> {
        let mut frame = vec![0u8;SCREEN_WIDTH * SCREEN_HEIGHT * 4];
        for (pixel,rgba) in self.pixels.iter().zip(frame.chunks_exact_mut(4)) {
            let pixel = if pixel & PIXEL_OPAQUE != 0 { *pixel } else { backdrop };
            rgba[0] = RGB5_TO_RGB8[(pixel & 0x1F) as usize];
            rgba[1] = RGB5_TO_RGB8[((pixel >> 5) & 0x1F) as usize];
            rgba[2] = RGB5_TO_RGB8[((pixel >> 10) & 0x1F) as usize];
            rgba[3] = 0xFF;
        }
        frame
    }
}

/// Yields each line of a layer exactly once
pub struct LayerCtx<'a> {
    lines: ChunksExactMut<'a,u16>,
}

impl<'a> LayerCtx<'a> {
    pub fn next_line(&mut self) -> Option<Line<'a>> {
        self.lines.next().map(Line)
    }
}

pub struct Line<'a>(&'a mut [u16]);

impl Line<'_> {
    #[inline]
    pub fn set16(&mut self,x:usize,value:u16) {
        self.0[x] = value;
    }
}
