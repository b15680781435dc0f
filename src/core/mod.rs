pub mod config;
pub mod e3d;
pub mod emu;
pub mod fixed;
pub mod gfx;
pub mod scene;
