use std::ops::Add;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, info};
use crate::core::e3d::command::{E3dCommand, E3dSender};
use crate::core::e3d::polygon::PolygonFlags;
use crate::core::e3d::vertex::Viewport;
use crate::core::fixed::Fixed12;

#[derive(Debug, Clone, Copy, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn rotate_y(self, angle: f32) -> Vec3 {
        let (sin, cos) = angle.sin_cos();
        Vec3::new(self.x * cos + self.z * sin, self.y, -self.x * sin + self.z * cos)
    }

    pub fn rotate_x(self, angle: f32) -> Vec3 {
        let (sin, cos) = angle.sin_cos();
        Vec3::new(self.x, self.y * cos - self.z * sin, self.y * sin + self.z * cos)
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

const CUBE_VERTICES : [Vec3;8] = [
    Vec3::new(-1.0, -1.0, -1.0),
    Vec3::new( 1.0, -1.0, -1.0),
    Vec3::new( 1.0,  1.0, -1.0),
    Vec3::new(-1.0,  1.0, -1.0),
    Vec3::new(-1.0, -1.0,  1.0),
    Vec3::new( 1.0, -1.0,  1.0),
    Vec3::new( 1.0,  1.0,  1.0),
    Vec3::new(-1.0,  1.0,  1.0),
];

const CUBE_FACES : [[usize;4];6] = [
    [0, 1, 2, 3],
    [5, 4, 7, 6],
    [4, 0, 3, 7],
    [1, 5, 6, 2],
    [4, 5, 1, 0],
    [3, 2, 6, 7],
];

const FOV_Y : f32 = std::f32::consts::FRAC_PI_3;
const NEAR : f32 = 1.0;
const FAR : f32 = 32.0;
const ASPECT : f32 = 256.0 / 192.0;

/*
Demo scene
Plays the role of the geometry coprocessor: a cube spinning in front of the camera,
projected to clip space and sent as quads, one full frame per call.
 */
pub struct CubeScene {
    position: Vec3,
    angle_x: f32,
    angle_y: f32,
    speed: f32,
}

impl CubeScene {
    pub fn new() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            angle_x: 0.4,
            angle_y: 0.0,
            speed: 0.02,
        }
    }

    /// perspective projection, screen y grows downward
    fn project(v: Vec3) -> [Fixed12;4] {
        let f = 1.0 / (FOV_Y / 2.0).tan();
        let x = v.x * f / ASPECT;
        let y = -v.y * f;
        let z = v.z * (FAR + NEAR) / (FAR - NEAR) - 2.0 * FAR * NEAR / (FAR - NEAR);
        let w = v.z;
        [Fixed12::from_f32(x), Fixed12::from_f32(y), Fixed12::from_f32(z), Fixed12::from_f32(w)]
    }

    pub fn frame_commands(&mut self) -> Vec<E3dCommand> {
        let mut cmds = Vec::with_capacity(2 + CUBE_VERTICES.len() + CUBE_FACES.len());
        cmds.push(E3dCommand::SetViewport(Viewport::FULL_SCREEN));
        for v in CUBE_VERTICES {
            let [x, y, z, w] = Self::project(v.rotate_y(self.angle_y).rotate_x(self.angle_x) + self.position);
            cmds.push(E3dCommand::Vertex { x, y, z, w });
        }
        for face in CUBE_FACES {
            cmds.push(E3dCommand::Polygon { vtx: face, attr: PolygonFlags::QUAD.bits() });
        }
        cmds.push(E3dCommand::SwapBuffers);

        self.angle_y += self.speed;
        self.angle_x += self.speed * 0.5;
        cmds
    }
}

/// Runs the scene on its own thread, one frame every `period`, until `stop` is set
/// or the engine stops accepting commands
pub fn spawn_producer(sender: E3dSender, stop: Arc<AtomicBool>, period: Duration) -> Result<JoinHandle<()>,String> {
    thread::Builder::new()
        .name("scene".to_string())
        .spawn(move || {
            let mut scene = CubeScene::new();
            let mut frames = 0u64;
            info!("Scene producer started");
            while !stop.load(Ordering::Relaxed) {
                for cmd in scene.frame_commands() {
                    if let Err(e) = sender.send(cmd) {
                        debug!("Scene producer stopped after {} frames: {}", frames, e);
                        return;
                    }
                }
                frames += 1;
                thread::sleep(period);
            }
            debug!("Scene producer stopped after {} frames", frames);
        })
        .map_err(|e| format!("Cannot start scene thread: {}", e))
}
