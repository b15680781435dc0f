use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use serde::Deserialize;
use winit::keyboard::KeyCode;
use crate::core::e3d::command::DEFAULT_QUEUE_CAPACITY;
use crate::core::e3d::raster::RasterConfig;
use crate::renderer::GUIEvent;

pub fn parse_keycode(s: &str) -> Option<KeyCode> {
    match s {
        "F1" => Some(KeyCode::F1),
        "F2" => Some(KeyCode::F2),
        "F3" => Some(KeyCode::F3),
        "F4" => Some(KeyCode::F4),
        "F5" => Some(KeyCode::F5),
        "F6" => Some(KeyCode::F6),
        "F7" => Some(KeyCode::F7),
        "F8" => Some(KeyCode::F8),
        "F9" => Some(KeyCode::F9),
        "F10" => Some(KeyCode::F10),
        "F11" => Some(KeyCode::F11),
        "F12" => Some(KeyCode::F12),

        "Enter" | "Return" => Some(KeyCode::Enter),
        "Space" => Some(KeyCode::Space),
        "Escape" | "Esc" => Some(KeyCode::Escape),
        "Tab" => Some(KeyCode::Tab),
        "Backspace" => Some(KeyCode::Backspace),

        "KeyD" | "D" => Some(KeyCode::KeyD),
        "KeyL" | "L" => Some(KeyCode::KeyL),
        "KeyP" | "P" => Some(KeyCode::KeyP),
        "KeyW" | "W" => Some(KeyCode::KeyW),
        "Digit3" | "3" => Some(KeyCode::Digit3),

        _ => None,
    }
}

/// Geometry engine settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct E3dConfig {
    pub command_queue_capacity: usize,
    /// if set, every prepared scene is appended to this file
    pub dump_scene: Option<PathBuf>,
}

impl Default for E3dConfig {
    fn default() -> Self {
        Self {
            command_queue_capacity: DEFAULT_QUEUE_CAPACITY,
            dump_scene: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub scale: usize,
    pub fps: u32,
    /// RGB555 color of the pixels not covered by the 3D layer
    pub backdrop: u16,
    /// run without window for the given number of frames
    pub headless_frames: Option<u64>,
    /// where headless frames are saved as PNG
    pub output_dir: Option<PathBuf>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            scale: 3,
            fps: 60,
            backdrop: 0x8000 | (8 << 10) | (4 << 5) | 4,
            headless_frames: None,
            output_dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeyMapping {
    pub toggle_3d: String,
    pub warp_mode: String,
    pub pause: String,
    pub verbose: String,
}

impl Default for KeyMapping {
    fn default() -> Self {
        Self {
            toggle_3d: "F2".to_string(),
            warp_mode: "F1".to_string(),
            pause: "Space".to_string(),
            verbose: "F3".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InputMapper {
    key_map: HashMap<KeyCode, GUIEvent>,
}

impl InputMapper {
    pub fn map_key(&self, key: KeyCode) -> Option<GUIEvent> {
        self.key_map.get(&key).copied()
    }

    pub fn from_config(config: &KeyMapping) -> Self {
        let mut key_map = HashMap::new();
        let bindings = [
            (&config.toggle_3d, GUIEvent::Toggle3D),
            (&config.warp_mode, GUIEvent::WarpMode),
            (&config.pause, GUIEvent::Paused),
            (&config.verbose, GUIEvent::Verbose),
        ];
        for (key, event) in bindings {
            match parse_keycode(key) {
                Some(code) => {
                    key_map.insert(code, event);
                }
                None => tracing::warn!("Unknown key '{}' for {:?}, ignored", key, event),
            }
        }

        Self {
            key_map,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    pub engine: E3dConfig,
    pub raster: RasterConfig,
    pub display: DisplayConfig,
    pub keys: KeyMapping,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            engine: E3dConfig::default(),
            raster: RasterConfig::default(),
            display: DisplayConfig::default(),
            keys: KeyMapping::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Config, String> {
        match fs::read_to_string(path) {
            Ok(yaml) => Config::from_yaml(&yaml).map_err(|e| format!("{}: {}", path.display(), e)),
            Err(e) => Err(format!("Cannot read configuration file {}: {}", path.display(), e)),
        }
    }

    pub fn from_yaml(yaml: &str) -> Result<Config, String> {
        serde_yaml::from_str(yaml).map_err(|e| format!("Invalid configuration: {}", e))
    }

    pub fn input_mapper(&self) -> InputMapper {
        InputMapper::from_config(&self.keys)
    }
}
