use crate::{
    error::{DemoError, Result},
    input::KeyBindings,
};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

pub const DEFAULT_CONFIG_PATH: &str = "assets/config.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub window: WindowConfig,
    pub logging: LoggingSection,
    pub camera: CameraConfig,
    pub player: PlayerConfig,
    pub lamp: LampConfig,
    pub assets: AssetsConfig,
    pub keys: KeyBindings,
    pub clear_color: Color,
}

impl DemoConfig {
    /// Reads the config at `path`. `Ok(None)` means the file doesn't exist
    /// and the caller should fall back to defaults; a malformed file is an
    /// error.
    pub fn load(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(src) => Self::from_json(&src, path).map(Some),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(DemoError::io(path, err)),
        }
    }

    pub fn from_json(src: &str, origin: &Path) -> Result<Self> {
        serde_json::from_str(src).map_err(|source| DemoError::Config {
            path: origin.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub vsync: bool,
    pub max_fps: Option<f64>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Dungeon remake!!".to_string(),
            vsync: true,
            max_fps: None,
        }
    }
}

impl WindowConfig {
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub filter: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub offset: Vec3,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            offset: Vec3::new(0.0, -4.0, 8.0),
            fov: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub acceleration: f32,
    pub max_speed: f32,
    pub friction: f32,
    pub collide_with_walls: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            acceleration: 40.0,
            max_speed: 6.0,
            friction: 30.0,
            collide_with_walls: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LampConfig {
    pub color: Vec3,
    /// Constant, linear and quadratic terms.
    pub attenuation: Vec3,
    pub orbit_radius: f32,
    pub bob_amplitude: f32,
    pub bob_frequency: f32,
    pub height: f32,
    pub scale: f32,
}

impl Default for LampConfig {
    fn default() -> Self {
        Self {
            color: Vec3::new(1.0, 1.0, 1.0),
            attenuation: Vec3::new(1.0, 0.0, 0.0075),
            orbit_radius: 10.0,
            bob_amplitude: 2.0,
            bob_frequency: 5.0,
            height: 3.0,
            scale: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    pub level_vert: PathBuf,
    pub level_frag: PathBuf,
    pub lamp_frag: PathBuf,
    pub tileset: PathBuf,
    pub tileset_columns: u32,
    pub tileset_rows: u32,
    pub lamp_texture: PathBuf,
    pub level: PathBuf,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            level_vert: "assets/shaders/basic.vert".into(),
            level_frag: "assets/shaders/basic.frag".into(),
            lamp_frag: "assets/shaders/lamp.frag".into(),
            tileset: "assets/textures/tileset.png".into(),
            tileset_columns: 4,
            tileset_rows: 4,
            lamp_texture: "assets/textures/lamp.png".into(),
            level: "assets/levels/dungeon.txt".into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl From<Vec3> for glm::Vec3 {
    fn from(v: Vec3) -> Self {
        glm::vec3(v.x, v.y, v.z)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for Color {
    fn default() -> Self {
        Self {
            r: 0.0,
            g: 0.05,
            b: 0.1,
            a: 1.0,
        }
    }
}
