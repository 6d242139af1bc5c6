use crate::error::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub lights: Vec<LightConfig>,
    #[serde(default)]
    pub objects: Vec<ObjectConfig>,
    #[serde(default)]
    pub animation: AnimationConfig,
}

impl Default for Config {
    /// A lit cube in front of the camera, plus a sun.
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            camera: CameraConfig::default(),
            lights: vec![
                LightConfig {
                    r#type: "sun".to_string(),
                    direction: Some([0.4, 1.0, 0.6]),
                    strength: 0.8,
                    ..LightConfig::default()
                },
                LightConfig {
                    r#type: "point".to_string(),
                    position: Some([-2.0, -2.0, 2.0]),
                    strength: 1.0,
                    radius: 8.0,
                    color: [1.0, 0.6, 0.3],
                    ..LightConfig::default()
                },
            ],
            objects: vec![ObjectConfig {
                name: Some("cube".to_string()),
                primitive: Some("cube".to_string()),
                position: [0.0, 0.0, 4.0],
                rotation: [30.0, 45.0, 0.0],
                color: [0.8, 0.8, 0.9],
                ..ObjectConfig::default()
            }],
            animation: AnimationConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    // --- Output ---
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_background")]
    pub background: [f32; 3],

    // --- Lighting ---
    /// World color floor added to every triangle.
    #[serde(default = "default_ambient")]
    pub ambient: [f32; 3],
    #[serde(default = "default_true")]
    pub clamp_lighting: bool,

    // --- Pipeline ---
    #[serde(default = "default_backface_threshold")]
    pub backface_threshold: f32,
    #[serde(default = "default_depth_sort")]
    pub depth_sort: String, // "average", "furthest"
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            output: default_output(),
            background: default_background(),
            ambient: default_ambient(),
            clamp_lighting: true,
            backface_threshold: default_backface_threshold(),
            depth_sort: default_depth_sort(),
        }
    }
}

fn default_width() -> u32 {
    800
}
fn default_height() -> u32 {
    600
}
fn default_output() -> String {
    "frame.png".to_string()
}
fn default_background() -> [f32; 3] {
    [0.0, 0.0, 0.0]
}
fn default_ambient() -> [f32; 3] {
    [0.05, 0.05, 0.05]
}
fn default_backface_threshold() -> f32 {
    0.1
}
fn default_depth_sort() -> String {
    "average".to_string()
}
fn default_true() -> bool {
    true
}
fn default_one() -> f32 {
    1.0
}
fn default_white() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

/// Camera block. `target` wins over `direction`, which wins over the angles.
#[derive(Debug, Clone, Deserialize)]
pub struct CameraConfig {
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default)]
    pub yaw: f32,
    #[serde(default)]
    pub pitch: f32,
    #[serde(default)]
    pub roll: f32,
    pub direction: Option<[f32; 3]>,
    pub target: Option<[f32; 3]>,
    /// World up axis; +Y when absent.
    pub up: Option<[f32; 3]>,
    #[serde(default = "default_fov")]
    pub fov: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
    #[serde(default)]
    pub first_person: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            yaw: 0.0,
            pitch: 0.0,
            roll: 0.0,
            direction: None,
            target: None,
            up: None,
            fov: default_fov(),
            near: default_near(),
            far: default_far(),
            first_person: false,
        }
    }
}

fn default_fov() -> f32 {
    90.0
}
fn default_near() -> f32 {
    0.1
}
fn default_far() -> f32 {
    1500.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct LightConfig {
    pub r#type: String, // "point", "sun"
    pub position: Option<[f32; 3]>,
    /// Direction the sunlight travels.
    pub direction: Option<[f32; 3]>,
    /// Sun orientation as Euler degrees, used when `direction` is absent.
    pub angles: Option<[f32; 3]>,
    #[serde(default = "default_one")]
    pub strength: f32,
    #[serde(default = "default_radius")]
    pub radius: f32,
    #[serde(default = "default_white")]
    pub color: [f32; 3],
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            r#type: "point".to_string(),
            position: None,
            direction: None,
            angles: None,
            strength: default_one(),
            radius: default_radius(),
            color: default_white(),
        }
    }
}

fn default_radius() -> f32 {
    10.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectConfig {
    pub name: Option<String>,
    /// OBJ file to load.
    pub path: Option<String>,
    /// Built-in shape used when `path` is absent: "cube".
    pub primitive: Option<String>,
    /// Center the loaded geometry and fit it into a unit-ish box first.
    #[serde(default)]
    pub normalize: bool,

    // --- Transform ---
    #[serde(default = "default_one")]
    pub scale: f32,
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default)]
    pub rotation: [f32; 3],
    /// World location the object faces; overrides `rotation`.
    pub target: Option<[f32; 3]>,
    /// Extra copies of the object sharing its geometry.
    #[serde(default)]
    pub dupes: Vec<DupeConfig>,

    // --- Appearance ---
    #[serde(default = "default_white")]
    pub color: [f32; 3],
    #[serde(default = "default_shading")]
    pub shading: String, // "unlit", "dynamic", "baked"
    #[serde(default)]
    pub id: i32,
}

impl Default for ObjectConfig {
    fn default() -> Self {
        Self {
            name: None,
            path: None,
            primitive: None,
            normalize: false,
            scale: default_one(),
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
            target: None,
            dupes: Vec::new(),
            color: default_white(),
            shading: default_shading(),
            id: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct DupeConfig {
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default)]
    pub rotation: [f32; 3],
}

fn default_shading() -> String {
    "dynamic".to_string()
}

/// Simple turntable animation for multi-frame renders.
#[derive(Debug, Clone, Deserialize)]
pub struct AnimationConfig {
    #[serde(default = "default_frames")]
    pub frames: u32,
    /// Degrees added to every object's rotation per frame.
    #[serde(default)]
    pub spin: [f32; 3],
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            frames: default_frames(),
            spin: [0.0, 0.0, 0.0],
        }
    }
}

fn default_frames() -> u32 {
    1
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
