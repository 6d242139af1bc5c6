use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("face {face} references vertex {index}, but only {count} vertices exist")]
    FaceIndexOutOfRange {
        face: usize,
        index: usize,
        count: usize,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse scene file: {0}")]
    Config(#[from] toml::de::Error),
    #[error("failed to load OBJ: {0}")]
    Obj(#[from] tobj::LoadError),
    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
    #[error("unknown light type '{0}' (expected 'point' or 'sun')")]
    UnknownLight(String),
    #[error("unknown shading mode '{0}' (expected 'unlit', 'dynamic' or 'baked')")]
    UnknownShading(String),
    #[error("unknown depth sort '{0}' (expected 'average' or 'furthest')")]
    UnknownDepthSort(String),
    #[error("invalid camera: {0}")]
    InvalidCamera(String),
}

pub type Result<T> = std::result::Result<T, Error>;
