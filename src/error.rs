use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DemoError>;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("Failed to initialize GLFW: {0}")]
    GlfwInit(#[from] glfw::InitError),
    #[error("Failed to create GLFW window ({width}x{height})")]
    WindowCreation { width: u32, height: u32 },
    #[error("Couldn't read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to load image at {}: {reason}", path.display())]
    Image { path: PathBuf, reason: String },
    #[error("Unsupported channel count: {0}")]
    PixelFormat(usize),
    #[error("{stage} Compile Error: {log}")]
    ShaderCompile { stage: &'static str, log: String },
    #[error("Program Link Error: {0}")]
    ProgramLink(String),
    #[error("Program Validation Error: {0}")]
    ProgramValidation(String),
    #[error("Couldn't allocate {0}")]
    Allocation(&'static str),
    #[error("Invalid tile map at row {row}: {reason}")]
    TileMap { row: usize, reason: String },
}

impl DemoError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DemoError::Io {
            path: path.into(),
            source,
        }
    }
}
