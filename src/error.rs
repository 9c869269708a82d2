use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SketchError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Config(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("window error: {0}")]
    Window(#[from] minifb::Error),
}

pub type Result<T> = std::result::Result<T, SketchError>;
