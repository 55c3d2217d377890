use srtm::SrtmError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TilerError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Srtm(#[from] SrtmError),

    #[error("{0}")]
    Image(#[from] image::ImageError),

    #[error("invalid range line {line:?}: {reason}")]
    Range { line: String, reason: &'static str },
}
