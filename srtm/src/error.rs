use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SrtmError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("missing granule {0}")]
    Missing(PathBuf),

    #[error("invalid HGT file len {0} for {1}")]
    HgtLen(u64, PathBuf),
}
