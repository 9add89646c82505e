use crate::{config::ConfigError, parsers::ParseError, runtime::FrameNotFound};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The file couldn't be imported. Nothing was added to the scene.
    #[error("error when loading {}: {source}", .path.display())]
    Import {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
    #[error(transparent)]
    FrameNotFound(#[from] FrameNotFound),
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A call into the scene host failed. It is not retried.
    #[error("scene host error: {0}")]
    Host(String),
}

impl Error {
    pub(crate) fn host(err: impl std::fmt::Display) -> Self {
        Error::Host(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
