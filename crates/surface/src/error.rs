//! Host-side errors

use dom::{DomError, SurfaceId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HostError>;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("Surface {0} is already running")]
    SurfaceAlreadyRunning(SurfaceId),

    #[error("Surface {0} is not running")]
    SurfaceNotRunning(SurfaceId),

    #[error("Invalid node reference: {0}")]
    InvalidReference(String),

    #[error("Invalid host config: {0}")]
    Config(serde_json::Error),

    #[error(transparent)]
    Dom(#[from] DomError),
}
