//! Error types for revision construction and legacy measurement
//!
//! Simple, flat error hierarchy. Queries never return these: a query that
//! cannot be answered yields its zero value instead.

use crate::types::{NodeId, SurfaceId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DomError>;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("Node not found in current revision: {0}")]
    NodeNotFound(NodeId),

    #[error("No current revision for surface {0}")]
    NoCurrentRevision(SurfaceId),

    #[error("Nodes belong to different surfaces: {surface_id} != {other_surface_id}")]
    CrossSurface {
        surface_id: SurfaceId,
        other_surface_id: SurfaceId,
    },

    #[error("Surface mismatch: expected {expected}, got {actual}")]
    SurfaceMismatch {
        expected: SurfaceId,
        actual: SurfaceId,
    },

    #[error("Revision root {0} is not a root node")]
    NotARoot(NodeId),

    #[error("Root node {0} found below the revision root")]
    UnexpectedRoot(NodeId),

    #[error("Node identity {0} appears more than once")]
    DuplicateNode(NodeId),

    #[error("Invalid tree description: {0}")]
    InvalidTree(String),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
