// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Error types.
//
// MeshError reports a broken mesh invariant or a primitive called with a handle
// that no longer refers to a live element. Both indicate a bug in the caller or
// in the sweep, never a problem with the input geometry. TessError is what the
// public tessellation entry points return.

use crate::geom::Real;
use crate::mesh::{EdgeId, FaceId, VertId};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    #[error("half-edge {0} is not part of the mesh")]
    DeadEdge(EdgeId),
    #[error("face {0} is not part of the mesh")]
    DeadFace(FaceId),
    #[error("vertex {0} is not part of the mesh")]
    DeadVertex(VertId),
    #[error("mesh invariant violated: {0}")]
    Invariant(String),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TessError {
    #[error("coordinate {value} is not finite or lies outside the supported range")]
    InvalidCoordinate { value: Real },
    #[error("vertex size must be 2 or 3, got {0}")]
    InvalidVertexSize(usize),
    #[error("polygon size must be at least 3, got {0}")]
    InvalidPolySize(usize),
    #[error(transparent)]
    Mesh(#[from] MeshError),
    #[error("sweep state is inconsistent: {0}")]
    Sweep(&'static str),
}

impl TessError {
    /// True for errors caused by the caller's input rather than an internal fault.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            TessError::InvalidCoordinate { .. }
                | TessError::InvalidVertexSize(_)
                | TessError::InvalidPolySize(_)
        )
    }
}
