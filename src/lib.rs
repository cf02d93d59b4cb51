// polysweep: sweep-line polygon tessellation
// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)

pub mod arena;
pub mod dict;
pub mod error;
pub mod geom;
pub mod mesh;
pub mod priorityq;
pub mod sweep;
pub mod tess;

pub use error::{MeshError, TessError};
pub use geom::{Point2, Real};
pub use mesh::Mesh;
pub use tess::{
    ElementType, TessOptions, TessStatus, Tessellator, WindingRule, MAX_COORD, TESS_UNDEF,
};
