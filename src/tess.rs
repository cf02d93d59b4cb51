// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Public tessellation driver: contour ingestion, projection, the sweep,
// finalization and output.

mod options;
mod output;
mod projection;

pub use options::{ElementType, TessOptions, WindingRule};
pub use projection::MAX_COORD;

use crate::error::TessError;
use crate::geom::Real;
use crate::mesh::{Mesh, NIL};
use crate::sweep;
use output::Output;

/// Marks an unused slot in element output and vertices created at crossings
/// in `vertex_indices`.
pub const TESS_UNDEF: u32 = u32::MAX;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TessStatus {
    Ok,
    InvalidInput,
    InternalError,
}

/// Accumulates contours and tessellates them.
///
/// ```
/// use polysweep::{TessOptions, Tessellator};
///
/// let mut tess = Tessellator::new();
/// tess.add_contour(2, &[0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0]).unwrap();
/// tess.tessellate(&TessOptions::default()).unwrap();
/// assert_eq!(tess.element_count(), 2);
/// assert_eq!(tess.vertex_count(), 4);
/// ```
pub struct Tessellator {
    mesh: Option<Mesh>,
    error: Option<TessError>,
    reverse_contours: bool,
    next_index: u32,
    contours: usize,
    out: Output,
}

impl Tessellator {
    pub fn new() -> Self {
        Tessellator {
            mesh: None,
            error: None,
            reverse_contours: false,
            next_index: 0,
            contours: 0,
            out: Output::default(),
        }
    }

    /// One-shot helper: adds every contour and tessellates with `options`.
    pub fn tessellate_contours<C: AsRef<[Real]>>(
        contours: &[C],
        options: &TessOptions,
    ) -> Result<Self, TessError> {
        let mut tess = Tessellator::new();
        for c in contours {
            tess.add_contour(options.vertex_size, c.as_ref())?;
        }
        tess.tessellate(options)?;
        Ok(tess)
    }

    /// Contours added from now on wind the other way.
    pub fn set_reverse_contours(&mut self, reverse: bool) {
        self.reverse_contours = reverse;
    }

    /// Adds a closed contour of `vertex_size`-component points, 2 or 3.
    ///
    /// Trailing components that do not make up a whole point are ignored.
    /// A rejected contour leaves the tessellator failed: later contours are
    /// ignored and `tessellate` reports the same error.
    pub fn add_contour(&mut self, vertex_size: usize, vertices: &[Real]) -> Result<(), TessError> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        if let Err(err) = validate_contour(vertex_size, vertices) {
            log::warn!("rejecting contour: {err}");
            self.error = Some(err.clone());
            return Err(err);
        }
        if let Err(err) = self.build_contour(vertex_size, vertices) {
            self.error = Some(err.clone());
            return Err(err);
        }
        Ok(())
    }

    fn build_contour(&mut self, vertex_size: usize, vertices: &[Real]) -> Result<(), TessError> {
        let mesh = self.mesh.get_or_insert_with(Mesh::new);
        let winding = if self.reverse_contours { -1 } else { 1 };

        let mut e = NIL;
        for point in vertices.chunks_exact(vertex_size) {
            if e == NIL {
                // A single self-loop; later points are split into it.
                e = mesh.make_edge()?;
                mesh.splice(e, e ^ 1)?;
            } else {
                mesh.split_edge(e)?;
                e = mesh.lnext(e);
            }
            let org = mesh.org(e);
            let v = &mut mesh.verts[org];
            v.coords = [point[0], point[1], if vertex_size > 2 { point[2] } else { 0.0 }];
            v.idx = self.next_index;
            self.next_index += 1;

            mesh.edge_mut(e).winding = winding;
            mesh.edge_mut(e ^ 1).winding = -winding;
        }
        if e != NIL {
            self.contours += 1;
        }
        Ok(())
    }

    /// Tessellates everything added since the last call.
    ///
    /// The accumulated contours are consumed; on success the output buffers
    /// hold the result, on failure they are empty.
    pub fn tessellate(&mut self, options: &TessOptions) -> Result<(), TessError> {
        self.out.clear();
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        let result = self.run(options);
        if let Err(err) = &result {
            log::debug!("tessellation failed: {err}");
            self.error = Some(err.clone());
        }
        result
    }

    fn run(&mut self, options: &TessOptions) -> Result<(), TessError> {
        if !(2..=3).contains(&options.vertex_size) {
            return Err(TessError::InvalidVertexSize(options.vertex_size));
        }
        if options.poly_size < 3 {
            return Err(TessError::InvalidPolySize(options.poly_size));
        }

        let mut mesh = self.mesh.take().unwrap_or_default();
        let contours = std::mem::take(&mut self.contours);
        log::debug!(
            "tessellating {contours} contours, {} vertices, rule {:?}, {:?}",
            mesh.vertex_count(),
            options.winding_rule,
            options.element_type
        );

        let (bmin, bmax) = projection::project(&mut mesh, options.normal);
        sweep::compute_interior(&mut mesh, options.winding_rule, bmin, bmax)?;
        if options.check_mesh {
            mesh.check()?;
        }

        if options.element_type == ElementType::BoundaryContours {
            mesh.set_winding_number(1, true)?;
        } else {
            mesh.tessellate_interior()?;
            mesh.discard_exterior()?;
        }
        if options.check_mesh {
            mesh.check()?;
        }

        self.out = match options.element_type {
            ElementType::BoundaryContours => output::contours(&mesh, options.vertex_size),
            element_type => {
                if options.poly_size > 3 {
                    mesh.merge_convex_faces(options.poly_size)?;
                }
                output::polygons(&mut mesh, element_type, options.poly_size, options.vertex_size)
            }
        };
        log::debug!(
            "produced {} elements over {} vertices",
            self.out.element_count,
            self.out.vertex_count
        );
        Ok(())
    }

    /// Output vertices, `vertex_size` components each.
    pub fn vertices(&self) -> &[Real] {
        &self.out.vertices
    }

    /// For each output vertex, the insertion index of the input vertex it came
    /// from, or `TESS_UNDEF` for vertices created where edges cross.
    pub fn vertex_indices(&self) -> &[u32] {
        &self.out.vertex_indices
    }

    pub fn elements(&self) -> &[u32] {
        &self.out.elements
    }

    pub fn vertex_count(&self) -> usize {
        self.out.vertex_count
    }

    pub fn element_count(&self) -> usize {
        self.out.element_count
    }

    pub fn status(&self) -> TessStatus {
        match &self.error {
            None => TessStatus::Ok,
            Some(err) if err.is_input_error() => TessStatus::InvalidInput,
            Some(_) => TessStatus::InternalError,
        }
    }
}

impl Default for Tessellator {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_contour(vertex_size: usize, vertices: &[Real]) -> Result<(), TessError> {
    if !(2..=3).contains(&vertex_size) {
        return Err(TessError::InvalidVertexSize(vertex_size));
    }
    for point in vertices.chunks_exact(vertex_size) {
        if let Some(&value) = point.iter().find(|&&c| !projection::is_valid_coord(c)) {
            return Err(TessError::InvalidCoordinate { value });
        }
    }
    Ok(())
}
