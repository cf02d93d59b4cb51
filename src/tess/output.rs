// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Flattening the finished mesh into vertex and element buffers.

use super::{ElementType, TESS_UNDEF};
use crate::geom::Real;
use crate::mesh::{FaceId, Mesh, VertId};

/// Output buffers of one tessellation.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Output {
    pub vertices: Vec<Real>,
    pub vertex_indices: Vec<u32>,
    pub elements: Vec<u32>,
    pub vertex_count: usize,
    pub element_count: usize,
}

impl Output {
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.vertex_indices.clear();
        self.elements.clear();
        self.vertex_count = 0;
        self.element_count = 0;
    }

    fn push_vertex(&mut self, mesh: &Mesh, v: VertId, vertex_size: usize) {
        let vert = &mesh.verts[v];
        self.vertices.extend_from_slice(&vert.coords[..vertex_size]);
        self.vertex_indices.push(vert.idx);
    }
}

/// Numbers the inside faces and the vertices they use, then writes one
/// record per inside face: its vertex numbers, padded to `poly_size`, followed
/// in connected mode by the number of the neighbouring face across each edge.
pub(crate) fn polygons(
    mesh: &mut Mesh,
    element_type: ElementType,
    poly_size: usize,
    vertex_size: usize,
) -> Output {
    let verts: Vec<VertId> = mesh.vertices().collect();
    for &v in &verts {
        mesh.verts[v].n = TESS_UNDEF;
    }

    let mut inside: Vec<FaceId> = Vec::new();
    let mut vertex_count = 0u32;
    let faces: Vec<FaceId> = mesh.face_ids().collect();
    for f in faces {
        if !mesh.faces[f].inside {
            mesh.faces[f].n = TESS_UNDEF;
            continue;
        }
        let loop_edges: Vec<_> = mesh.face_loop(mesh.faces[f].an_edge).collect();
        for e in loop_edges {
            let org = mesh.org(e);
            if mesh.verts[org].n == TESS_UNDEF {
                mesh.verts[org].n = vertex_count;
                vertex_count += 1;
            }
        }
        mesh.faces[f].n = inside.len() as u32;
        inside.push(f);
    }

    let mut out = Output {
        vertex_count: vertex_count as usize,
        element_count: inside.len(),
        ..Output::default()
    };

    // Vertices in output order.
    let mut numbered: Vec<VertId> = verts
        .into_iter()
        .filter(|&v| mesh.verts[v].n != TESS_UNDEF)
        .collect();
    numbered.sort_unstable_by_key(|&v| mesh.verts[v].n);
    out.vertices.reserve(numbered.len() * vertex_size);
    for v in numbered {
        out.push_vertex(mesh, v, vertex_size);
    }

    let stride = match element_type {
        ElementType::ConnectedPolygons => 2 * poly_size,
        _ => poly_size,
    };
    out.elements.reserve(inside.len() * stride);
    for f in inside {
        let an = mesh.faces[f].an_edge;
        let start = out.elements.len();
        out.elements
            .extend(mesh.face_loop(an).map(|e| mesh.verts[mesh.org(e)].n));
        out.elements.resize(start + poly_size, TESS_UNDEF);

        if element_type == ElementType::ConnectedPolygons {
            let start = out.elements.len();
            out.elements.extend(mesh.face_loop(an).map(|e| {
                if mesh.edge_is_internal(e) {
                    mesh.faces[mesh.rface(e)].n
                } else {
                    TESS_UNDEF
                }
            }));
            out.elements.resize(start + poly_size, TESS_UNDEF);
        }
    }
    out
}

/// Writes every inside face loop as its own run of vertices, with one
/// `(start, count)` element per loop.
pub(crate) fn contours(mesh: &Mesh, vertex_size: usize) -> Output {
    let mut out = Output::default();
    for f in mesh.face_ids() {
        if !mesh.faces[f].inside {
            continue;
        }
        let start = out.vertex_count;
        let mut count = 0;
        for e in mesh.face_loop(mesh.faces[f].an_edge) {
            out.push_vertex(mesh, mesh.org(e), vertex_size);
            count += 1;
        }
        out.elements.push(start as u32);
        out.elements.push(count as u32);
        out.vertex_count += count;
        out.element_count += 1;
    }
    out
}
