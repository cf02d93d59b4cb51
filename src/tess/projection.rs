// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Mapping input coordinates onto the (s, t) sweep plane.

use crate::geom::{Point2, Real};
use crate::mesh::{Mesh, VertId};

/// Largest coordinate magnitude accepted as input.
pub const MAX_COORD: Real = 1e37;

pub(crate) fn is_valid_coord(c: Real) -> bool {
    c.is_finite() && c.abs() <= MAX_COORD
}

fn dot(u: &[Real; 3], v: &[Real; 3]) -> Real {
    u[0] * v[0] + u[1] * v[1] + u[2] * v[2]
}

fn cross(u: &[Real; 3], v: &[Real; 3]) -> [Real; 3] {
    [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ]
}

fn sub(u: &[Real; 3], v: &[Real; 3]) -> [Real; 3] {
    [u[0] - v[0], u[1] - v[1], u[2] - v[2]]
}

/// Index of the component with the largest magnitude.
pub(crate) fn long_axis(v: &[Real; 3]) -> usize {
    let mut i = 0;
    if v[1].abs() > v[0].abs() {
        i = 1;
    }
    if v[2].abs() > v[i].abs() {
        i = 2;
    }
    i
}

/// Index of the component with the smallest magnitude.
pub(crate) fn short_axis(v: &[Real; 3]) -> usize {
    let mut i = 0;
    if v[1].abs() < v[0].abs() {
        i = 1;
    }
    if v[2].abs() < v[i].abs() {
        i = 2;
    }
    i
}

/// Estimates a normal for the input.
///
/// The two vertices furthest apart along the axis of widest spread form one
/// side of a triangle; the third corner is the vertex giving the largest
/// area. Collinear input falls back to the axis along which the extreme pair
/// varies least.
pub(crate) fn compute_normal(mesh: &Mesh) -> [Real; 3] {
    let verts: Vec<VertId> = mesh.vertices().collect();
    let Some(&first) = verts.first() else {
        return [0.0, 0.0, 1.0];
    };

    let c0 = mesh.verts[first].coords;
    let (mut min_val, mut max_val) = (c0, c0);
    let (mut min_vert, mut max_vert) = ([first; 3], [first; 3]);
    for &v in &verts {
        let c = mesh.verts[v].coords;
        for i in 0..3 {
            if c[i] < min_val[i] {
                min_val[i] = c[i];
                min_vert[i] = v;
            }
            if c[i] > max_val[i] {
                max_val[i] = c[i];
                max_vert[i] = v;
            }
        }
    }

    let mut i = 0;
    if max_val[1] - min_val[1] > max_val[0] - min_val[0] {
        i = 1;
    }
    if max_val[2] - min_val[2] > max_val[i] - min_val[i] {
        i = 2;
    }
    if min_val[i] >= max_val[i] {
        // All vertices coincide.
        return [0.0, 0.0, 1.0];
    }

    let v2 = mesh.verts[max_vert[i]].coords;
    let d1 = sub(&mesh.verts[min_vert[i]].coords, &v2);
    let mut norm = [0.0; 3];
    let mut max_len2 = 0.0;
    for &v in &verts {
        let d2 = sub(&mesh.verts[v].coords, &v2);
        let tn = cross(&d1, &d2);
        let len2 = dot(&tn, &tn);
        if len2 > max_len2 {
            max_len2 = len2;
            norm = tn;
        }
    }

    if max_len2 <= 0.0 {
        norm = [0.0; 3];
        norm[short_axis(&d1)] = 1.0;
    }
    norm
}

/// Flips `t` on every vertex when the contours with positive winding have
/// negative total area, so a computed normal always yields CCW contours.
pub(crate) fn check_orientation(mesh: &mut Mesh) {
    let mut area = 0.0;
    for f in mesh.face_ids() {
        let an = mesh.faces[f].an_edge;
        if mesh.edge(an).winding <= 0 {
            continue;
        }
        for e in mesh.face_loop(an) {
            let (o, d) = (mesh.org_pos(e), mesh.dst_pos(e));
            area += (o.s - d.s) * (o.t + d.t);
        }
    }
    if area < 0.0 {
        log::trace!("flipping t axis, signed area {area}");
        let verts: Vec<VertId> = mesh.vertices().collect();
        for v in verts {
            mesh.verts[v].pos.t = -mesh.verts[v].pos.t;
        }
    }
}

/// Projects every vertex onto the plane perpendicular to `normal` (computed
/// when absent or zero) and returns the bounding box of the projection.
///
/// The projection axes are axis aligned: with `i` the dominant component of
/// the normal, `s` is axis `(i + 1) % 3` and `t` is axis `(i + 2) % 3`, the
/// latter negated when the normal points down that axis.
pub(crate) fn project(mesh: &mut Mesh, normal: Option<[Real; 3]>) -> (Point2, Point2) {
    let given = normal.filter(|n| n.iter().any(|&c| c != 0.0));
    let computed = given.is_none();
    let norm = given.unwrap_or_else(|| compute_normal(mesh));

    let i = long_axis(&norm);
    let mut s_unit = [0.0; 3];
    let mut t_unit = [0.0; 3];
    s_unit[(i + 1) % 3] = 1.0;
    t_unit[(i + 2) % 3] = if norm[i] > 0.0 { 1.0 } else { -1.0 };
    log::debug!("projecting with normal {norm:?} (axis {i}, computed {computed})");

    let verts: Vec<VertId> = mesh.vertices().collect();
    for &v in &verts {
        let c = mesh.verts[v].coords;
        mesh.verts[v].pos = Point2::new(dot(&c, &s_unit), dot(&c, &t_unit));
    }
    if computed {
        check_orientation(mesh);
    }

    let mut bmin = Point2::new(0.0, 0.0);
    let mut bmax = Point2::new(0.0, 0.0);
    for (k, &v) in verts.iter().enumerate() {
        let p = mesh.verts[v].pos;
        if k == 0 {
            bmin = p;
            bmax = p;
            continue;
        }
        bmin.s = bmin.s.min(p.s);
        bmin.t = bmin.t.min(p.t);
        bmax.s = bmax.s.max(p.s);
        bmax.t = bmax.t.max(p.t);
    }
    (bmin, bmax)
}
