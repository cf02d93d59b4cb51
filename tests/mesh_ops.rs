// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Topology properties of the public mesh primitives and of the sweep.

use polysweep::geom::Point2;
use polysweep::mesh::{EdgeId, Mesh, NIL};
use polysweep::sweep::compute_interior;
use polysweep::{Real, WindingRule};

/// Closed loop through `pts` with unit winding, built the way contours are
/// loaded. Returns an edge whose left face is the loop interior.
fn polygon(mesh: &mut Mesh, pts: &[(Real, Real)]) -> EdgeId {
    let first = mesh.make_edge().unwrap();
    mesh.splice(first, first ^ 1).unwrap();
    let mut e = first;
    for (i, &(s, t)) in pts.iter().enumerate() {
        if i > 0 {
            mesh.split_edge(e).unwrap();
            e = mesh.lnext(e);
        }
        let org = mesh.org(e);
        mesh.verts[org].pos = Point2::new(s, t);
        mesh.verts[org].coords = [s, t, 0.0];
        mesh.verts[org].idx = i as u32;
        mesh.edge_mut(e).winding = 1;
        mesh.edge_mut(e ^ 1).winding = -1;
    }
    e
}

/// V - E + F for the whole mesh.
fn euler(mesh: &Mesh) -> i64 {
    mesh.vertex_count() as i64 - mesh.edge_count() as i64 + mesh.face_count() as i64
}

fn bounds(mesh: &Mesh) -> (Point2, Point2) {
    let mut lo = Point2::new(Real::MAX, Real::MAX);
    let mut hi = Point2::new(Real::MIN, Real::MIN);
    for v in mesh.vertices() {
        let p = mesh.pos(v);
        lo = Point2::new(lo.s.min(p.s), lo.t.min(p.t));
        hi = Point2::new(hi.s.max(p.s), hi.t.max(p.t));
    }
    (lo, hi)
}

fn inside_faces(mesh: &Mesh) -> usize {
    mesh.face_ids().filter(|&f| mesh.faces[f].inside).count()
}

#[test]
fn polygon_loop_has_two_faces() {
    let mut mesh = Mesh::new();
    let e = polygon(&mut mesh, &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.edge_count(), 4);
    assert_eq!(mesh.face_count(), 2);
    assert_eq!(euler(&mesh), 2);
    assert_eq!(mesh.face_loop(e).count(), 4);
    assert_ne!(mesh.lface(e), mesh.rface(e));
    mesh.check().unwrap();
}

#[test]
fn operations_preserve_euler_characteristic() {
    let mut mesh = Mesh::new();
    let e = polygon(
        &mut mesh,
        &[(0.0, 0.0), (2.0, 0.0), (3.0, 1.0), (2.0, 2.0), (0.0, 2.0)],
    );
    assert_eq!(euler(&mesh), 2);

    let diag = mesh.connect(e, mesh.lprev(e)).unwrap();
    assert_eq!(euler(&mesh), 2);
    mesh.check().unwrap();

    let half = mesh.split_edge(diag).unwrap();
    assert_eq!(mesh.org(half), mesh.dst(diag));
    assert_eq!(euler(&mesh), 2);
    mesh.check().unwrap();

    mesh.delete_edge(half).unwrap();
    assert_eq!(euler(&mesh), 2);
    mesh.check().unwrap();
}

#[test]
fn disjoint_loops_add_up() {
    let mut mesh = Mesh::new();
    polygon(&mut mesh, &[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
    polygon(&mut mesh, &[(5.0, 5.0), (6.0, 5.0), (5.0, 6.0)]);
    // Two separate spheres.
    assert_eq!(euler(&mesh), 4);
    mesh.check().unwrap();
}

#[test]
fn navigation_identities_hold_everywhere() {
    let mut mesh = Mesh::new();
    let e = polygon(&mut mesh, &[(0.0, 0.0), (4.0, 0.0), (4.0, 3.0), (0.0, 3.0)]);
    mesh.connect(e, mesh.lprev(e)).unwrap();
    for e in mesh.edge_ids().flat_map(|e| [e, e ^ 1]) {
        assert_eq!(mesh.dst(e), mesh.org(e ^ 1));
        assert_eq!(mesh.rface(e), mesh.lface(e ^ 1));
        assert_eq!(mesh.lnext(mesh.lprev(e)), e);
        assert_eq!(mesh.onext(mesh.oprev(e)), e);
        assert_eq!(mesh.org(mesh.onext(e)), mesh.org(e));
        assert_eq!(mesh.lface(mesh.lnext(e)), mesh.lface(e));
        assert_eq!(mesh.dnext(e) ^ 1, mesh.rprev(e));
        assert_eq!(mesh.dst(mesh.dprev(e)), mesh.dst(e));
        assert_eq!(mesh.rface(mesh.rnext(e)), mesh.rface(e));
    }
}

#[test]
fn sweep_labels_square_interior() {
    let mut mesh = Mesh::new();
    polygon(&mut mesh, &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
    let (lo, hi) = bounds(&mesh);
    compute_interior(&mut mesh, WindingRule::Odd, lo, hi).unwrap();
    mesh.check().unwrap();
    assert_eq!(inside_faces(&mesh), 1);

    mesh.tessellate_interior().unwrap();
    mesh.check().unwrap();
    assert_eq!(inside_faces(&mesh), 2);
    for f in mesh.face_ids().filter(|&f| mesh.faces[f].inside) {
        assert_eq!(mesh.count_face_verts(f), 3);
    }
}

#[test]
fn sweep_inserts_crossing_vertex() {
    let mut mesh = Mesh::new();
    polygon(&mut mesh, &[(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0)]);
    let (lo, hi) = bounds(&mesh);
    compute_interior(&mut mesh, WindingRule::NonZero, lo, hi).unwrap();
    mesh.check().unwrap();
    assert_eq!(mesh.vertex_count(), 5);
    assert_eq!(inside_faces(&mesh), 2);

    let created: Vec<_> = mesh
        .vertices()
        .filter(|&v| mesh.verts[v].idx == NIL)
        .collect();
    assert_eq!(created.len(), 1);
    let c = mesh.verts[created[0]].coords;
    assert!((c[0] - 1.0).abs() < 1e-9 && (c[1] - 1.0).abs() < 1e-9);
}

#[test]
fn sweep_leaves_monotone_faces_for_concave_input() {
    // A "W"-shaped outline with two reflex vertices on its top chain.
    let mut mesh = Mesh::new();
    polygon(
        &mut mesh,
        &[(0.0, 0.0), (6.0, 0.0), (6.0, 4.0), (4.0, 1.0), (3.0, 4.0), (2.0, 1.0), (0.0, 4.0)],
    );
    let (lo, hi) = bounds(&mesh);
    compute_interior(&mut mesh, WindingRule::Positive, lo, hi).unwrap();
    mesh.check().unwrap();
    assert!(inside_faces(&mesh) >= 1);

    // Monotone faces triangulate without error into n - 2 triangles overall.
    mesh.tessellate_interior().unwrap();
    mesh.check().unwrap();
    assert_eq!(inside_faces(&mesh), 5);
}

#[test]
fn boundary_rewrite_drops_interior_edges() {
    let mut mesh = Mesh::new();
    polygon(&mut mesh, &[(0.0, 0.0), (3.0, 0.0), (3.0, 3.0), (0.0, 3.0)]);
    let (lo, hi) = bounds(&mesh);
    compute_interior(&mut mesh, WindingRule::Odd, lo, hi).unwrap();
    mesh.tessellate_interior().unwrap();
    assert!(mesh.edge_count() > 4);

    mesh.set_winding_number(1, true).unwrap();
    mesh.check().unwrap();
    assert_eq!(mesh.edge_count(), 4);
    for e in mesh.edge_ids() {
        let inside_left = mesh.faces[mesh.lface(e)].inside;
        let expected = if inside_left { 1 } else { -1 };
        assert_eq!(mesh.edge(e).winding, expected);
    }
}

#[test]
fn merging_triangles_recovers_the_square() {
    let mut mesh = Mesh::new();
    polygon(&mut mesh, &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
    let (lo, hi) = bounds(&mesh);
    compute_interior(&mut mesh, WindingRule::Odd, lo, hi).unwrap();
    mesh.tessellate_interior().unwrap();
    mesh.merge_convex_faces(4).unwrap();
    mesh.check().unwrap();
    let inside: Vec<_> = mesh.face_ids().filter(|&f| mesh.faces[f].inside).collect();
    assert_eq!(inside.len(), 1);
    assert_eq!(mesh.count_face_verts(inside[0]), 4);
}
