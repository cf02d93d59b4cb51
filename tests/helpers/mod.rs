// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Shared test utilities.

#![allow(dead_code)]

use polysweep::{ElementType, Real, TessOptions, Tessellator, WindingRule, TESS_UNDEF};

/// Outline of a five-pointed star: ten vertices, no crossings.
pub fn star_outline() -> Vec<Real> {
    vec![
        350.0, 75.0, 379.0, 161.0, 469.0, 161.0, 397.0, 215.0, 423.0, 301.0, 350.0, 250.0,
        277.0, 301.0, 303.0, 215.0, 231.0, 161.0, 321.0, 161.0,
    ]
}

/// Five-pointed star drawn with one stroke, so the centre pentagon has winding 2.
pub fn crossed_star() -> Vec<Real> {
    let mut out = Vec::new();
    for i in 0..5 {
        let angle = std::f64::consts::FRAC_PI_2 + (i * 2) as Real * std::f64::consts::TAU / 5.0;
        out.push(10.0 * angle.cos());
        out.push(10.0 * angle.sin());
    }
    out
}

/// Axis-aligned rectangle, counter-clockwise.
pub fn rect(x0: Real, y0: Real, x1: Real, y1: Real) -> Vec<Real> {
    vec![x0, y0, x1, y0, x1, y1, x0, y1]
}

/// Same rectangle, clockwise.
pub fn rect_cw(x0: Real, y0: Real, x1: Real, y1: Real) -> Vec<Real> {
    vec![x0, y0, x0, y1, x1, y1, x1, y0]
}

pub fn regular_polygon(n: usize, radius: Real) -> Vec<Real> {
    (0..n)
        .flat_map(|i| {
            let angle = std::f64::consts::TAU * i as Real / n as Real;
            [radius * angle.cos(), radius * angle.sin()]
        })
        .collect()
}

pub fn triangle_area(p0: [Real; 2], p1: [Real; 2], p2: [Real; 2]) -> Real {
    0.5 * ((p1[0] - p0[0]) * (p2[1] - p0[1]) - (p2[0] - p0[0]) * (p1[1] - p0[1]))
}

fn point(tess: &Tessellator, i: u32, vertex_size: usize) -> [Real; 2] {
    let v = tess.vertices();
    let base = i as usize * vertex_size;
    [v[base], v[base + 1]]
}

/// Signed area of every polygon in the output, which must be in
/// `Polygons` mode with the given `poly_size` and 2D vertices.
pub fn total_signed_area(tess: &Tessellator, poly_size: usize) -> Real {
    let mut total = 0.0;
    for poly in tess.elements().chunks(poly_size) {
        let idx: Vec<u32> = poly.iter().copied().take_while(|&i| i != TESS_UNDEF).collect();
        let p0 = point(tess, idx[0], 2);
        for w in idx[1..].windows(2) {
            total += triangle_area(p0, point(tess, w[0], 2), point(tess, w[1], 2));
        }
    }
    total
}

pub fn total_area(tess: &Tessellator) -> Real {
    total_signed_area(tess, 3)
}

/// Every output triangle is counter-clockwise with non-trivial area.
pub fn assert_ccw_triangles(tess: &Tessellator) {
    for (i, tri) in tess.elements().chunks(3).enumerate() {
        let a = triangle_area(point(tess, tri[0], 2), point(tess, tri[1], 2), point(tess, tri[2], 2));
        assert!(a > 1e-12, "triangle {i} is not counter-clockwise (area {a})");
    }
}

/// Indices are in range, vertices finite, and lengths agree with the counts.
pub fn verify_valid_output(tess: &Tessellator, vertex_size: usize) {
    assert_eq!(tess.vertices().len(), tess.vertex_count() * vertex_size);
    assert_eq!(tess.vertex_indices().len(), tess.vertex_count());
    for (i, &c) in tess.vertices().iter().enumerate() {
        assert!(c.is_finite(), "vertex component {i} = {c} is not finite");
    }
    for (i, &idx) in tess.elements().iter().enumerate() {
        if idx == TESS_UNDEF {
            continue;
        }
        assert!(
            (idx as usize) < tess.vertex_count(),
            "element[{i}] = {idx} out of range (vertex_count={})",
            tess.vertex_count()
        );
    }
}

pub fn options(rule: WindingRule) -> TessOptions {
    TessOptions::default()
        .with_winding_rule(rule)
        .with_mesh_check(true)
}

pub fn tessellate_with(contours: &[Vec<Real>], options: &TessOptions) -> Tessellator {
    match Tessellator::tessellate_contours(contours, options) {
        Ok(tess) => tess,
        Err(err) => panic!("tessellation failed with {options:?}: {err}"),
    }
}

/// Triangulates `contours` in 2D with the given winding rule.
pub fn triangulate(contours: &[Vec<Real>], rule: WindingRule) -> Tessellator {
    let tess = tessellate_with(contours, &options(rule));
    verify_valid_output(&tess, 2);
    tess
}

pub fn boundary(contours: &[Vec<Real>], rule: WindingRule) -> Tessellator {
    tessellate_with(
        contours,
        &options(rule).with_element_type(ElementType::BoundaryContours),
    )
}

/// Shoelace area of a flat 2D point list.
pub fn polygon_signed_area(verts: &[Real]) -> Real {
    let n = verts.len() / 2;
    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += verts[i * 2] * verts[j * 2 + 1] - verts[j * 2] * verts[i * 2 + 1];
    }
    area * 0.5
}

/// Boundary loops of a `BoundaryContours` result, each as a flat 2D list.
pub fn loops(tess: &Tessellator) -> Vec<Vec<Real>> {
    tess.elements()
        .chunks(2)
        .map(|pair| {
            let (start, count) = (pair[0] as usize, pair[1] as usize);
            tess.vertices()[start * 2..(start + count) * 2].to_vec()
        })
        .collect()
}
