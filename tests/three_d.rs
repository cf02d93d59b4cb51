// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Three-component input and explicit projection normals.

mod helpers;

use approx::assert_relative_eq;
use helpers::{options, tessellate_with, verify_valid_output};
use polysweep::{Real, TessOptions, Tessellator, WindingRule};

fn xy_quad_3d() -> Vec<Real> {
    vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0]
}

fn run(contour: &[Real], opts: &TessOptions) -> Tessellator {
    let tess = tessellate_with(&[contour.to_vec()], opts);
    verify_valid_output(&tess, opts.vertex_size);
    tess
}

#[test]
fn xy_plane_quad_keeps_three_components() {
    let tess = run(&xy_quad_3d(), &options(WindingRule::Positive).with_vertex_size(3));
    assert_eq!(tess.element_count(), 2);
    assert_eq!(tess.vertices().len(), tess.vertex_count() * 3);
    for p in tess.vertices().chunks(3) {
        assert!((0.0..=1.0).contains(&p[0]));
        assert!((0.0..=1.0).contains(&p[1]));
        assert_relative_eq!(p[2], 0.0);
    }
}

#[test]
fn xz_plane_quad_with_explicit_normal() {
    let quad: Vec<Real> = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0];
    let base = options(WindingRule::NonZero)
        .with_vertex_size(3)
        .with_normal([0.0, 1.0, 0.0]);

    let tess = run(&quad, &base);
    assert_eq!(tess.element_count(), 2);
    for p in tess.vertices().chunks(3) {
        assert_relative_eq!(p[1], 0.0);
    }

    // Seen from +y this quad winds clockwise, so only the negative rule fills it.
    let neg = run(&quad, &base.with_winding_rule(WindingRule::Negative));
    assert_eq!(neg.element_count(), 2);
    let pos = run(&quad, &base.with_winding_rule(WindingRule::Positive));
    assert_eq!(pos.element_count(), 0);
}

#[test]
fn tilted_plane_triangle() {
    // z = x + y
    let tri: Vec<Real> = vec![0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 1.0];
    let k = 1.0 / (3.0 as Real).sqrt();
    let tess = run(
        &tri,
        &options(WindingRule::Positive)
            .with_vertex_size(3)
            .with_normal([-k, -k, k]),
    );
    assert_eq!(tess.element_count(), 1);
    for p in tess.vertices().chunks(3) {
        assert_relative_eq!(p[2], p[0] + p[1]);
    }
}

#[test]
fn computed_normal_for_vertical_plane() {
    // Square in the plane x = 5.
    let square: Vec<Real> = vec![5.0, 0.0, 0.0, 5.0, 2.0, 0.0, 5.0, 2.0, 2.0, 5.0, 0.0, 2.0];
    let tess = run(&square, &options(WindingRule::Positive).with_vertex_size(3));
    assert_eq!(tess.element_count(), 2);
    for p in tess.vertices().chunks(3) {
        assert_relative_eq!(p[0], 5.0);
    }
}

#[test]
fn computed_normal_accepts_either_orientation() {
    let mut cw = Vec::new();
    for p in xy_quad_3d().chunks(3).rev() {
        cw.extend_from_slice(p);
    }
    let opts = options(WindingRule::Positive).with_vertex_size(3);
    assert_eq!(run(&xy_quad_3d(), &opts).element_count(), 2);
    assert_eq!(run(&cw, &opts).element_count(), 2);
}

#[test]
fn three_d_input_with_two_d_output() {
    let mut tess = Tessellator::new();
    tess.add_contour(3, &xy_quad_3d()).unwrap();
    tess.tessellate(&options(WindingRule::Odd)).unwrap();
    assert_eq!(tess.element_count(), 2);
    assert_eq!(tess.vertices().len(), tess.vertex_count() * 2);
}

#[test]
fn two_d_and_flat_three_d_agree() {
    let flat = run(
        &helpers::rect(0.0, 0.0, 5.0, 5.0),
        &options(WindingRule::Positive),
    );
    let mut lifted = Vec::new();
    for p in helpers::rect(0.0, 0.0, 5.0, 5.0).chunks(2) {
        lifted.extend_from_slice(&[p[0], p[1], 0.0]);
    }
    let raised = run(&lifted, &options(WindingRule::Positive).with_vertex_size(3));
    assert_eq!(flat.element_count(), raised.element_count());
    assert_eq!(flat.vertex_count(), raised.vertex_count());
}

#[test]
fn downward_normal_reverses_winding() {
    let quad = helpers::rect(0.0, 0.0, 1.0, 1.0);
    let up = run(
        &quad,
        &options(WindingRule::Positive).with_normal([0.0, 0.0, 1.0]),
    );
    assert_eq!(up.element_count(), 2);

    let down = options(WindingRule::Positive).with_normal([0.0, 0.0, -1.0]);
    assert_eq!(run(&quad, &down).element_count(), 0);
    let down_neg = down.with_winding_rule(WindingRule::Negative);
    assert_eq!(run(&quad, &down_neg).element_count(), 2);
}

#[test]
fn zero_normal_is_computed() {
    let quad = helpers::rect(0.0, 0.0, 1.0, 1.0);
    let tess = run(
        &quad,
        &options(WindingRule::Positive).with_normal([0.0, 0.0, 0.0]),
    );
    assert_eq!(tess.element_count(), 2);
}
