// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Winding rule correctness, checked through covered area.

mod helpers;

use approx::assert_relative_eq;
use helpers::{crossed_star, rect, rect_cw, star_outline, total_area, triangulate};
use polysweep::{Real, WindingRule};

const ALL_RULES: [WindingRule; 5] = [
    WindingRule::Odd,
    WindingRule::NonZero,
    WindingRule::Positive,
    WindingRule::Negative,
    WindingRule::AbsGeqTwo,
];

/// 6x6 counter-clockwise, 4x4 clockwise, 2x2 counter-clockwise, all centred
/// on the origin. Winding numbers from the outside in: 1, 0, 1.
fn nested_squares() -> Vec<Vec<Real>> {
    vec![
        rect(-3.0, -3.0, 3.0, 3.0),
        rect_cw(-2.0, -2.0, 2.0, 2.0),
        rect(-1.0, -1.0, 1.0, 1.0),
    ]
}

fn area(contours: &[Vec<Real>], rule: WindingRule) -> Real {
    total_area(&triangulate(contours, rule))
}

#[test]
fn nested_squares_under_each_rule() {
    let shapes = nested_squares();
    let expected = [
        (WindingRule::Odd, 24.0),
        (WindingRule::NonZero, 24.0),
        (WindingRule::Positive, 24.0),
        (WindingRule::Negative, 0.0),
        (WindingRule::AbsGeqTwo, 0.0),
    ];
    for (rule, want) in expected {
        assert_relative_eq!(area(&shapes, rule), want, epsilon = 1e-9);
    }
}

#[test]
fn nested_squares_negative_is_empty() {
    let tess = triangulate(&nested_squares(), WindingRule::Negative);
    assert_eq!(tess.element_count(), 0);
    assert!(tess.elements().is_empty());
}

#[test]
fn identical_squares_overlap_with_winding_two() {
    let square = rect(0.0, 0.0, 4.0, 4.0);
    let shapes = vec![square.clone(), square];
    assert_relative_eq!(area(&shapes, WindingRule::AbsGeqTwo), 16.0);
    assert_relative_eq!(area(&shapes, WindingRule::NonZero), 16.0);
    assert_eq!(triangulate(&shapes, WindingRule::Odd).element_count(), 0);
}

#[test]
fn partially_overlapping_squares() {
    // Overlap is the 2x2 square [2, 4] x [2, 4].
    let shapes = vec![rect(0.0, 0.0, 4.0, 4.0), rect(2.0, 2.0, 6.0, 6.0)];
    assert_relative_eq!(area(&shapes, WindingRule::NonZero), 28.0, epsilon = 1e-9);
    assert_relative_eq!(area(&shapes, WindingRule::Odd), 24.0, epsilon = 1e-9);
    assert_relative_eq!(area(&shapes, WindingRule::AbsGeqTwo), 4.0, epsilon = 1e-9);

    let tess = triangulate(&shapes, WindingRule::AbsGeqTwo);
    // The overlap corners at (4, 2) and (2, 4) are created by the sweep.
    assert!(tess.vertex_indices().contains(&polysweep::TESS_UNDEF));
}

#[test]
fn crossed_star_centre_has_winding_two() {
    let star = vec![crossed_star()];
    let inner_r = 10.0 * (0.4 * std::f64::consts::PI).cos() / (0.2 * std::f64::consts::PI).cos();
    let pentagon = 2.5 * inner_r * inner_r * (0.4 * std::f64::consts::PI).sin();
    let union = helpers::polygon_signed_area(&star[0]) - pentagon;

    assert_relative_eq!(area(&star, WindingRule::AbsGeqTwo), pentagon, max_relative = 1e-9);
    assert_relative_eq!(area(&star, WindingRule::NonZero), union, max_relative = 1e-9);
    assert_relative_eq!(area(&star, WindingRule::Positive), union, max_relative = 1e-9);
    assert_relative_eq!(area(&star, WindingRule::Odd), union - pentagon, max_relative = 1e-9);
    assert_eq!(triangulate(&star, WindingRule::Negative).element_count(), 0);
}

#[test]
fn simple_outline_fills_the_same_under_odd_and_nonzero() {
    let star = vec![star_outline()];
    let odd = triangulate(&star, WindingRule::Odd);
    let nonzero = triangulate(&star, WindingRule::NonZero);
    assert_eq!(odd.element_count(), nonzero.element_count());
    assert_relative_eq!(total_area(&odd), total_area(&nonzero), max_relative = 1e-12);
    assert_eq!(triangulate(&star, WindingRule::AbsGeqTwo).element_count(), 0);
}

#[test]
fn every_rule_gives_valid_output() {
    let mut shapes = nested_squares();
    shapes.push(crossed_star());
    shapes.push(star_outline());
    for rule in ALL_RULES {
        let tess = triangulate(&shapes, rule);
        helpers::verify_valid_output(&tess, 2);
        assert!(total_area(&tess) >= 0.0, "{rule:?}");
    }
}

#[test]
fn lone_clockwise_contour_is_reoriented() {
    // With a computed normal a single contour always counts as positive.
    let shapes = vec![rect_cw(0.0, 0.0, 2.0, 2.0)];
    assert_relative_eq!(area(&shapes, WindingRule::Positive), 4.0);
    assert_eq!(triangulate(&shapes, WindingRule::Negative).element_count(), 0);
}
