// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Geometric predicates over projected sweep coordinates.
//
// Every vertex carries a projected position (s, t). The sweep orders positions
// lexicographically with s as the primary key; the "trans" variants swap the
// roles of s and t.

pub type Real = f64;

/// A position on the sweep plane.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point2 {
    pub s: Real,
    pub t: Real,
}

impl Point2 {
    #[inline]
    pub const fn new(s: Real, t: Real) -> Self {
        Point2 { s, t }
    }

    #[inline]
    fn transposed(self) -> Self {
        Point2 { s: self.t, t: self.s }
    }
}

/// Returns true if `u` precedes or equals `v` in sweep order (s first, then t).
#[inline]
pub fn vert_leq(u: Point2, v: Point2) -> bool {
    u.s < v.s || (u.s == v.s && u.t <= v.t)
}

/// Exact coordinate equality.
#[inline]
pub fn vert_eq(u: Point2, v: Point2) -> bool {
    u.s == v.s && u.t == v.t
}

/// Sweep order with s and t swapped.
#[inline]
pub fn trans_leq(u: Point2, v: Point2) -> bool {
    u.t < v.t || (u.t == v.t && u.s <= v.s)
}

/// Given `u <= v <= w` in sweep order, returns the signed t-distance from the
/// segment `uw` to `v`, evaluated at `v.s`.
///
/// The interpolation is anchored at whichever endpoint is closer in s, which
/// keeps the result accurate when `v` sits near either end. A vertical `uw`
/// yields zero.
pub fn edge_eval(u: Point2, v: Point2, w: Point2) -> Real {
    let gap_l = v.s - u.s;
    let gap_r = w.s - v.s;
    if gap_l + gap_r > 0.0 {
        if gap_l < gap_r {
            (v.t - u.t) + (u.t - w.t) * (gap_l / (gap_l + gap_r))
        } else {
            (v.t - w.t) + (w.t - u.t) * (gap_r / (gap_l + gap_r))
        }
    } else {
        0.0
    }
}

/// Same sign as [`edge_eval`] without the division.
///
/// Degenerate input can violate the ordering precondition; the result is then
/// still finite but its sign is only a best effort.
pub fn edge_sign(u: Point2, v: Point2, w: Point2) -> Real {
    let gap_l = v.s - u.s;
    let gap_r = w.s - v.s;
    if gap_l + gap_r > 0.0 {
        (v.t - w.t) * gap_l + (v.t - u.t) * gap_r
    } else {
        0.0
    }
}

/// [`edge_eval`] with s and t transposed. Requires `u <= v <= w` under [`trans_leq`].
pub fn trans_eval(u: Point2, v: Point2, w: Point2) -> Real {
    edge_eval(u.transposed(), v.transposed(), w.transposed())
}

/// [`edge_sign`] with s and t transposed.
pub fn trans_sign(u: Point2, v: Point2, w: Point2) -> Real {
    edge_sign(u.transposed(), v.transposed(), w.transposed())
}

/// True when the triangle `u v w` has non-negative signed area.
#[inline]
pub fn vert_ccw(u: Point2, v: Point2, w: Point2) -> bool {
    u.s * (v.t - w.t) + v.s * (w.t - u.t) + w.s * (u.t - v.t) >= 0.0
}

/// Euclidean distance on the sweep plane.
#[inline]
pub fn vert_dist(u: Point2, v: Point2) -> Real {
    (u.s - v.s).hypot(u.t - v.t)
}

/// Returns `(b*x + a*y) / (a + b)` with negative weights clamped to zero.
///
/// The result always lies between `x` and `y`, including when one weight
/// dwarfs the other. Two zero weights give the midpoint.
#[inline]
pub fn interpolate(a: Real, x: Real, b: Real, y: Real) -> Real {
    let a = a.max(0.0);
    let b = b.max(0.0);
    if a <= b {
        if b == 0.0 {
            x / 2.0 + y / 2.0
        } else {
            x + (y - x) * (a / (a + b))
        }
    } else {
        y + (x - y) * (b / (a + b))
    }
}

// One coordinate of the intersection, computed in the ordering given by `leq`.
// `eval` and `sign` must be the matching edge predicates and `pick` selects the
// coordinate being solved for.
fn intersect_axis(
    mut o1: Point2,
    mut d1: Point2,
    mut o2: Point2,
    mut d2: Point2,
    leq: fn(Point2, Point2) -> bool,
    eval: fn(Point2, Point2, Point2) -> Real,
    sign: fn(Point2, Point2, Point2) -> Real,
    pick: fn(Point2) -> Real,
) -> Real {
    if !leq(o1, d1) {
        std::mem::swap(&mut o1, &mut d1);
    }
    if !leq(o2, d2) {
        std::mem::swap(&mut o2, &mut d2);
    }
    if !leq(o1, o2) {
        std::mem::swap(&mut o1, &mut o2);
        std::mem::swap(&mut d1, &mut d2);
    }

    if !leq(o2, d1) {
        // No overlap in this ordering; split the gap.
        return pick(o2) / 2.0 + pick(d1) / 2.0;
    }

    let (mut z1, mut z2, far) = if leq(d1, d2) {
        // Interpolate between o2 and d1.
        (eval(o1, o2, d1), eval(o2, d1, d2), d1)
    } else {
        // Interpolate between o2 and d2.
        (sign(o1, o2, d1), -sign(o1, d2, d1), d2)
    };
    if z1 + z2 < 0.0 {
        z1 = -z1;
        z2 = -z2;
    }
    interpolate(z1, pick(o2), z2, pick(far))
}

/// Intersection of segments `o1 d1` and `o2 d2`.
///
/// The result always lies inside the bounding rectangle of both segments, even
/// when they do not actually cross or are nearly parallel.
pub fn edge_intersect(o1: Point2, d1: Point2, o2: Point2, d2: Point2) -> Point2 {
    let s = intersect_axis(o1, d1, o2, d2, vert_leq, edge_eval, edge_sign, |p| p.s);
    let t = intersect_axis(o1, d1, o2, d2, trans_leq, trans_eval, trans_sign, |p| p.t);
    Point2 { s, t }
}
