// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Keeping the dictionary consistent after edges are added: adjacent edges whose
// endpoints break the ordering are spliced together, and crossing edges are
// split at a new vertex that is queued as a future event.

use super::{add_winding, Sweep, SweepResult, MAX_REPAIR_DEPTH};
use crate::error::TessError;
use crate::geom::{edge_intersect, edge_sign, vert_dist, vert_eq, vert_leq, Point2, Real};
use crate::mesh::{Mesh, RegionId, VertId, NIL};
use crate::tess::TESS_UNDEF;

/// Share of `org` and `dst` in a point at `isect` on the edge between them.
///
/// Each edge contributes half of the total weight, split inversely to the
/// distance from the crossing. A zero-length edge splits its half evenly.
fn vertex_weights(isect: Point2, org: Point2, dst: Point2) -> (Real, Real) {
    let t1 = vert_dist(org, isect);
    let t2 = vert_dist(dst, isect);
    let sum = t1 + t2;
    if sum > 0.0 {
        (0.5 * t2 / sum, 0.5 * t1 / sum)
    } else {
        (0.25, 0.25)
    }
}

/// Fills the original-space coordinates of the crossing vertex `isect` from
/// the endpoints of the two edges that produced it.
fn intersect_data(mesh: &mut Mesh, isect: VertId, ends: [VertId; 4]) {
    let at = mesh.pos(isect);
    let (w0, w1) = vertex_weights(at, mesh.pos(ends[0]), mesh.pos(ends[1]));
    let (w2, w3) = vertex_weights(at, mesh.pos(ends[2]), mesh.pos(ends[3]));
    let mut coords = [0.0; 3];
    for (&v, w) in ends.iter().zip([w0, w1, w2, w3]) {
        let c = mesh.verts[v].coords;
        for i in 0..3 {
            coords[i] += w * c[i];
        }
    }
    let vert = &mut mesh.verts[isect];
    vert.coords = coords;
    vert.idx = TESS_UNDEF;
}

impl Sweep<'_> {
    /// Re-checks adjacent pairs from the lowest dirty region upward until
    /// no region is dirty.
    pub(super) fn walk_dirty_regions(&mut self, reg_up: RegionId) -> SweepResult<()> {
        self.repair_depth += 1;
        if self.repair_depth > MAX_REPAIR_DEPTH {
            return Err(TessError::Sweep("intersection repair nested too deeply"));
        }
        let result = self.walk_dirty_regions_inner(reg_up);
        self.repair_depth = self.repair_depth.saturating_sub(1);
        result
    }

    fn walk_dirty_regions_inner(&mut self, mut reg_up: RegionId) -> SweepResult<()> {
        let mut reg_lo = self.region_below(reg_up);
        loop {
            while self.is_dirty(reg_lo) {
                reg_up = reg_lo;
                reg_lo = self.region_below(reg_lo);
            }
            if !self.is_dirty(reg_up) {
                reg_lo = reg_up;
                reg_up = self.region_above(reg_up);
                if !self.is_dirty(reg_up) {
                    return Ok(());
                }
            }
            self.regions[reg_up].dirty = false;
            let mut e_up = self.regions[reg_up].e_up;
            let mut e_lo = self.regions[reg_lo].e_up;

            if self.mesh.dst(e_up) != self.mesh.dst(e_lo) && self.check_for_left_splice(reg_up)? {
                // A temporary edge is no longer needed once the splice gave
                // its vertex a real right-going edge.
                if self.regions[reg_lo].fix_upper_edge {
                    self.delete_region(reg_lo);
                    self.mesh.delete_edge(e_lo)?;
                    reg_lo = self.region_below(reg_up);
                    e_lo = self.regions[reg_lo].e_up;
                } else if self.regions[reg_up].fix_upper_edge {
                    self.delete_region(reg_up);
                    self.mesh.delete_edge(e_up)?;
                    reg_up = self.region_above(reg_lo);
                    e_up = self.regions[reg_up].e_up;
                }
            }

            if self.mesh.org(e_up) != self.mesh.org(e_lo) {
                let at_event =
                    self.mesh.dst(e_up) == self.event || self.mesh.dst(e_lo) == self.event;
                if self.mesh.dst(e_up) != self.mesh.dst(e_lo)
                    && !self.regions[reg_up].fix_upper_edge
                    && !self.regions[reg_lo].fix_upper_edge
                    && at_event
                {
                    // The event may be used as the crossing location, which
                    // needs it between the two edges and neither temporary.
                    if self.check_for_intersect(reg_up)? {
                        // Handled by a nested walk.
                        return Ok(());
                    }
                } else {
                    self.check_for_right_splice(reg_up)?;
                }
            }

            if self.mesh.org(e_up) == self.mesh.org(e_lo) && self.mesh.dst(e_up) == self.mesh.dst(e_lo) {
                // Two edges forming a closed loop; keep one.
                add_winding(self.mesh, e_lo, e_up);
                self.delete_region(reg_up);
                self.mesh.delete_edge(e_up)?;
                reg_up = self.region_above(reg_lo);
            }
        }
    }

    /// Restores dictionary order at the right (origin) ends of `reg_up`'s
    /// upper edge and the edge below it, splicing the origin that lies on the
    /// wrong side into the other edge. Returns whether anything changed.
    pub(super) fn check_for_right_splice(&mut self, reg_up: RegionId) -> SweepResult<bool> {
        let reg_lo = self.region_below(reg_up);
        let e_up = self.regions[reg_up].e_up;
        let e_lo = self.regions[reg_lo].e_up;
        let (org_up, org_lo) = (self.mesh.org_pos(e_up), self.mesh.org_pos(e_lo));

        if vert_leq(org_up, org_lo) {
            if edge_sign(self.mesh.dst_pos(e_lo), org_up, org_lo) > 0.0 {
                return Ok(false);
            }
            if !vert_eq(org_up, org_lo) {
                // Splice e_up.Org into e_lo.
                self.mesh.split_edge(e_lo ^ 1)?;
                self.mesh.splice(e_up, self.mesh.oprev(e_lo))?;
                self.mark_dirty(&[reg_up, reg_lo]);
            } else if self.mesh.org(e_up) != self.mesh.org(e_lo) {
                // Same position: merge the vertices, dropping e_up.Org.
                let dropped = self.mesh.org(e_up);
                let h = self.mesh.verts[dropped].pq_handle;
                if self.pq.contains(h) {
                    self.pq.delete(h);
                }
                self.mesh.splice(self.mesh.oprev(e_lo), e_up)?;
            }
        } else {
            if edge_sign(self.mesh.dst_pos(e_up), org_lo, org_up) < 0.0 {
                return Ok(false);
            }
            // Splice e_lo.Org into e_up.
            let above = self.region_above(reg_up);
            self.mark_dirty(&[above, reg_up]);
            self.mesh.split_edge(e_up ^ 1)?;
            self.mesh.splice(self.mesh.oprev(e_lo), e_up)?;
        }
        Ok(true)
    }

    /// Restores dictionary order at the left (destination) ends, which are
    /// already processed. The destinations must differ.
    pub(super) fn check_for_left_splice(&mut self, reg_up: RegionId) -> SweepResult<bool> {
        let reg_lo = self.region_below(reg_up);
        let e_up = self.regions[reg_up].e_up;
        let e_lo = self.regions[reg_lo].e_up;
        let (dst_up, dst_lo) = (self.mesh.dst_pos(e_up), self.mesh.dst_pos(e_lo));

        if vert_leq(dst_up, dst_lo) {
            if edge_sign(dst_up, dst_lo, self.mesh.org_pos(e_up)) < 0.0 {
                return Ok(false);
            }
            // e_lo.Dst is above e_up: splice it into e_up.
            let above = self.region_above(reg_up);
            self.mark_dirty(&[above, reg_up]);
            let e = self.mesh.split_edge(e_up)?;
            self.mesh.splice(e_lo ^ 1, e)?;
            let f = self.mesh.lface(e);
            self.mesh.faces[f].inside = self.regions[reg_up].inside;
        } else {
            if edge_sign(dst_lo, dst_up, self.mesh.org_pos(e_lo)) > 0.0 {
                return Ok(false);
            }
            // e_up.Dst is below e_lo: splice it into e_lo.
            self.mark_dirty(&[reg_up, reg_lo]);
            let e = self.mesh.split_edge(e_lo)?;
            self.mesh.splice(self.mesh.lnext(e_up), e_lo ^ 1)?;
            let f = self.mesh.rface(e);
            self.mesh.faces[f].inside = self.regions[reg_up].inside;
        }
        Ok(true)
    }

    /// Tests `reg_up`'s upper edge against the edge below it for a crossing
    /// right of the sweep line. A crossing becomes a new queued vertex that
    /// both edges pass through.
    ///
    /// Returns true only when a nested walk already repaired everything, in
    /// which case the caller must stop walking.
    pub(super) fn check_for_intersect(&mut self, mut reg_up: RegionId) -> SweepResult<bool> {
        let mut reg_lo = self.region_below(reg_up);
        let e_up = self.regions[reg_up].e_up;
        let mut e_lo = self.regions[reg_lo].e_up;
        let (org_up, org_lo) = (self.mesh.org(e_up), self.mesh.org(e_lo));
        let (dst_up, dst_lo) = (self.mesh.dst(e_up), self.mesh.dst(e_lo));
        let p_org_up = self.mesh.pos(org_up);
        let p_org_lo = self.mesh.pos(org_lo);
        let p_dst_up = self.mesh.pos(dst_up);
        let p_dst_lo = self.mesh.pos(dst_lo);
        let event = self.event;
        let ev = self.mesh.pos(event);

        if org_up == org_lo {
            return Ok(false);
        }
        let t_min_up = p_org_up.t.min(p_dst_up.t);
        let t_max_lo = p_org_lo.t.max(p_dst_lo.t);
        if t_min_up > t_max_lo {
            return Ok(false);
        }
        if vert_leq(p_org_up, p_org_lo) {
            if edge_sign(p_dst_lo, p_org_up, p_org_lo) > 0.0 {
                return Ok(false);
            }
        } else if edge_sign(p_dst_up, p_org_lo, p_org_up) < 0.0 {
            return Ok(false);
        }

        let mut isect = edge_intersect(p_dst_up, p_org_up, p_dst_lo, p_org_lo);
        if vert_leq(isect, ev) {
            // Rounding put the crossing left of the sweep line.
            isect = ev;
        }
        let org_min = if vert_leq(p_org_up, p_org_lo) { p_org_up } else { p_org_lo };
        if vert_leq(org_min, isect) {
            isect = org_min;
        }
        log::trace!("edges {e_up} and {e_lo} cross near {isect:?}");

        if vert_eq(isect, p_org_up) || vert_eq(isect, p_org_lo) {
            self.check_for_right_splice(reg_up)?;
            return Ok(false);
        }

        let up_wrong = !vert_eq(p_dst_up, ev) && edge_sign(p_dst_up, ev, isect) >= 0.0;
        let lo_wrong = !vert_eq(p_dst_lo, ev) && edge_sign(p_dst_lo, ev, isect) <= 0.0;
        if up_wrong || lo_wrong {
            // A new edge would pass on the wrong side of the event, or through
            // it. Only rounding gets us here.
            if dst_lo == event {
                // Splice dst_lo into e_up and process the new regions.
                self.mesh.split_edge(e_up ^ 1)?;
                self.mesh.splice(e_lo ^ 1, e_up)?;
                reg_up = self.top_left_region(reg_up)?;
                let below = self.region_below(reg_up);
                let e_up = self.regions[below].e_up;
                self.finish_left_regions(below, reg_lo)?;
                let e_first = self.mesh.oprev(e_up);
                self.add_right_edges(reg_up, e_first, e_up, e_up, true)?;
                return Ok(true);
            }
            if dst_up == event {
                // Splice dst_up into e_lo and process the new regions.
                self.mesh.split_edge(e_lo ^ 1)?;
                self.mesh.splice(self.mesh.lnext(e_up), self.mesh.oprev(e_lo))?;
                reg_lo = reg_up;
                reg_up = self.top_right_region(reg_up);
                if reg_up == NIL {
                    return Err(TessError::Sweep("ran past the top sentinel"));
                }
                let below = self.region_below(reg_up);
                let e = self.mesh.rprev(self.regions[below].e_up);
                self.regions[reg_lo].e_up = self.mesh.oprev(e_lo);
                e_lo = self.finish_left_regions(reg_lo, NIL)?;
                let e_first = self.mesh.onext(e_lo);
                let e_last = self.mesh.rprev(e_up);
                self.add_right_edges(reg_up, e_first, e_last, e, true)?;
                return Ok(true);
            }

            // Called on behalf of a right vertex: split whichever edge is on
            // the wrong side at the event and leave the splice to the caller.
            if edge_sign(p_dst_up, ev, isect) >= 0.0 {
                let above = self.region_above(reg_up);
                self.mark_dirty(&[above, reg_up]);
                self.mesh.split_edge(e_up ^ 1)?;
                let v = self.mesh.org(e_up);
                self.mesh.verts[v].pos = ev;
            }
            if edge_sign(p_dst_lo, ev, isect) <= 0.0 {
                self.mark_dirty(&[reg_up, reg_lo]);
                self.mesh.split_edge(e_lo ^ 1)?;
                let v = self.mesh.org(e_lo);
                self.mesh.verts[v].pos = ev;
            }
            return Ok(false);
        }

        // General case: split both edges and join them at a new vertex. The
        // splice direction keeps new faces on the already processed side.
        self.mesh.split_edge(e_up ^ 1)?;
        self.mesh.split_edge(e_lo ^ 1)?;
        self.mesh.splice(self.mesh.oprev(e_lo), e_up)?;
        let v = self.mesh.org(e_up);
        self.mesh.verts[v].pos = isect;
        self.mesh.verts[v].pq_handle = self.pq.insert(super::EventKey { pos: isect, vert: v });
        intersect_data(self.mesh, v, [org_up, dst_up, org_lo, dst_lo]);
        let above = self.region_above(reg_up);
        self.mark_dirty(&[above, reg_up, reg_lo]);
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::vertex_weights;
    use crate::geom::Point2;
    use approx::assert_relative_eq;

    #[test]
    fn weights_favour_the_nearer_endpoint() {
        let (w_org, w_dst) = vertex_weights(
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
        );
        assert_relative_eq!(w_org + w_dst, 0.5);
        assert_relative_eq!(w_org, 0.375);
        assert_relative_eq!(w_dst, 0.125);
    }

    #[test]
    fn weights_split_evenly_on_zero_length_edge() {
        let p = Point2::new(2.0, 3.0);
        assert_eq!(vertex_weights(p, p, p), (0.25, 0.25));
    }
}
