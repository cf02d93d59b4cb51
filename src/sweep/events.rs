// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Event processing: closing regions at a vertex and opening regions for its
// right-going edges.

use super::region::edge_leq;
use super::{add_winding, Sweep, SweepResult};
use crate::error::TessError;
use crate::geom::{edge_sign, vert_eq, vert_leq};
use crate::mesh::{EdgeId, RegionId, VertId, NIL};

impl Sweep<'_> {
    /// Processes the vertex `v_event`, the current leftmost unprocessed vertex.
    pub(super) fn sweep_event(&mut self, v_event: VertId) -> SweepResult<()> {
        self.event = v_event;
        log::trace!("sweep event {v_event} at {:?}", self.mesh.pos(v_event));

        // Look for an edge already in the dictionary that ends here; if there
        // is none the vertex only has right-going edges.
        let first = self.mesh.verts[v_event].an_edge;
        let mut e = first;
        while self.edge_region(e) == NIL {
            e = self.mesh.onext(e);
            if e == first {
                return self.connect_left_vertex(v_event);
            }
        }

        // Close every region whose upper and lower edges both end here, then
        // open regions for the right-going edges.
        let reg_up = self.top_left_region(self.edge_region(e))?;
        let reg = self.region_below(reg_up);
        let e_top_left = self.regions[reg].e_up;
        let e_bottom_left = self.finish_left_regions(reg, NIL)?;

        if self.mesh.onext(e_bottom_left) == e_top_left {
            self.connect_right_vertex(reg_up, e_bottom_left)
        } else {
            let e_first = self.mesh.onext(e_bottom_left);
            self.add_right_edges(reg_up, e_first, e_top_left, e_top_left, true)
        }
    }

    /// Closes regions from `reg_first` downward until `reg_last` (or until
    /// the left-going edges at this origin run out) and relinks those edges
    /// around the event in dictionary order. Returns the lowest left-going edge.
    pub(super) fn finish_left_regions(
        &mut self,
        reg_first: RegionId,
        reg_last: RegionId,
    ) -> SweepResult<EdgeId> {
        let mut reg_prev = reg_first;
        let mut e_prev = self.regions[reg_first].e_up;

        while reg_prev != reg_last {
            self.regions[reg_prev].fix_upper_edge = false;
            let reg = self.region_below(reg_prev);
            if reg == NIL {
                return Err(TessError::Sweep("ran past the bottom sentinel"));
            }
            let mut e = self.regions[reg].e_up;

            if self.mesh.org(e) != self.mesh.org(e_prev) {
                if !self.regions[reg].fix_upper_edge {
                    // No more left-going edges in the dictionary, though the
                    // mesh may still hold some at this origin.
                    self.finish_region(reg_prev);
                    break;
                }
                // The edge below is temporary; replace it with a real one.
                let e_org = self.mesh.lprev(e_prev);
                e = self.mesh.connect(e_org, e ^ 1)?;
                self.fix_upper_edge(reg, e)?;
            }

            if self.mesh.onext(e_prev) != e {
                self.mesh.splice(self.mesh.oprev(e), e)?;
                self.mesh.splice(e_prev, e)?;
            }
            self.finish_region(reg_prev);
            e_prev = self.regions[reg].e_up;
            reg_prev = reg;
        }
        Ok(e_prev)
    }

    /// Adds regions for the right-going edges `e_first` up to (not including)
    /// `e_last`, all sharing one origin, below `reg_up`.
    ///
    /// Afterwards every right-going edge at that origin is walked in dictionary
    /// order to relink the mesh to match and to assign windings. `e_top_left`
    /// is the edge just above them in the origin's ring; NIL means the origin
    /// has no left-going edges. When `clean_up` is set, newly adjacent pairs
    /// are checked for crossings.
    pub(super) fn add_right_edges(
        &mut self,
        reg_up: RegionId,
        e_first: EdgeId,
        e_last: EdgeId,
        e_top_left: EdgeId,
        clean_up: bool,
    ) -> SweepResult<()> {
        let mut e = e_first;
        loop {
            self.add_region_below(reg_up, e ^ 1);
            e = self.mesh.onext(e);
            if e == e_last {
                break;
            }
        }

        let e_top_left = if e_top_left == NIL {
            let below = self.region_below(reg_up);
            self.mesh.rprev(self.regions[below].e_up)
        } else {
            e_top_left
        };

        let mut reg_prev = reg_up;
        let mut e_prev = e_top_left;
        let mut first_time = true;
        loop {
            let reg = self.region_below(reg_prev);
            if reg == NIL {
                break;
            }
            let e = self.regions[reg].e_up ^ 1;
            if self.mesh.org(e) != self.mesh.org(e_prev) {
                break;
            }

            if self.mesh.onext(e) != e_prev {
                // Move e directly below e_prev in the origin ring.
                self.mesh.splice(self.mesh.oprev(e), e)?;
                self.mesh.splice(self.mesh.oprev(e_prev), e)?;
            }
            let n = self.regions[reg_prev].winding_number - self.mesh.edge(e).winding;
            {
                let r = &mut self.regions[reg];
                r.winding_number = n;
                r.inside = self.rule.is_inside(n);
            }

            // Two edges leaving with the same slope are merged before any
            // crossing test sees them.
            self.regions[reg_prev].dirty = true;
            if !first_time && self.check_for_right_splice(reg_prev)? {
                add_winding(self.mesh, e, e_prev);
                self.delete_region(reg_prev);
                self.mesh.delete_edge(e_prev)?;
            }
            first_time = false;
            reg_prev = reg;
            e_prev = e;
        }
        self.regions[reg_prev].dirty = true;

        if clean_up {
            self.walk_dirty_regions(reg_prev)?;
        }
        Ok(())
    }

    /// The event has no processed neighbours: find the region that contains
    /// it and either connect it to that region's boundary or, when the region
    /// is outside, just open regions for its edges.
    fn connect_left_vertex(&mut self, v_event: VertId) -> SweepResult<()> {
        let probe = self.mesh.verts[v_event].an_edge ^ 1;
        let node = {
            let (mesh, regions, event) = (&*self.mesh, &self.regions, self.event);
            let up_of = |r: RegionId| if r == NIL { probe } else { regions[r].e_up };
            self.dict
                .search(NIL, |a, b| edge_leq(mesh, event, up_of(a), up_of(b)))
        };
        let reg_up = match self.dict.key(node) {
            Some(r) => r,
            None => return Err(TessError::Sweep("event lies above the top sentinel")),
        };
        let reg_lo = self.region_below(reg_up);
        if reg_lo == NIL {
            // Only possible when every input vertex is coplanar with nothing
            // below; there is nothing to connect to.
            return Ok(());
        }
        let e_up = self.regions[reg_up].e_up;
        let e_lo = self.regions[reg_lo].e_up;

        if edge_sign(self.mesh.dst_pos(e_up), self.mesh.pos(v_event), self.mesh.org_pos(e_up)) == 0.0 {
            return self.connect_left_degenerate(reg_up, v_event);
        }

        // Connect to the rightmost processed vertex of either chain.
        let reg = if vert_leq(self.mesh.dst_pos(e_lo), self.mesh.dst_pos(e_up)) {
            reg_up
        } else {
            reg_lo
        };

        if self.regions[reg_up].inside || self.regions[reg].fix_upper_edge {
            let an_edge = self.mesh.verts[v_event].an_edge;
            let e_new = if reg == reg_up {
                self.mesh.connect(an_edge ^ 1, self.mesh.lnext(e_up))?
            } else {
                self.mesh.connect(self.mesh.dnext(e_lo), an_edge)? ^ 1
            };
            if self.regions[reg].fix_upper_edge {
                self.fix_upper_edge(reg, e_new)?;
            } else {
                let new_reg = self.add_region_below(reg_up, e_new);
                self.compute_winding(new_reg);
            }
            self.sweep_event(v_event)
        } else {
            // Outside the polygon; the vertex does not need connecting.
            let an_edge = self.mesh.verts[v_event].an_edge;
            self.add_right_edges(reg_up, an_edge, an_edge, NIL, true)
        }
    }

    /// The event lies exactly on the upper edge of `reg_up`.
    fn connect_left_degenerate(&mut self, reg_up: RegionId, v_event: VertId) -> SweepResult<()> {
        let e = self.regions[reg_up].e_up;
        let ev = self.mesh.pos(v_event);

        if vert_eq(self.mesh.org_pos(e), ev) {
            // The origin is still queued. Merge the event into it and let
            // the survivor be handled when it is dequeued.
            let an_edge = self.mesh.verts[v_event].an_edge;
            return Ok(self.mesh.splice(e, an_edge)?);
        }

        if !vert_eq(self.mesh.dst_pos(e), ev) {
            // The edge passes through the event: split it there.
            self.mesh.split_edge(e ^ 1)?;
            if self.regions[reg_up].fix_upper_edge {
                // Only the part left of the split was needed.
                self.mesh.delete_edge(self.mesh.onext(e))?;
                self.regions[reg_up].fix_upper_edge = false;
            }
            let an_edge = self.mesh.verts[v_event].an_edge;
            self.mesh.splice(an_edge, e)?;
            return self.sweep_event(v_event);
        }

        // The event coincides with the already processed e.Dst; splice in
        // the extra right-going edges.
        let reg_up = self.top_right_region(reg_up);
        if reg_up == NIL {
            return Err(TessError::Sweep("ran past the top sentinel"));
        }
        let reg = self.region_below(reg_up);
        let mut e_top_right = self.regions[reg].e_up ^ 1;
        let mut e_top_left = self.mesh.onext(e_top_right);
        let e_last = e_top_left;
        if self.regions[reg].fix_upper_edge {
            // The temporary edge is the only right-going edge there; real ones
            // replace it now.
            self.delete_region(reg);
            self.mesh.delete_edge(e_top_right)?;
            e_top_right = self.mesh.oprev(e_top_left);
        }
        let an_edge = self.mesh.verts[v_event].an_edge;
        self.mesh.splice(an_edge, e_top_right)?;
        if !self.mesh.edge_goes_left(e_top_left) {
            e_top_left = NIL;
        }
        let e_first = self.mesh.onext(e_top_right);
        self.add_right_edges(reg_up, e_first, e_last, e_top_left, true)
    }

    /// The event has left-going edges but no right-going ones. Connect it to
    /// the nearer origin of the bounding edges with a temporary edge so the
    /// region below stays attached, unless a degeneracy lets us splice instead.
    fn connect_right_vertex(&mut self, mut reg_up: RegionId, mut e_bottom_left: EdgeId) -> SweepResult<()> {
        let mut e_top_left = self.mesh.onext(e_bottom_left);
        let reg_lo = self.region_below(reg_up);
        let e_up = self.regions[reg_up].e_up;
        let e_lo = self.regions[reg_lo].e_up;
        let mut degenerate = false;

        if self.mesh.dst(e_up) != self.mesh.dst(e_lo) {
            self.check_for_intersect(reg_up)?;
        }

        // The bounding edges may now pass through the event.
        let ev = self.mesh.pos(self.event);
        if vert_eq(self.mesh.org_pos(e_up), ev) {
            self.mesh.splice(self.mesh.oprev(e_top_left), e_up)?;
            reg_up = self.top_left_region(reg_up)?;
            let below = self.region_below(reg_up);
            e_top_left = self.regions[below].e_up;
            self.finish_left_regions(below, reg_lo)?;
            degenerate = true;
        }
        if vert_eq(self.mesh.org_pos(e_lo), ev) {
            self.mesh.splice(e_bottom_left, self.mesh.oprev(e_lo))?;
            e_bottom_left = self.finish_left_regions(reg_lo, NIL)?;
            degenerate = true;
        }
        if degenerate {
            let e_first = self.mesh.onext(e_bottom_left);
            return self.add_right_edges(reg_up, e_first, e_top_left, e_top_left, true);
        }

        let target = if vert_leq(self.mesh.org_pos(e_lo), self.mesh.org_pos(e_up)) {
            self.mesh.oprev(e_lo)
        } else {
            e_up
        };
        let e_new = self.mesh.connect(self.mesh.lprev(e_bottom_left), target)?;

        // No clean-up yet: e_new must survive until it is marked temporary.
        let e_new_onext = self.mesh.onext(e_new);
        self.add_right_edges(reg_up, e_new, e_new_onext, e_new_onext, false)?;
        let temp = self.edge_region(e_new ^ 1);
        if temp == NIL {
            return Err(TessError::Sweep("temporary edge has no region"));
        }
        self.regions[temp].fix_upper_edge = true;
        self.walk_dirty_regions(reg_up)
    }
}
