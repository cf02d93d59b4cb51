// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)

use super::{Sweep, SweepResult};
use crate::dict::NodeId;
use crate::geom::{edge_eval, edge_sign, vert_leq};
use crate::mesh::{EdgeId, Mesh, RegionId, VertId, NIL};

/// The strip between `e_up` and the next dictionary edge below it.
///
/// `e_up` points right to left, so its origin is the right endpoint.
#[derive(Clone, Debug)]
pub struct ActiveRegion {
    pub e_up: EdgeId,
    pub node_up: NodeId,
    pub winding_number: i32,
    pub inside: bool,
    /// One of the two edges bounding the whole sweep from below and above.
    pub sentinel: bool,
    /// Adjacent edge pair needs re-checking for order and intersection.
    pub dirty: bool,
    /// `e_up` is a temporary edge that must be replaced once a real
    /// right-going edge exists at its left endpoint.
    pub fix_upper_edge: bool,
}

impl Default for ActiveRegion {
    fn default() -> Self {
        ActiveRegion {
            e_up: NIL,
            node_up: NIL,
            winding_number: 0,
            inside: false,
            sentinel: false,
            dirty: false,
            fix_upper_edge: false,
        }
    }
}

/// Dictionary order: true if `e1` lies at or below `e2` where the sweep line
/// crosses them at `event`.
///
/// Edges ending at the event itself are compared by slope, which is the only
/// ordering that survives once both edges meet at the event.
pub(super) fn edge_leq(mesh: &Mesh, event: VertId, e1: EdgeId, e2: EdgeId) -> bool {
    let ev = mesh.pos(event);
    let (o1, d1) = (mesh.org_pos(e1), mesh.dst_pos(e1));
    let (o2, d2) = (mesh.org_pos(e2), mesh.dst_pos(e2));

    if mesh.dst(e1) == event {
        if mesh.dst(e2) == event {
            if vert_leq(o1, o2) {
                return edge_sign(d2, o1, o2) <= 0.0;
            }
            return edge_sign(d1, o2, o1) >= 0.0;
        }
        return edge_sign(d2, ev, o2) <= 0.0;
    }
    if mesh.dst(e2) == event {
        return edge_sign(d1, ev, o1) >= 0.0;
    }

    let t1 = edge_eval(d1, ev, o1);
    let t2 = edge_eval(d2, ev, o2);
    t1 >= t2
}

impl Sweep<'_> {
    #[inline]
    pub(super) fn region_above(&self, reg: RegionId) -> RegionId {
        let node = self.dict.succ(self.regions[reg].node_up);
        self.dict.key(node).unwrap_or(NIL)
    }

    #[inline]
    pub(super) fn region_below(&self, reg: RegionId) -> RegionId {
        let node = self.dict.pred(self.regions[reg].node_up);
        self.dict.key(node).unwrap_or(NIL)
    }

    #[inline]
    pub(super) fn is_dirty(&self, reg: RegionId) -> bool {
        reg != NIL && self.regions[reg].dirty
    }

    pub(super) fn mark_dirty(&mut self, regs: &[RegionId]) {
        for &r in regs {
            if r != NIL {
                self.regions[r].dirty = true;
            }
        }
    }

    #[inline]
    pub(super) fn edge_region(&self, e: EdgeId) -> RegionId {
        self.mesh.edge(e).region
    }

    /// Opens a region for `e_new_up` directly below `reg_above`.
    pub(super) fn add_region_below(&mut self, reg_above: RegionId, e_new_up: EdgeId) -> RegionId {
        let reg = self.regions.alloc(ActiveRegion {
            e_up: e_new_up,
            ..ActiveRegion::default()
        });
        let above_node = self.regions[reg_above].node_up;
        let node = {
            let (mesh, regions, event) = (&*self.mesh, &self.regions, self.event);
            self.dict.insert_before(above_node, reg, |a, b| {
                edge_leq(mesh, event, regions[a].e_up, regions[b].e_up)
            })
        };
        self.regions[reg].node_up = node;
        self.mesh.edge_mut(e_new_up).region = reg;
        reg
    }

    pub(super) fn delete_region(&mut self, reg: RegionId) {
        let (e_up, node, fix) = {
            let r = &self.regions[reg];
            (r.e_up, r.node_up, r.fix_upper_edge)
        };
        if fix {
            log::trace!("dropping temporary region {reg}");
        }
        if self.mesh.edge(e_up).region == reg {
            self.mesh.edge_mut(e_up).region = NIL;
        }
        self.dict.delete(node);
        self.regions.free(reg);
    }

    /// Replaces the temporary upper edge of `reg` with `new_edge`.
    pub(super) fn fix_upper_edge(&mut self, reg: RegionId, new_edge: EdgeId) -> SweepResult<()> {
        let old = self.regions[reg].e_up;
        self.mesh.delete_edge(old)?;
        let r = &mut self.regions[reg];
        r.fix_upper_edge = false;
        r.e_up = new_edge;
        self.mesh.edge_mut(new_edge).region = reg;
        Ok(())
    }

    pub(super) fn compute_winding(&mut self, reg: RegionId) {
        let above = self.region_above(reg);
        let n = self.regions[above].winding_number + self.mesh.edge(self.regions[reg].e_up).winding;
        let r = &mut self.regions[reg];
        r.winding_number = n;
        r.inside = self.rule.is_inside(n);
    }

    /// Region above the uppermost edge sharing the origin of `reg`'s upper
    /// edge. A temporary edge found there is replaced by a real connection.
    pub(super) fn top_left_region(&mut self, mut reg: RegionId) -> SweepResult<RegionId> {
        let org = self.mesh.org(self.regions[reg].e_up);
        loop {
            reg = self.region_above(reg);
            if reg == NIL {
                return Err(crate::error::TessError::Sweep("ran past the top sentinel"));
            }
            if self.mesh.org(self.regions[reg].e_up) != org {
                break;
            }
        }

        if self.regions[reg].fix_upper_edge {
            let below = self.region_below(reg);
            let e_org = self.regions[below].e_up ^ 1;
            let e_dst = self.mesh.lnext(self.regions[reg].e_up);
            let e = self.mesh.connect(e_org, e_dst)?;
            self.fix_upper_edge(reg, e)?;
            reg = self.region_above(reg);
        }
        Ok(reg)
    }

    /// Region above the uppermost edge sharing the destination of `reg`'s
    /// upper edge.
    pub(super) fn top_right_region(&self, mut reg: RegionId) -> RegionId {
        let dst = self.mesh.dst(self.regions[reg].e_up);
        loop {
            reg = self.region_above(reg);
            if reg == NIL || self.mesh.dst(self.regions[reg].e_up) != dst {
                return reg;
            }
        }
    }

    /// Labels the face left of `reg`'s upper edge and closes the region.
    pub(super) fn finish_region(&mut self, reg: RegionId) {
        let e = self.regions[reg].e_up;
        let f = self.mesh.lface(e);
        let face = &mut self.mesh.faces[f];
        face.inside = self.regions[reg].inside;
        face.an_edge = e;
        self.delete_region(reg);
    }
}
