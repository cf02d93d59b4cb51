// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Sweep-line construction of the planar arrangement.
//
// Vertices are processed left to right in (s, t) order. The edge dictionary
// holds the edges crossing the sweep line, bottom to top; each dictionary entry
// is an active region, the strip between its upper edge and the next edge
// below. When a vertex is processed, regions that close there are finished
// (their face is labelled inside or outside by the winding rule), and regions
// for its right-going edges are opened. Crossings discovered between adjacent
// edges are turned into new vertices and queued.
//
// After the sweep every face is monotone with respect to s and carries its
// `inside` label.

mod events;
mod region;
mod repair;

pub use region::ActiveRegion;

use crate::arena::Arena;
use crate::dict::Dict;
use crate::error::TessError;
use crate::geom::{vert_eq, vert_leq, Point2};
use crate::mesh::{EdgeId, Mesh, RegionId, VertId, E_HEAD, F_HEAD, NIL};
use crate::priorityq::{PriorityQ, INVALID_HANDLE};
use crate::tess::WindingRule;

type SweepResult<T> = Result<T, TessError>;

// Nested walks of dirty regions deeper than this are treated as a failure
// instead of risking the stack.
const MAX_REPAIR_DEPTH: u32 = 512;

/// Queued sweep event: a vertex and its position when it was queued.
#[derive(Copy, Clone, Debug)]
struct EventKey {
    pos: Point2,
    vert: VertId,
}

fn event_leq(a: EventKey, b: EventKey) -> bool {
    vert_leq(a.pos, b.pos)
}

/// Sweep state for one run over a mesh.
pub struct Sweep<'m> {
    mesh: &'m mut Mesh,
    regions: Arena<ActiveRegion>,
    dict: Dict<RegionId>,
    pq: PriorityQ<EventKey>,
    event: VertId,
    rule: WindingRule,
    repair_depth: u32,
}

/// Runs the sweep over `mesh`, whose vertices already carry projected
/// positions inside the rectangle `bmin`..`bmax`.
///
/// On success every face is labelled inside or outside according to `rule`,
/// degenerate edges and two-edge faces are gone, and each face is monotone.
pub fn compute_interior(
    mesh: &mut Mesh,
    rule: WindingRule,
    bmin: Point2,
    bmax: Point2,
) -> Result<(), TessError> {
    let mut sweep = Sweep::new(mesh, rule);
    sweep.run(bmin, bmax)
}

impl<'m> Sweep<'m> {
    fn new(mesh: &'m mut Mesh, rule: WindingRule) -> Self {
        // Roughly one region per edge, plus the two sentinels.
        let regions = Arena::with_capacity(mesh.edge_count() + 2);
        Sweep {
            mesh,
            regions,
            dict: Dict::new(),
            pq: PriorityQ::new(0, event_leq),
            event: NIL,
            rule,
            repair_depth: 0,
        }
    }

    fn run(&mut self, bmin: Point2, bmax: Point2) -> SweepResult<()> {
        self.remove_degenerate_edges()?;
        self.init_priority_queue();
        self.init_edge_dict(bmin, bmax)?;

        let mut events = 0usize;
        while let Some(key) = self.pq.extract_min() {
            let v = key.vert;
            if !self.mesh.is_live_vertex(v) {
                return Err(TessError::Sweep("queued vertex was destroyed"));
            }
            self.mesh.verts[v].pq_handle = INVALID_HANDLE;

            // Merge every vertex at exactly this position before dispatching,
            // so coincident vertices are never processed as separate events.
            while let Some(next) = self.pq.minimum() {
                if !vert_eq(next.pos, self.mesh.pos(v)) {
                    break;
                }
                self.pq.extract_min();
                let w = next.vert;
                self.mesh.verts[w].pq_handle = INVALID_HANDLE;
                log::trace!("merging coincident vertex {w} into {v}");
                let (a, b) = (self.mesh.verts[v].an_edge, self.mesh.verts[w].an_edge);
                self.mesh.splice(a, b)?;
            }

            self.sweep_event(v)?;
            events += 1;
        }
        log::trace!("sweep processed {events} events");

        self.done_edge_dict()?;
        self.remove_degenerate_faces()?;
        Ok(())
    }

    // Removes zero-length edges and contours with fewer than three edges.
    fn remove_degenerate_edges(&mut self) -> SweepResult<()> {
        let mesh = &mut *self.mesh;
        let mut e = mesh.edge(E_HEAD).next;
        while e != E_HEAD {
            let mut e_next = mesh.edge(e).next;
            let mut e_lnext = mesh.lnext(e);

            if vert_eq(mesh.org_pos(e), mesh.dst_pos(e)) && mesh.lnext(e_lnext) != e {
                // Zero-length edge on a contour of three or more edges.
                log::trace!("removing zero-length edge {e}");
                mesh.splice(e_lnext, e)?;
                mesh.delete_edge(e)?;
                e = e_lnext;
                e_lnext = mesh.lnext(e);
            }
            if mesh.lnext(e_lnext) == e {
                // Contour of one or two edges.
                log::trace!("removing degenerate contour at edge {e}");
                if e_lnext != e {
                    if e_lnext == e_next || e_lnext == e_next ^ 1 {
                        e_next = mesh.edge(e_next).next;
                    }
                    mesh.delete_edge(e_lnext)?;
                }
                if e == e_next || e == e_next ^ 1 {
                    e_next = mesh.edge(e_next).next;
                }
                mesh.delete_edge(e)?;
            }
            e = e_next;
        }
        Ok(())
    }

    fn init_priority_queue(&mut self) {
        let verts: Vec<VertId> = self.mesh.vertices().collect();
        self.pq = PriorityQ::new(verts.len() + 8, event_leq);
        for v in verts {
            let key = EventKey {
                pos: self.mesh.pos(v),
                vert: v,
            };
            self.mesh.verts[v].pq_handle = self.pq.insert(key);
        }
        self.pq.init();
    }

    // Two horizontal sentinel edges below and above everything, spanning
    // further than any real edge, so every real region has neighbours.
    fn init_edge_dict(&mut self, bmin: Point2, bmax: Point2) -> SweepResult<()> {
        let pad = |extent: f64| if extent > 0.0 { extent } else { 1.0 };
        let w = pad(bmax.s - bmin.s);
        let h = pad(bmax.t - bmin.t);
        let smin = bmin.s - w;
        let smax = bmax.s + w;
        self.add_sentinel(smin, smax, bmin.t - h)?;
        self.add_sentinel(smin, smax, bmax.t + h)?;
        Ok(())
    }

    fn add_sentinel(&mut self, smin: f64, smax: f64, t: f64) -> SweepResult<()> {
        let e = self.mesh.make_edge()?;
        let (org, dst) = (self.mesh.org(e), self.mesh.dst(e));
        self.mesh.verts[org].pos = Point2::new(smax, t);
        self.mesh.verts[dst].pos = Point2::new(smin, t);
        self.event = dst;

        let reg = self.regions.alloc(ActiveRegion {
            e_up: e,
            sentinel: true,
            ..ActiveRegion::default()
        });
        let node = {
            let (mesh, regions, event) = (&*self.mesh, &self.regions, self.event);
            self.dict
                .insert(reg, |a, b| region::edge_leq(mesh, event, regions[a].e_up, regions[b].e_up))
        };
        self.regions[reg].node_up = node;
        Ok(())
    }

    // After the last event only the sentinels and at most one temporary edge
    // may remain, all with zero winding.
    fn done_edge_dict(&mut self) -> SweepResult<()> {
        let mut fixable = 0;
        while let Some(reg) = self.dict.key(self.dict.min()) {
            let r = &self.regions[reg];
            if !r.sentinel {
                if !r.fix_upper_edge {
                    return Err(TessError::Sweep("real edge left in dictionary"));
                }
                fixable += 1;
                if fixable > 1 {
                    return Err(TessError::Sweep("more than one temporary edge left"));
                }
            }
            if r.winding_number != 0 {
                return Err(TessError::Sweep("region left with non-zero winding"));
            }
            self.delete_region(reg);
        }
        Ok(())
    }

    // Deletes faces bounded by only two edges, folding the winding of the
    // removed edge into its neighbour.
    fn remove_degenerate_faces(&mut self) -> SweepResult<()> {
        let mesh = &mut *self.mesh;
        let mut f = mesh.faces[F_HEAD].next;
        while f != F_HEAD {
            let f_next = mesh.faces[f].next;
            let e = mesh.faces[f].an_edge;
            if mesh.lnext(mesh.lnext(e)) == e {
                let e_onext = mesh.onext(e);
                add_winding(mesh, e_onext, e);
                mesh.delete_edge(e)?;
            }
            f = f_next;
        }
        Ok(())
    }
}

/// Adds the winding of `src` (and its mate) to `dst` (and its mate).
fn add_winding(mesh: &mut Mesh, dst: EdgeId, src: EdgeId) {
    let w = mesh.edge(src).winding;
    let w_sym = mesh.edge(src ^ 1).winding;
    mesh.edge_mut(dst).winding += w;
    mesh.edge_mut(dst ^ 1).winding += w_sym;
}
