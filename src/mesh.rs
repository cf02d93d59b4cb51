// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Half-edge mesh.
//
// Half-edges are allocated in mated pairs: pair slot p holds half-edges 2p and
// 2p + 1, so the mate of e is always e ^ 1. Each half-edge stores only its
// origin, left face, Onext (next CCW around the origin) and Lnext (next CCW
// around the left face); every other direction is derived from those.
//
// Vertices, faces and edge pairs each form a circular doubly linked list with a
// sentinel at id 0. The edge list links one half of each pair through `next`;
// the mate's `next` holds the reverse link. New elements are always linked in
// front of the reference element the primitive is given, so a walk that is in
// progress further along a list never runs into them.

mod check;
mod finalize;

use crate::arena::Arena;
use crate::error::MeshError;
use crate::geom::{vert_leq, Point2, Real};
use crate::priorityq::{PqHandle, INVALID_HANDLE};

/// Null id for vertices, faces, edges and sweep regions.
pub const NIL: u32 = u32::MAX;

pub type VertId = u32;
pub type FaceId = u32;
pub type EdgeId = u32;
/// Id of the sweep region an edge currently bounds, or [`NIL`].
pub type RegionId = u32;

pub const V_HEAD: VertId = 0;
pub const F_HEAD: FaceId = 0;
pub const E_HEAD: EdgeId = 0;
pub const E_HEAD_SYM: EdgeId = 1;

/// Mate of a half-edge.
#[inline(always)]
pub fn sym(e: EdgeId) -> EdgeId {
    e ^ 1
}

#[derive(Clone, Debug)]
pub struct Vertex {
    pub next: VertId,
    pub prev: VertId,
    /// Some half-edge whose origin is this vertex.
    pub an_edge: EdgeId,
    /// Input coordinates.
    pub coords: [Real; 3],
    /// Projected sweep position.
    pub pos: Point2,
    pub pq_handle: PqHandle,
    /// Output number assigned during serialization.
    pub n: u32,
    /// Insertion index of the input point, or [`NIL`] for created vertices.
    pub idx: u32,
}

impl Default for Vertex {
    fn default() -> Self {
        Vertex {
            next: NIL,
            prev: NIL,
            an_edge: NIL,
            coords: [0.0; 3],
            pos: Point2::default(),
            pq_handle: INVALID_HANDLE,
            n: NIL,
            idx: NIL,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Face {
    pub next: FaceId,
    pub prev: FaceId,
    /// Some half-edge whose left face is this face.
    pub an_edge: EdgeId,
    pub n: u32,
    pub marked: bool,
    pub inside: bool,
}

impl Default for Face {
    fn default() -> Self {
        Face {
            next: NIL,
            prev: NIL,
            an_edge: NIL,
            n: NIL,
            marked: false,
            inside: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct HalfEdge {
    pub next: EdgeId,
    pub onext: EdgeId,
    pub lnext: EdgeId,
    pub org: VertId,
    pub lface: FaceId,
    pub region: RegionId,
    /// Change in winding number when crossing from the right face to the left.
    pub winding: i32,
}

impl Default for HalfEdge {
    fn default() -> Self {
        HalfEdge {
            next: NIL,
            onext: NIL,
            lnext: NIL,
            org: NIL,
            lface: NIL,
            region: NIL,
            winding: 0,
        }
    }
}

#[derive(Clone, Debug, Default)]
struct EdgePair([HalfEdge; 2]);

pub struct Mesh {
    pub verts: Arena<Vertex>,
    pub faces: Arena<Face>,
    pairs: Arena<EdgePair>,
}

impl Mesh {
    pub fn new() -> Self {
        let mut verts = Arena::new();
        let mut faces = Arena::new();
        let mut pairs = Arena::new();

        let v_head = verts.alloc(Vertex {
            next: V_HEAD,
            prev: V_HEAD,
            ..Vertex::default()
        });
        let f_head = faces.alloc(Face {
            next: F_HEAD,
            prev: F_HEAD,
            ..Face::default()
        });
        let mut head = EdgePair::default();
        head.0[0].next = E_HEAD;
        head.0[1].next = E_HEAD_SYM;
        let e_head = pairs.alloc(head);
        debug_assert!(v_head == V_HEAD && f_head == F_HEAD && e_head == E_HEAD);

        Mesh { verts, faces, pairs }
    }

    // ── Element access ──────────────────────────────────────────────────────

    #[inline]
    pub fn edge(&self, e: EdgeId) -> &HalfEdge {
        &self.pairs[e >> 1].0[(e & 1) as usize]
    }

    #[inline]
    pub fn edge_mut(&mut self, e: EdgeId) -> &mut HalfEdge {
        &mut self.pairs[e >> 1].0[(e & 1) as usize]
    }

    /// True if `e` names a half-edge of a live, non-sentinel pair.
    pub fn is_live_edge(&self, e: EdgeId) -> bool {
        e != NIL && (e >> 1) != (E_HEAD >> 1) && self.pairs.contains(e >> 1)
    }

    pub fn is_live_face(&self, f: FaceId) -> bool {
        f != NIL && f != F_HEAD && self.faces.contains(f)
    }

    pub fn is_live_vertex(&self, v: VertId) -> bool {
        v != NIL && v != V_HEAD && self.verts.contains(v)
    }

    fn live_edge(&self, e: EdgeId) -> Result<EdgeId, MeshError> {
        if self.is_live_edge(e) {
            Ok(e)
        } else {
            Err(MeshError::DeadEdge(e))
        }
    }

    /// Number of real vertices.
    pub fn vertex_count(&self) -> usize {
        self.verts.len() - 1
    }

    /// Number of real faces.
    pub fn face_count(&self) -> usize {
        self.faces.len() - 1
    }

    /// Number of real (undirected) edges.
    pub fn edge_count(&self) -> usize {
        self.pairs.len() - 1
    }

    /// Real vertices in list order.
    pub fn vertices(&self) -> impl Iterator<Item = VertId> + '_ {
        let mut v = self.verts[V_HEAD].next;
        std::iter::from_fn(move || {
            if v == V_HEAD {
                return None;
            }
            let cur = v;
            v = self.verts[v].next;
            Some(cur)
        })
    }

    /// Real faces in list order.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        let mut f = self.faces[F_HEAD].next;
        std::iter::from_fn(move || {
            if f == F_HEAD {
                return None;
            }
            let cur = f;
            f = self.faces[f].next;
            Some(cur)
        })
    }

    /// One half-edge per real edge, in list order.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        let mut e = self.edge(E_HEAD).next;
        std::iter::from_fn(move || {
            if e == E_HEAD {
                return None;
            }
            let cur = e;
            e = self.edge(e).next;
            Some(cur)
        })
    }

    /// Half-edges around the left face of `start`, following Lnext.
    pub fn face_loop(&self, start: EdgeId) -> impl Iterator<Item = EdgeId> + '_ {
        let mut e = start;
        let mut done = false;
        std::iter::from_fn(move || {
            if done {
                return None;
            }
            let cur = e;
            e = self.edge(e).lnext;
            done = e == start;
            Some(cur)
        })
    }

    // ── Navigation ──────────────────────────────────────────────────────────

    #[inline]
    pub fn org(&self, e: EdgeId) -> VertId {
        self.edge(e).org
    }

    #[inline]
    pub fn dst(&self, e: EdgeId) -> VertId {
        self.edge(e ^ 1).org
    }

    #[inline]
    pub fn lface(&self, e: EdgeId) -> FaceId {
        self.edge(e).lface
    }

    #[inline]
    pub fn rface(&self, e: EdgeId) -> FaceId {
        self.edge(e ^ 1).lface
    }

    #[inline]
    pub fn onext(&self, e: EdgeId) -> EdgeId {
        self.edge(e).onext
    }

    #[inline]
    pub fn lnext(&self, e: EdgeId) -> EdgeId {
        self.edge(e).lnext
    }

    /// Next edge clockwise around the origin.
    #[inline]
    pub fn oprev(&self, e: EdgeId) -> EdgeId {
        self.edge(e ^ 1).lnext
    }

    /// Previous edge around the left face.
    #[inline]
    pub fn lprev(&self, e: EdgeId) -> EdgeId {
        self.edge(e).onext ^ 1
    }

    #[inline]
    pub fn dprev(&self, e: EdgeId) -> EdgeId {
        self.edge(e).lnext ^ 1
    }

    #[inline]
    pub fn rprev(&self, e: EdgeId) -> EdgeId {
        self.edge(e ^ 1).onext
    }

    #[inline]
    pub fn dnext(&self, e: EdgeId) -> EdgeId {
        self.rprev(e) ^ 1
    }

    #[inline]
    pub fn rnext(&self, e: EdgeId) -> EdgeId {
        self.oprev(e) ^ 1
    }

    #[inline]
    pub fn pos(&self, v: VertId) -> Point2 {
        self.verts[v].pos
    }

    #[inline]
    pub fn org_pos(&self, e: EdgeId) -> Point2 {
        self.verts[self.org(e)].pos
    }

    #[inline]
    pub fn dst_pos(&self, e: EdgeId) -> Point2 {
        self.verts[self.dst(e)].pos
    }

    #[inline]
    pub fn edge_goes_left(&self, e: EdgeId) -> bool {
        vert_leq(self.dst_pos(e), self.org_pos(e))
    }

    #[inline]
    pub fn edge_goes_right(&self, e: EdgeId) -> bool {
        vert_leq(self.org_pos(e), self.dst_pos(e))
    }

    /// True if the face on the right of `e` exists and is inside.
    #[inline]
    pub fn edge_is_internal(&self, e: EdgeId) -> bool {
        let rf = self.rface(e);
        rf != NIL && self.faces[rf].inside
    }

    // ── Allocation helpers ──────────────────────────────────────────────────

    // New self-looped pair linked into the edge list before `e_next`.
    fn make_edge_pair(&mut self, e_next: EdgeId) -> EdgeId {
        let e_next = e_next & !1;
        let e_prev = self.edge(e_next ^ 1).next;

        let p = self.pairs.alloc(EdgePair::default());
        let e = p << 1;
        let e_sym = e | 1;

        *self.edge_mut(e) = HalfEdge {
            next: e_next,
            onext: e,
            lnext: e_sym,
            ..HalfEdge::default()
        };
        *self.edge_mut(e_sym) = HalfEdge {
            next: e_prev,
            onext: e_sym,
            lnext: e,
            ..HalfEdge::default()
        };
        self.edge_mut(e_prev ^ 1).next = e;
        self.edge_mut(e_next ^ 1).next = e_sym;
        e
    }

    // New vertex before `v_next`, made the origin of every edge around `e_orig`.
    fn make_vertex(&mut self, e_orig: EdgeId, v_next: VertId) -> VertId {
        let v_prev = self.verts[v_next].prev;
        let v = self.verts.alloc(Vertex {
            next: v_next,
            prev: v_prev,
            an_edge: e_orig,
            ..Vertex::default()
        });
        self.verts[v_prev].next = v;
        self.verts[v_next].prev = v;

        let mut e = e_orig;
        loop {
            self.edge_mut(e).org = v;
            e = self.onext(e);
            if e == e_orig {
                break;
            }
        }
        v
    }

    // New face before `f_next`, made the left face of the loop through `e_orig`.
    // It inherits `inside` from `f_next`.
    fn make_face(&mut self, e_orig: EdgeId, f_next: FaceId) -> FaceId {
        let f_prev = self.faces[f_next].prev;
        let inside = self.faces[f_next].inside;
        let f = self.faces.alloc(Face {
            next: f_next,
            prev: f_prev,
            an_edge: e_orig,
            inside,
            ..Face::default()
        });
        self.faces[f_prev].next = f;
        self.faces[f_next].prev = f;

        let mut e = e_orig;
        loop {
            self.edge_mut(e).lface = f;
            e = self.lnext(e);
            if e == e_orig {
                break;
            }
        }
        f
    }

    fn kill_edge(&mut self, e_del: EdgeId) {
        let e_del = e_del & !1;
        let e_next = self.edge(e_del).next;
        let e_prev = self.edge(e_del ^ 1).next;
        self.edge_mut(e_next ^ 1).next = e_prev;
        self.edge_mut(e_prev ^ 1).next = e_next;
        self.pairs.free(e_del >> 1);
    }

    // Unlink `v_del`, handing its edges to `new_org` (possibly NIL).
    fn kill_vertex(&mut self, v_del: VertId, new_org: VertId) {
        let e_start = self.verts[v_del].an_edge;
        let mut e = e_start;
        loop {
            self.edge_mut(e).org = new_org;
            e = self.onext(e);
            if e == e_start {
                break;
            }
        }
        let (prev, next) = (self.verts[v_del].prev, self.verts[v_del].next);
        self.verts[next].prev = prev;
        self.verts[prev].next = next;
        self.verts.free(v_del);
    }

    fn kill_face(&mut self, f_del: FaceId, new_lface: FaceId) {
        let e_start = self.faces[f_del].an_edge;
        let mut e = e_start;
        loop {
            self.edge_mut(e).lface = new_lface;
            e = self.lnext(e);
            if e == e_start {
                break;
            }
        }
        let (prev, next) = (self.faces[f_del].prev, self.faces[f_del].next);
        self.faces[next].prev = prev;
        self.faces[prev].next = next;
        self.faces.free(f_del);
    }

    // Exchange a.Onext and b.Onext, fixing the two Lnext links that point at them.
    fn swap_onext(&mut self, a: EdgeId, b: EdgeId) {
        let a_onext = self.onext(a);
        let b_onext = self.onext(b);
        self.edge_mut(a_onext ^ 1).lnext = b;
        self.edge_mut(b_onext ^ 1).lnext = a;
        self.edge_mut(a).onext = b_onext;
        self.edge_mut(b).onext = a_onext;
    }

    // ── Public primitives ───────────────────────────────────────────────────

    /// Creates an isolated edge: two new vertices and one face on both sides.
    pub fn make_edge(&mut self) -> Result<EdgeId, MeshError> {
        let e = self.make_edge_pair(E_HEAD);
        self.make_vertex(e, V_HEAD);
        self.make_vertex(e ^ 1, V_HEAD);
        self.make_face(e, F_HEAD);
        Ok(e)
    }

    /// Exchanges `e_org.Onext` and `e_dst.Onext`.
    ///
    /// Distinct origins are merged (the origin of `e_dst` is destroyed); a shared
    /// origin is split and `e_dst` gets a new vertex. Independently, distinct
    /// left faces are merged (the left face of `e_dst` is destroyed) and a
    /// shared left face is split with `e_dst` getting the new one.
    pub fn splice(&mut self, e_org: EdgeId, e_dst: EdgeId) -> Result<(), MeshError> {
        self.live_edge(e_org)?;
        self.live_edge(e_dst)?;
        if e_org == e_dst {
            return Ok(());
        }

        let org = self.org(e_org);
        let lface = self.lface(e_org);
        let joining_vertices = self.org(e_dst) != org;
        let joining_loops = self.lface(e_dst) != lface;

        if joining_vertices {
            self.kill_vertex(self.org(e_dst), org);
        }
        if joining_loops {
            self.kill_face(self.lface(e_dst), lface);
        }

        self.swap_onext(e_dst, e_org);

        if !joining_vertices {
            self.make_vertex(e_dst, org);
            self.verts[org].an_edge = e_org;
        }
        if !joining_loops {
            self.make_face(e_dst, lface);
            self.faces[lface].an_edge = e_org;
        }
        Ok(())
    }

    /// Removes the edge `e_del`.
    ///
    /// Faces on its two sides are joined, or a face is split if both sides were
    /// the same loop. Endpoints left without edges are destroyed, and so is the
    /// face when the last edge of an isolated loop goes away.
    pub fn delete_edge(&mut self, e_del: EdgeId) -> Result<(), MeshError> {
        self.live_edge(e_del)?;
        let e_del_sym = e_del ^ 1;

        let joining_loops = self.lface(e_del) != self.rface(e_del);
        if joining_loops {
            self.kill_face(self.lface(e_del), self.rface(e_del));
        }

        if self.onext(e_del) == e_del {
            self.kill_vertex(self.org(e_del), NIL);
        } else {
            let rface = self.rface(e_del);
            self.faces[rface].an_edge = self.oprev(e_del);
            let org = self.org(e_del);
            self.verts[org].an_edge = self.onext(e_del);

            self.swap_onext(e_del, self.oprev(e_del));
            if !joining_loops {
                self.make_face(e_del, self.lface(e_del));
            }
        }

        // e_del is now isolated at its origin; the same treatment for the mate
        // finishes the removal.
        if self.onext(e_del_sym) == e_del_sym {
            self.kill_vertex(self.org(e_del_sym), NIL);
            self.kill_face(self.lface(e_del_sym), NIL);
        } else {
            let lface = self.lface(e_del);
            self.faces[lface].an_edge = self.oprev(e_del_sym);
            let org = self.org(e_del_sym);
            self.verts[org].an_edge = self.onext(e_del_sym);
            self.swap_onext(e_del_sym, self.oprev(e_del_sym));
        }

        self.kill_edge(e_del);
        Ok(())
    }

    /// Adds a new edge `e_new = e_org.Lnext` whose destination is a new vertex.
    /// Both sides of `e_new` lie in the left face of `e_org`.
    pub fn add_edge_vertex(&mut self, e_org: EdgeId) -> Result<EdgeId, MeshError> {
        self.live_edge(e_org)?;
        let e_new = self.make_edge_pair(e_org);
        let e_new_sym = e_new ^ 1;

        self.swap_onext(e_new, self.lnext(e_org));

        let org = self.dst(e_org);
        self.edge_mut(e_new).org = org;
        self.make_vertex(e_new_sym, org);

        let lface = self.lface(e_org);
        self.edge_mut(e_new).lface = lface;
        self.edge_mut(e_new_sym).lface = lface;
        Ok(e_new)
    }

    /// Splits `e_org` in two at a new vertex; returns the second half, which is
    /// `e_org.Lnext`. The new half keeps the winding and right face of `e_org`.
    pub fn split_edge(&mut self, e_org: EdgeId) -> Result<EdgeId, MeshError> {
        let e_new = self.add_edge_vertex(e_org)? ^ 1;
        let e_org_sym = e_org ^ 1;

        // Move e_org's destination onto the new vertex.
        self.swap_onext(e_org_sym, self.oprev(e_org_sym));
        self.swap_onext(e_org_sym, e_new);

        let mid = self.org(e_new);
        self.edge_mut(e_org_sym).org = mid;
        let far = self.dst(e_new);
        self.verts[far].an_edge = e_new ^ 1;

        let rface = self.rface(e_org);
        self.edge_mut(e_new ^ 1).lface = rface;
        self.edge_mut(e_new).winding = self.edge(e_org).winding;
        self.edge_mut(e_new ^ 1).winding = self.edge(e_org_sym).winding;
        Ok(e_new)
    }

    /// Adds an edge from `e_org.Dst` to `e_dst.Org` and returns it.
    ///
    /// If the two edges bound the same face, that face is split and the new
    /// face lies to the left of the returned edge. Otherwise the two loops are
    /// joined and the left face of `e_dst` is destroyed.
    pub fn connect(&mut self, e_org: EdgeId, e_dst: EdgeId) -> Result<EdgeId, MeshError> {
        self.live_edge(e_org)?;
        self.live_edge(e_dst)?;
        let e_new = self.make_edge_pair(e_org);
        let e_new_sym = e_new ^ 1;

        let lface = self.lface(e_org);
        let joining_loops = self.lface(e_dst) != lface;
        if joining_loops {
            self.kill_face(self.lface(e_dst), lface);
        }

        self.swap_onext(e_new, self.lnext(e_org));
        self.swap_onext(e_new_sym, e_dst);

        let new_org = self.dst(e_org);
        let new_dst = self.org(e_dst);
        self.edge_mut(e_new).org = new_org;
        self.edge_mut(e_new_sym).org = new_dst;
        self.edge_mut(e_new).lface = lface;
        self.edge_mut(e_new_sym).lface = lface;
        self.faces[lface].an_edge = e_new_sym;

        if !joining_loops {
            self.make_face(e_new, lface);
        }
        Ok(e_new)
    }

    /// Destroys face `f_zap`. Its edges get a NIL left face; edges with NIL on
    /// both sides are removed along with any vertex they leave isolated.
    pub fn zap_face(&mut self, f_zap: FaceId) -> Result<(), MeshError> {
        if !self.is_live_face(f_zap) {
            return Err(MeshError::DeadFace(f_zap));
        }
        let e_start = self.faces[f_zap].an_edge;
        let mut e_next = self.lnext(e_start);
        loop {
            let e = e_next;
            e_next = self.lnext(e);

            self.edge_mut(e).lface = NIL;
            if self.rface(e) == NIL {
                for half in [e, e ^ 1] {
                    if self.onext(half) == half {
                        self.kill_vertex(self.org(half), NIL);
                    } else {
                        let org = self.org(half);
                        self.verts[org].an_edge = self.onext(half);
                        self.swap_onext(half, self.oprev(half));
                    }
                }
                self.kill_edge(e);
            }
            if e == e_start {
                break;
            }
        }

        let (prev, next) = (self.faces[f_zap].prev, self.faces[f_zap].next);
        self.faces[next].prev = prev;
        self.faces[prev].next = next;
        self.faces.free(f_zap);
        Ok(())
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}
