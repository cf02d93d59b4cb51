// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)

use super::{EdgeId, Mesh, E_HEAD, F_HEAD, NIL, V_HEAD};
use crate::error::MeshError;

fn broken(what: &str, at: EdgeId) -> MeshError {
    MeshError::Invariant(format!("{what} (half-edge {at})"))
}

impl Mesh {
    // Local ring relations every live half-edge must satisfy.
    fn check_links(&self, e: EdgeId) -> Result<(), MeshError> {
        if !self.is_live_edge(e) {
            return Err(MeshError::DeadEdge(e));
        }
        if self.lnext(e) == NIL || self.onext(e) == NIL {
            return Err(broken("missing Lnext or Onext", e));
        }
        if self.onext(self.lnext(e)) ^ 1 != e {
            return Err(broken("Lnext.Onext.Sym != e", e));
        }
        if self.lnext(self.onext(e) ^ 1) != e {
            return Err(broken("Onext.Sym.Lnext != e", e));
        }
        Ok(())
    }

    /// Walks the face, vertex and edge lists and verifies every structural
    /// invariant: list back-links, loop closure under Lnext and Onext, mate
    /// symmetry, and that each loop agrees on its face and origin.
    ///
    /// Edges whose left face is NIL are permitted; they appear once exterior
    /// faces have been zapped.
    pub fn check(&self) -> Result<(), MeshError> {
        let mut f_prev = F_HEAD;
        let mut f = self.faces[F_HEAD].next;
        while f != F_HEAD {
            if !self.faces.contains(f) {
                return Err(MeshError::DeadFace(f));
            }
            if self.faces[f].prev != f_prev {
                return Err(MeshError::Invariant(format!("face {f} has a stale prev link")));
            }
            let start = self.faces[f].an_edge;
            let mut e = start;
            loop {
                self.check_links(e)?;
                if self.lface(e) != f {
                    return Err(broken("face loop disagrees on its face", e));
                }
                e = self.lnext(e);
                if e == start {
                    break;
                }
            }
            f_prev = f;
            f = self.faces[f].next;
        }
        if self.faces[F_HEAD].prev != f_prev || self.faces[F_HEAD].an_edge != NIL {
            return Err(MeshError::Invariant("face list head is corrupt".into()));
        }

        let mut v_prev = V_HEAD;
        let mut v = self.verts[V_HEAD].next;
        while v != V_HEAD {
            if !self.verts.contains(v) {
                return Err(MeshError::DeadVertex(v));
            }
            if self.verts[v].prev != v_prev {
                return Err(MeshError::Invariant(format!("vertex {v} has a stale prev link")));
            }
            let start = self.verts[v].an_edge;
            let mut e = start;
            loop {
                self.check_links(e)?;
                if self.org(e) != v {
                    return Err(broken("vertex ring disagrees on its origin", e));
                }
                e = self.onext(e);
                if e == start {
                    break;
                }
            }
            v_prev = v;
            v = self.verts[v].next;
        }
        if self.verts[V_HEAD].prev != v_prev || self.verts[V_HEAD].an_edge != NIL {
            return Err(MeshError::Invariant("vertex list head is corrupt".into()));
        }

        let mut e_prev = E_HEAD;
        let mut e = self.edge(E_HEAD).next;
        while e != E_HEAD {
            if self.edge(e ^ 1).next != e_prev ^ 1 {
                return Err(broken("edge list reverse link is stale", e));
            }
            self.check_links(e)?;
            if self.org(e) == NIL || self.dst(e) == NIL {
                return Err(broken("edge without an endpoint", e));
            }
            if !self.verts.contains(self.org(e)) || !self.verts.contains(self.dst(e)) {
                return Err(broken("edge endpoint was destroyed", e));
            }
            e_prev = e;
            e = self.edge(e).next;
        }
        if self.edge(E_HEAD ^ 1).next != e_prev ^ 1
            || self.edge(E_HEAD).org != NIL
            || self.edge(E_HEAD ^ 1).org != NIL
        {
            return Err(MeshError::Invariant("edge list head is corrupt".into()));
        }
        Ok(())
    }
}
