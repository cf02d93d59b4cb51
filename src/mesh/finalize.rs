// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Post-sweep operations on the finished subdivision: triangulating monotone
// faces, pruning exterior faces, rewriting windings for boundary output and
// greedily merging triangles into larger convex polygons.

use super::{EdgeId, FaceId, Mesh, E_HEAD, F_HEAD, NIL};
use crate::error::MeshError;
use crate::geom::{edge_sign, vert_ccw, vert_leq};

impl Mesh {
    /// Number of edges (and so vertices) on the loop of face `f`.
    pub fn count_face_verts(&self, f: FaceId) -> usize {
        self.face_loop(self.faces[f].an_edge).count()
    }

    /// Triangulates a face that is monotone with respect to the sweep direction.
    ///
    /// The loop is split at its rightmost and leftmost vertices into an upper
    /// and a lower chain. Triangles are fanned from whichever chain advanced
    /// last as long as the remaining boundary stays convex there; the leftover
    /// fan is closed from the leftmost vertex at the end. Faces created here
    /// inherit `inside` from `face` and are linked before it.
    pub fn tessellate_mono_region(&mut self, face: FaceId) -> Result<(), MeshError> {
        if !self.is_live_face(face) {
            return Err(MeshError::DeadFace(face));
        }
        let mut up = self.faces[face].an_edge;
        if self.lnext(up) == up || self.lnext(self.lnext(up)) == up {
            return Err(MeshError::Invariant(format!(
                "face {face} has fewer than three edges"
            )));
        }

        // Walk until up.Org is the rightmost vertex; lo then ends there too.
        while vert_leq(self.dst_pos(up), self.org_pos(up)) {
            up = self.lprev(up);
        }
        while vert_leq(self.org_pos(up), self.dst_pos(up)) {
            up = self.lnext(up);
        }
        let mut lo = self.lprev(up);

        while self.lnext(up) != lo {
            if vert_leq(self.dst_pos(up), self.org_pos(lo)) {
                // up.Dst is further left; fan from lo.Org along the lower chain.
                while self.lnext(lo) != up
                    && (self.edge_goes_left(self.lnext(lo))
                        || edge_sign(
                            self.org_pos(lo),
                            self.dst_pos(lo),
                            self.dst_pos(self.lnext(lo)),
                        ) <= 0.0)
                {
                    let diag = self.connect(self.lnext(lo), lo)?;
                    lo = diag ^ 1;
                }
                lo = self.lprev(lo);
            } else {
                // lo.Org is further left; fan from up.Dst along the upper chain.
                while self.lnext(lo) != up
                    && (self.edge_goes_right(self.lprev(up))
                        || edge_sign(
                            self.dst_pos(up),
                            self.org_pos(up),
                            self.org_pos(self.lprev(up)),
                        ) >= 0.0)
                {
                    let diag = self.connect(up, self.lprev(up))?;
                    up = diag ^ 1;
                }
                up = self.lnext(up);
            }
        }

        if self.lnext(lo) == up {
            return Err(MeshError::Invariant(format!(
                "monotone chains of face {face} collapsed"
            )));
        }
        while self.lnext(self.lnext(lo)) != up {
            let diag = self.connect(self.lnext(lo), lo)?;
            lo = diag ^ 1;
        }
        Ok(())
    }

    /// Triangulates every face marked inside.
    pub fn tessellate_interior(&mut self) -> Result<(), MeshError> {
        let mut f = self.faces[F_HEAD].next;
        while f != F_HEAD {
            // New faces are linked before f, so they are never revisited.
            let next = self.faces[f].next;
            if self.faces[f].inside {
                self.tessellate_mono_region(f)?;
            }
            f = next;
        }
        Ok(())
    }

    /// Zaps every face not marked inside.
    pub fn discard_exterior(&mut self) -> Result<(), MeshError> {
        let mut f = self.faces[F_HEAD].next;
        while f != F_HEAD {
            let next = self.faces[f].next;
            if !self.faces[f].inside {
                self.zap_face(f)?;
            }
            f = next;
        }
        Ok(())
    }

    /// Rewrites edge windings for boundary extraction.
    ///
    /// Edges separating an inside face from an outside one get `value` when the
    /// inside is on their left and `-value` otherwise. Every other edge gets
    /// zero, or is deleted when `keep_only_boundary` is set.
    pub fn set_winding_number(
        &mut self,
        value: i32,
        keep_only_boundary: bool,
    ) -> Result<(), MeshError> {
        let inside = |mesh: &Mesh, f: FaceId| f != NIL && mesh.faces[f].inside;

        let mut e = self.edge(E_HEAD).next;
        while e != E_HEAD {
            let e_next = self.edge(e).next;
            let left_in = inside(self, self.lface(e));
            let right_in = inside(self, self.rface(e));
            if left_in != right_in {
                self.edge_mut(e).winding = if left_in { value } else { -value };
            } else if !keep_only_boundary {
                self.edge_mut(e).winding = 0;
            } else {
                self.delete_edge(e)?;
            }
            e = e_next;
        }
        Ok(())
    }

    /// Greedily removes edges between two inside faces when the merged face
    /// has at most `max_verts_per_face` vertices and stays convex at both ends
    /// of the removed edge.
    ///
    /// Edges are visited in edge-list order and each merge changes which later
    /// merges are possible, so two meshes with the same geometry but different
    /// internal ordering can end up with different polygons.
    pub fn merge_convex_faces(&mut self, max_verts_per_face: usize) -> Result<(), MeshError> {
        let mut e = self.edge(E_HEAD).next;
        while e != E_HEAD {
            let mut e_next = self.edge(e).next;
            if self.can_merge_across(e, max_verts_per_face) {
                if e == e_next || e == e_next ^ 1 {
                    e_next = self.edge(e_next).next;
                }
                self.delete_edge(e)?;
            }
            e = e_next;
        }
        Ok(())
    }

    fn can_merge_across(&self, e: EdgeId, max_verts_per_face: usize) -> bool {
        let e_sym = e ^ 1;
        let (lf, rf) = (self.lface(e), self.lface(e_sym));
        if lf == NIL || rf == NIL || !self.faces[lf].inside || !self.faces[rf].inside {
            return false;
        }
        let left_nv = self.count_face_verts(lf);
        let right_nv = self.count_face_verts(rf);
        if left_nv + right_nv - 2 > max_verts_per_face {
            return false;
        }

        let va = self.org_pos(self.lprev(e));
        let vb = self.org_pos(e);
        let vc = self.dst_pos(self.lnext(e_sym));
        let vd = self.org_pos(self.lprev(e_sym));
        let ve = self.org_pos(e_sym);
        let vf = self.dst_pos(self.lnext(e));
        vert_ccw(va, vb, vc) && vert_ccw(vd, ve, vf)
    }
}
