//! Edge rotation (diagonal flip).
//!
//! Rotating a manifold edge replaces the shared diagonal of its two incident
//! triangles with the other diagonal of their combined quadrilateral:
//!
//! ```text
//!        c                c
//!       / \              /|\
//!      /   \            / | \
//!     a-----b   ->     a  |  b
//!      \   /            \ | /
//!       \ /              \|/
//!        d                d
//! ```
//!
//! The mutation is performed in place and reuses the edge's half-edge pair
//! for the new diagonal, so the `HalfEdgeId` of a rotated edge is stable.

use super::halfedge::TriMesh;
use super::handles::{HalfEdgeId, MeshIndex};

impl<I: MeshIndex> TriMesh<I> {
    /// Rotate the manifold edge containing `he`.
    ///
    /// Refuses, returning `None` without mutating, when the rotation would
    /// corrupt topology:
    /// - the edge is on the boundary (only one incident face),
    /// - the two apex vertices coincide (a fold-back quad),
    /// - the new diagonal already exists as an edge elsewhere in the mesh
    ///   (rotating would create a duplicate edge).
    ///
    /// On success returns the half-edge of the new diagonal (the same
    /// handle as `he`); both incident faces remain triangles, the mesh
    /// remains a valid manifold, and face winding is preserved.
    pub fn rotate_edge(&mut self, he: HalfEdgeId<I>) -> Option<HalfEdgeId<I>> {
        if !self.is_manifold_edge(he) {
            return None;
        }

        let t = self.twin(he);
        let n1 = self.next(he); // b -> c
        let p1 = self.prev(he); // c -> a
        let n2 = self.next(t); // a -> d
        let p2 = self.prev(t); // d -> b

        let a = self.origin(he);
        let b = self.origin(t);
        let c = self.origin(p1);
        let d = self.origin(p2);

        if c == d {
            return None;
        }
        if self.edge_between(c, d).is_some() {
            return None;
        }

        let f1 = self.face_of(he);
        let f2 = self.face_of(t);

        // New triangles: f1 = (d, c, a) via [he, p1, n2], f2 = (c, d, b)
        // via [t, p2, n1]. Winding is preserved.
        {
            let e = self.halfedge_mut(he);
            e.origin = d;
            e.next = p1;
            e.prev = n2;
        }
        {
            let e = self.halfedge_mut(p1);
            e.next = n2;
            e.prev = he;
        }
        {
            let e = self.halfedge_mut(n2);
            e.next = he;
            e.prev = p1;
            e.face = f1;
        }
        {
            let e = self.halfedge_mut(t);
            e.origin = c;
            e.next = p2;
            e.prev = n1;
        }
        {
            let e = self.halfedge_mut(p2);
            e.next = n1;
            e.prev = t;
        }
        {
            let e = self.halfedge_mut(n1);
            e.next = t;
            e.prev = p2;
            e.face = f2;
        }

        self.face_mut(f1).halfedge = he;
        self.face_mut(f2).halfedge = t;

        // `a` and `b` may have pointed at the repurposed half-edges.
        if self.vertex(a).halfedge == he {
            self.vertex_mut(a).halfedge = n2;
        }
        if self.vertex(b).halfedge == t {
            self.vertex_mut(b).halfedge = n1;
        }

        Some(he)
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::Point3;

    use crate::mesh::{build_from_triangles, TriMesh, VertexId};

    fn quad_mesh() -> TriMesh<u32> {
        // Faces (0,1,2) and (1,3,2) sharing edge (1,2).
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
            Point3::new(2.0, 2.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [1, 3, 2]];
        build_from_triangles(&vertices, &faces).unwrap()
    }

    fn face_sets(mesh: &TriMesh<u32>) -> Vec<Vec<usize>> {
        mesh.face_ids()
            .map(|f| {
                let mut vs: Vec<usize> =
                    mesh.face_triangle(f).iter().map(|v| v.index()).collect();
                vs.sort_unstable();
                vs
            })
            .collect()
    }

    #[test]
    fn test_rotate_replaces_diagonal() {
        let mut mesh = quad_mesh();
        let he = mesh
            .edge_between(VertexId::new(1), VertexId::new(2))
            .unwrap();

        let rotated = mesh.rotate_edge(he).expect("rotation should succeed");

        assert!(mesh.is_valid());
        let a = mesh.origin(rotated).index();
        let b = mesh.dest(rotated).index();
        let mut diag = [a, b];
        diag.sort_unstable();
        assert_eq!(diag, [0, 3]);

        let mut sets = face_sets(&mesh);
        sets.sort();
        assert_eq!(sets, vec![vec![0, 1, 3], vec![0, 2, 3]]);

        // The old diagonal is gone, the new one is manifold.
        assert!(mesh
            .edge_between(VertexId::new(1), VertexId::new(2))
            .is_none());
        assert!(mesh.is_manifold_edge(rotated));
    }

    #[test]
    fn test_rotate_preserves_winding() {
        let mut mesh = quad_mesh();
        let he = mesh
            .edge_between(VertexId::new(1), VertexId::new(2))
            .unwrap();
        let normal_before = mesh.face_normal(mesh.face_of(he));

        let rotated = mesh.rotate_edge(he).unwrap();

        for f in [mesh.face_of(rotated), mesh.face_of(mesh.twin(rotated))] {
            assert!((mesh.face_normal(f) - normal_before).norm() < 1e-12);
        }
    }

    #[test]
    fn test_rotate_twice_restores_faces() {
        let mut mesh = quad_mesh();
        let before = {
            let mut s = face_sets(&mesh);
            s.sort();
            s
        };
        let he = mesh
            .edge_between(VertexId::new(1), VertexId::new(2))
            .unwrap();

        let once = mesh.rotate_edge(he).unwrap();
        let _twice = mesh.rotate_edge(once).unwrap();

        let mut after = face_sets(&mesh);
        after.sort();
        assert_eq!(before, after);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_rotate_refuses_boundary_edge() {
        let mut mesh = quad_mesh();
        let rim = mesh
            .edge_between(VertexId::new(0), VertexId::new(1))
            .unwrap();
        assert!(mesh.rotate_edge(rim).is_none());
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_rotate_refuses_duplicate_edge() {
        // On a tetrahedron every rotation would duplicate the opposite edge.
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
        let mut mesh: TriMesh<u32> = build_from_triangles(&vertices, &faces).unwrap();

        for he in mesh.halfedge_ids().collect::<Vec<_>>() {
            assert!(mesh.rotate_edge(he).is_none());
        }
        assert!(mesh.is_valid());
    }
}
