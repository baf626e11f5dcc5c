//! Rotation-state bookkeeping.
//!
//! Greedy edge rotation can cycle: a later rotation may recreate a
//! configuration an earlier rotation moved away from, and floating-point
//! score ties would then flip the same edge forever. Each candidate edge
//! therefore remembers the configurations it has already been in, as a
//! [`RotationState`] signature of the surrounding quad, and a rotation whose
//! outcome matches a remembered state is never re-queued.

use std::collections::HashSet;

use crate::mesh::{HalfEdgeId, MeshIndex, TriMesh};

/// Signature of an edge's position inside its rotation quad.
///
/// Both vertex pairs are sorted, so the signature is independent of which
/// half-edge of the edge is used to read the quad.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct RotationState {
    /// The edge's own endpoints.
    edge: [usize; 2],
    /// The apex vertices of the two incident triangles.
    apexes: [usize; 2],
}

fn sorted(a: usize, b: usize) -> [usize; 2] {
    if a <= b {
        [a, b]
    } else {
        [b, a]
    }
}

impl RotationState {
    /// The state the edge is in right now.
    pub fn current<I: MeshIndex>(mesh: &TriMesh<I>, he: HalfEdgeId<I>) -> Self {
        let [v1, v2, v3, v4] = mesh.rotate_quad(he);
        Self {
            edge: sorted(v2.index(), v4.index()),
            apexes: sorted(v1.index(), v3.index()),
        }
    }

    /// The state the edge would be in after one rotation: endpoints and
    /// apexes swap roles.
    pub fn alternate<I: MeshIndex>(mesh: &TriMesh<I>, he: HalfEdgeId<I>) -> Self {
        let [v1, v2, v3, v4] = mesh.rotate_quad(he);
        Self {
            edge: sorted(v1.index(), v3.index()),
            apexes: sorted(v2.index(), v4.index()),
        }
    }
}

/// Per-candidate-edge sets of visited rotation states.
///
/// Slots are allocated lazily; most edges never rotate, and an edge that
/// never rotates needs no set at all.
pub struct StateTracker {
    slots: Vec<Option<HashSet<RotationState>>>,
}

impl StateTracker {
    /// Create a tracker for `num_edges` candidate slots.
    pub fn new(num_edges: usize) -> Self {
        let mut slots = Vec::new();
        slots.resize_with(num_edges, || None);
        Self { slots }
    }

    /// Check whether `state` was already visited by the edge in `slot`.
    pub fn seen(&self, slot: usize, state: &RotationState) -> bool {
        match &self.slots[slot] {
            Some(set) => set.contains(state),
            None => false,
        }
    }

    /// Record `state` as visited by the edge in `slot`.
    pub fn record(&mut self, slot: usize, state: RotationState) {
        let set = self.slots[slot].get_or_insert_with(HashSet::new);
        let inserted = set.insert(state);
        debug_assert!(inserted, "rotation state recorded twice");
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::Point3;

    use super::*;
    use crate::mesh::{build_from_triangles, VertexId};

    fn quad_mesh() -> TriMesh<u32> {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
            Point3::new(2.0, 2.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [1, 3, 2]];
        build_from_triangles(&vertices, &faces).unwrap()
    }

    #[test]
    fn test_state_is_orientation_independent() {
        let mesh = quad_mesh();
        let he = mesh
            .edge_between(VertexId::new(1), VertexId::new(2))
            .unwrap();
        assert_eq!(
            RotationState::current(&mesh, he),
            RotationState::current(&mesh, mesh.twin(he))
        );
        assert_eq!(
            RotationState::alternate(&mesh, he),
            RotationState::alternate(&mesh, mesh.twin(he))
        );
    }

    #[test]
    fn test_alternate_matches_state_after_rotation() {
        let mut mesh = quad_mesh();
        let he = mesh
            .edge_between(VertexId::new(1), VertexId::new(2))
            .unwrap();
        let predicted = RotationState::alternate(&mesh, he);
        let rotated = mesh.rotate_edge(he).unwrap();
        assert_eq!(RotationState::current(&mesh, rotated), predicted);
    }

    #[test]
    fn test_tracker_seen_and_record() {
        let mesh = quad_mesh();
        let he = mesh
            .edge_between(VertexId::new(1), VertexId::new(2))
            .unwrap();
        let state = RotationState::current(&mesh, he);

        let mut tracker = StateTracker::new(4);
        assert!(!tracker.seen(2, &state));
        tracker.record(2, state);
        assert!(tracker.seen(2, &state));
        // Other slots are unaffected.
        assert!(!tracker.seen(3, &state));
    }
}
