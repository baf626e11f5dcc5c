//! Greedy triangulation improvement by edge rotation ("beautify").
//!
//! Given a set of candidate edges, repeatedly rotates the worst-scoring
//! edge (per the configured [`QualityMetric`]) until no rotation improves
//! the triangulation. Edges are kept in a min-heap ordered by score; after
//! each rotation the four edges around the affected quad are re-scored.
//! Per-edge sets of visited quad configurations prevent score ties from
//! rotating the same edge back and forth forever.
//!
//! # Example
//!
//! ```
//! use burnish::algo::beautify::{beautify_fill, BeautifyOptions};
//! use burnish::mesh::build_from_triangles;
//! use nalgebra::Point3;
//!
//! // A long thin quad split along its long diagonal.
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(4.0, 0.0, 0.0),
//!     Point3::new(2.0, 0.5, 0.0),
//!     Point3::new(2.0, -0.5, 0.0),
//! ];
//! let faces = vec![[0, 1, 2], [1, 0, 3]];
//! let mut mesh = build_from_triangles::<u32>(&vertices, &faces).unwrap();
//!
//! let mut edges: Vec<_> = mesh
//!     .halfedge_ids()
//!     .filter(|&he| mesh.canonical_halfedge(he) == he && mesh.is_manifold_edge(he))
//!     .collect();
//!
//! let flips = beautify_fill(&mut mesh, &mut edges, &BeautifyOptions::default());
//! assert_eq!(flips, 1);
//! ```

mod heap;
pub mod quality;
mod state;

use std::collections::HashMap;

use crate::algo::progress::Progress;
use crate::mesh::{HalfEdgeId, MeshIndex, TriMesh};

use heap::{MinHeap, NodeHandle};
use quality::{rotate_beauty_angle, rotate_beauty_area, NO_IMPROVEMENT};
use state::{RotationState, StateTracker};

/// Which quality rule scores a candidate rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QualityMetric {
    /// Compare summed area/perimeter ratios of the two triangulations,
    /// evaluated in the quad's projection plane. Robust on flat and gently
    /// curved regions.
    #[default]
    Area,

    /// Compare the dihedral angle across the current and the rotated
    /// diagonal. Cheap, but blind on planar meshes where every dihedral
    /// angle is zero.
    Angle,
}

/// Options for [`beautify_fill`].
#[derive(Debug, Clone)]
pub struct BeautifyOptions {
    /// The quality metric to drive rotations.
    pub metric: QualityMetric,

    /// Only rotate edges whose two quad apex vertices have *different*
    /// tags. Used to confine rotations to the rim of a tagged region.
    pub restrict_by_tag: bool,

    /// Keep folded quads (current triangles on opposite sides) from
    /// rotating. Area metric only.
    pub restrict_degenerate: bool,

    /// Set the edge tag on every rotated edge.
    pub tag_rotated_edges: bool,

    /// Set the face tag on both faces of every rotated edge.
    pub tag_rotated_faces: bool,
}

impl Default for BeautifyOptions {
    fn default() -> Self {
        Self {
            metric: QualityMetric::Area,
            restrict_by_tag: false,
            restrict_degenerate: false,
            tag_rotated_edges: false,
            tag_rotated_faces: false,
        }
    }
}

impl BeautifyOptions {
    /// Set the quality metric.
    pub fn with_metric(mut self, metric: QualityMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Set the apex-tag restriction.
    pub fn with_restrict_by_tag(mut self, restrict: bool) -> Self {
        self.restrict_by_tag = restrict;
        self
    }

    /// Set the degenerate-quad lock.
    pub fn with_restrict_degenerate(mut self, restrict: bool) -> Self {
        self.restrict_degenerate = restrict;
        self
    }

    /// Tag rotated edges.
    pub fn with_tag_rotated_edges(mut self, tag: bool) -> Self {
        self.tag_rotated_edges = tag;
        self
    }

    /// Tag the faces of rotated edges.
    pub fn with_tag_rotated_faces(mut self, tag: bool) -> Self {
        self.tag_rotated_faces = tag;
        self
    }
}

/// Score a candidate rotation; negative means rotating improves the mesh.
fn rotate_score<I: MeshIndex>(
    mesh: &TriMesh<I>,
    he: HalfEdgeId<I>,
    options: &BeautifyOptions,
) -> f64 {
    let [v1, v2, v3, v4] = mesh.rotate_quad(he);

    if options.restrict_by_tag && mesh.vertex_tag(v1) == mesh.vertex_tag(v3) {
        return NO_IMPROVEMENT;
    }
    // Both faces share the same apex: a closed two-triangle "pillow".
    if v1 == v3 {
        return NO_IMPROVEMENT;
    }

    let p1 = mesh.position(v1);
    let p2 = mesh.position(v2);
    let p3 = mesh.position(v3);
    let p4 = mesh.position(v4);
    match options.metric {
        QualityMetric::Area => {
            rotate_beauty_area(p1, p2, p3, p4, options.restrict_degenerate)
        }
        QualityMetric::Angle => rotate_beauty_angle(p1, p2, p3, p4),
    }
}

/// Rotate candidate edges until no rotation improves the mesh.
///
/// `edges` names the candidate edges by one half-edge each; entries are
/// updated in place so they still name the same (possibly rotated) edges
/// when the call returns. Returns the number of rotations performed.
///
/// Rotations that would corrupt topology (see
/// [`TriMesh::rotate_edge`](crate::mesh::TriMesh::rotate_edge)) are
/// skipped silently.
///
/// # Panics
/// Panics if a candidate edge is not an interior manifold edge.
pub fn beautify_fill<I: MeshIndex>(
    mesh: &mut TriMesh<I>,
    edges: &mut [HalfEdgeId<I>],
    options: &BeautifyOptions,
) -> usize {
    beautify_fill_impl(mesh, edges, options, None)
}

/// Like [`beautify_fill`], reporting each rotation to `progress`.
pub fn beautify_fill_with_progress<I: MeshIndex>(
    mesh: &mut TriMesh<I>,
    edges: &mut [HalfEdgeId<I>],
    options: &BeautifyOptions,
    progress: &Progress,
) -> usize {
    beautify_fill_impl(mesh, edges, options, Some(progress))
}

fn beautify_fill_impl<I: MeshIndex>(
    mesh: &mut TriMesh<I>,
    edges: &mut [HalfEdgeId<I>],
    options: &BeautifyOptions,
    progress: Option<&Progress>,
) -> usize {
    let mut heap = MinHeap::with_capacity(edges.len());
    let mut handles: Vec<Option<NodeHandle>> = vec![None; edges.len()];
    let mut tracker = StateTracker::new(edges.len());
    // Candidate slot by stable edge identity. Rotation reuses an edge's
    // half-edge pair, so the canonical half-edge survives rotations.
    let mut slot_of: HashMap<HalfEdgeId<I>, usize> = HashMap::with_capacity(edges.len());

    for (slot, &he) in edges.iter().enumerate() {
        assert!(
            mesh.is_manifold_edge(he),
            "beautify candidates must be interior manifold edges"
        );
        let prev = slot_of.insert(mesh.canonical_halfedge(he), slot);
        debug_assert!(prev.is_none(), "duplicate candidate edge");

        let score = rotate_score(mesh, he, options);
        if score < 0.0 {
            handles[slot] = Some(heap.insert(score, he));
        }
    }

    let seeded = heap.len();
    let mut flips = 0;

    while let Some((_, he)) = heap.pop_min() {
        let slot = slot_of[&mesh.canonical_halfedge(he)];
        handles[slot] = None;

        // A refused rotation (duplicate edge) drops out of the queue; its
        // neighbors may still re-queue it later.
        let Some(rotated) = mesh.rotate_edge(he) else {
            continue;
        };

        // Remember the state we rotated into so a later re-queue cannot
        // rotate back into it.
        tracker.record(slot, RotationState::current(mesh, rotated));
        edges[slot] = rotated;
        flips += 1;

        if options.tag_rotated_edges {
            mesh.set_edge_tag(rotated, true);
        }
        if options.tag_rotated_faces {
            let f_a = mesh.face_of(rotated);
            let f_b = mesh.face_of(mesh.twin(rotated));
            mesh.set_face_tag(f_a, true);
            mesh.set_face_tag(f_b, true);
        }

        for nb in mesh.quad_edges(rotated) {
            update_edge_cost(mesh, nb, options, &mut heap, &mut handles, &tracker, &slot_of);
        }

        if let Some(progress) = progress {
            progress.report(flips.min(seeded), seeded.max(flips), "rotating edges");
        }
    }

    flips
}

/// Re-score one edge after a neighboring rotation changed its quad.
fn update_edge_cost<I: MeshIndex>(
    mesh: &TriMesh<I>,
    he: HalfEdgeId<I>,
    options: &BeautifyOptions,
    heap: &mut MinHeap<HalfEdgeId<I>>,
    handles: &mut [Option<NodeHandle>],
    tracker: &StateTracker,
    slot_of: &HashMap<HalfEdgeId<I>, usize>,
) {
    let Some(&slot) = slot_of.get(&mesh.canonical_halfedge(he)) else {
        return;
    };

    if let Some(handle) = handles[slot].take() {
        heap.remove(handle);
    }

    // Skip states this edge has already been rotated into.
    if tracker.seen(slot, &RotationState::alternate(mesh, he)) {
        return;
    }

    let score = rotate_score(mesh, he, options);
    if score < 0.0 {
        handles[slot] = Some(heap.insert(score, he));
    }
}
