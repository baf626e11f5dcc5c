//! # Burnish
//!
//! Triangle mesh beautification by local edge rotation.
//!
//! Burnish takes a triangulated mesh (typically the skinny output of a
//! polygon fill or ear-clipping pass) and rotates edges, one quad at a
//! time, until a quality metric stops improving. The mesh lives in a
//! half-edge data structure with type-safe, width-configurable indices.
//!
//! ## Features
//!
//! - **Half-edge data structure**: O(1) adjacency queries with type-safe indices
//! - **Flexible indexing**: Support for 16-bit, 32-bit, and 64-bit indices
//! - **In-place edge rotation**: topology-checked diagonal flips with stable edge handles
//! - **Two quality metrics**: projected area/perimeter ratio and dihedral angle
//!
//! ## Quick Start
//!
//! ```
//! use burnish::prelude::*;
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
//! let mut mesh: TriMesh = build_from_triangles(&vertices, &faces).unwrap();
//!
//! // Offer every interior edge for rotation.
//! let mut edges: Vec<_> = mesh
//!     .halfedge_ids()
//!     .filter(|&he| mesh.canonical_halfedge(he) == he && mesh.is_manifold_edge(he))
//!     .collect();
//!
//! let flips = beautify_fill(&mut mesh, &mut edges, &BeautifyOptions::default());
//! assert_eq!(flips, 1);
//! assert!(mesh.is_valid());
//! ```
//!
//! ## Mesh Traversal
//!
//! The half-edge structure enables efficient traversal of mesh elements:
//!
//! ```
//! use burnish::prelude::*;
//! use nalgebra::Point3;
//!
//! # let vertices = vec![
//! #     Point3::new(0.0, 0.0, 0.0),
//! #     Point3::new(1.0, 0.0, 0.0),
//! #     Point3::new(0.5, 1.0, 0.0),
//! # ];
//! # let faces = vec![[0, 1, 2]];
//! # let mesh: TriMesh = build_from_triangles(&vertices, &faces).unwrap();
//! // Iterate over neighbors of a vertex
//! let v = VertexId::new(0);
//! for neighbor in mesh.vertex_neighbors(v) {
//!     println!("Neighbor: {:?}", neighbor);
//! }
//!
//! // Get vertices of a face
//! let f = FaceId::new(0);
//! let [v0, v1, v2] = mesh.face_triangle(f);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use burnish::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::beautify::{
        beautify_fill, beautify_fill_with_progress, BeautifyOptions, QualityMetric,
    };
    pub use crate::algo::progress::Progress;
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        build_from_triangles, to_face_vertex, Face, FaceId, HalfEdge, HalfEdgeId, MeshIndex,
        TriMesh, Vertex, VertexId,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use nalgebra::Point3;

    #[test]
    fn test_parallelogram_cleanup() {
        // A sheared parallelogram split along its long diagonal (0, 2);
        // beautify moves the split to the short diagonal (1, 3).
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.45, 1.0, 0.0),
            Point3::new(0.45, 1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [0, 2, 3]];
        let mut mesh: TriMesh = build_from_triangles(&vertices, &faces).unwrap();

        let mut edges: Vec<_> = mesh
            .halfedge_ids()
            .filter(|&he| mesh.canonical_halfedge(he) == he && mesh.is_manifold_edge(he))
            .collect();
        assert_eq!(edges.len(), 1);

        let flips = beautify_fill(&mut mesh, &mut edges, &BeautifyOptions::default());

        assert_eq!(flips, 1);
        assert!(mesh.is_valid());
        let endpoints = [mesh.origin(edges[0]), mesh.dest(edges[0])];
        assert!(endpoints.contains(&VertexId::new(1)));
        assert!(endpoints.contains(&VertexId::new(3)));
    }
}
