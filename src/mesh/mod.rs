//! Half-edge triangle mesh data structures.
//!
//! The central type is [`TriMesh`], a half-edge (doubly connected edge list)
//! representation of a triangle mesh, generic over the handle index width
//! via [`MeshIndex`]. Meshes are built from face-vertex soup with
//! [`build_from_triangles`] and converted back with [`to_face_vertex`].
//!
//! Connectivity edits live next to the structure they edit; see
//! [`TriMesh::rotate_edge`] for the diagonal flip used by the beautify
//! optimizer.

mod builder;
mod halfedge;
mod handles;
mod rotate;

pub use builder::{build_from_triangles, to_face_vertex};
pub use halfedge::{Face, HalfEdge, TriMesh, Vertex, VertexHalfEdgeIter};
pub use handles::{FaceId, HalfEdgeId, MeshIndex, VertexId};
