//! Half-edge triangle mesh.
//!
//! Every edge is split into two directed **half-edges**; each half-edge
//! knows its `twin`, the `next`/`prev` half-edges around its face, its
//! `origin` vertex, and its incident `face`. Boundary half-edges carry an
//! invalid face handle and are linked into boundary loops, so `twin` is
//! always valid and fan walks around a vertex never fall off the mesh.
//!
//! Vertices, half-edges, and faces each carry a caller-visible boolean
//! `tag`. Tags have no effect on connectivity; the beautify optimizer reads
//! vertex tags for its selection-boundary restriction and can write edge and
//! face tags to report which elements it rotated.

use nalgebra::{Point3, Vector3};

use super::handles::{FaceId, HalfEdgeId, MeshIndex, VertexId};

/// A vertex: position plus one outgoing half-edge.
#[derive(Debug, Clone)]
pub struct Vertex<I: MeshIndex = u32> {
    /// The 3D position of this vertex.
    pub position: Point3<f64>,

    /// One outgoing half-edge. For boundary vertices this is a boundary
    /// half-edge, which makes fan iteration start at the right place.
    pub halfedge: HalfEdgeId<I>,

    /// Caller-defined marker; no topological meaning.
    pub tag: bool,
}

impl<I: MeshIndex> Vertex<I> {
    /// Create a new vertex at the given position.
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            halfedge: HalfEdgeId::invalid(),
            tag: false,
        }
    }
}

/// A directed half-edge.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge<I: MeshIndex = u32> {
    /// The vertex this half-edge originates from.
    pub origin: VertexId<I>,

    /// The opposite half-edge.
    pub twin: HalfEdgeId<I>,

    /// The next half-edge around the face (counter-clockwise).
    pub next: HalfEdgeId<I>,

    /// The previous half-edge around the face.
    pub prev: HalfEdgeId<I>,

    /// The incident face; invalid for boundary half-edges.
    pub face: FaceId<I>,

    /// Caller-defined marker; no topological meaning.
    pub tag: bool,
}

impl<I: MeshIndex> HalfEdge<I> {
    /// Create a new, unlinked half-edge.
    pub fn new() -> Self {
        Self {
            origin: VertexId::invalid(),
            twin: HalfEdgeId::invalid(),
            next: HalfEdgeId::invalid(),
            prev: HalfEdgeId::invalid(),
            face: FaceId::invalid(),
            tag: false,
        }
    }

    /// Check if this half-edge is on the boundary.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        !self.face.is_valid()
    }
}

impl<I: MeshIndex> Default for HalfEdge<I> {
    fn default() -> Self {
        Self::new()
    }
}

/// A triangular face: one half-edge on its boundary.
#[derive(Debug, Clone, Copy)]
pub struct Face<I: MeshIndex = u32> {
    /// One half-edge of this face.
    pub halfedge: HalfEdgeId<I>,

    /// Caller-defined marker; no topological meaning.
    pub tag: bool,
}

impl<I: MeshIndex> Face<I> {
    /// Create a new face with the given half-edge.
    pub fn new(halfedge: HalfEdgeId<I>) -> Self {
        Self {
            halfedge,
            tag: false,
        }
    }
}

/// A half-edge mesh of triangles.
///
/// All faces are triangles; the builder rejects anything else. Interior
/// edges have exactly two incident faces, boundary edges exactly one.
#[derive(Debug, Clone, Default)]
pub struct TriMesh<I: MeshIndex = u32> {
    pub(crate) vertices: Vec<Vertex<I>>,
    pub(crate) halfedges: Vec<HalfEdge<I>>,
    pub(crate) faces: Vec<Face<I>>,
}

impl<I: MeshIndex> TriMesh<I> {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            halfedges: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    pub fn with_capacity(num_vertices: usize, num_faces: usize) -> Self {
        // 3 half-edges per face plus slack for boundary loops.
        let num_halfedges = num_faces * 3 + num_faces / 2;
        Self {
            vertices: Vec::with_capacity(num_vertices),
            halfedges: Vec::with_capacity(num_halfedges),
            faces: Vec::with_capacity(num_faces),
        }
    }

    // ==================== Accessors ====================

    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of half-edges (including boundary half-edges).
    #[inline]
    pub fn num_halfedges(&self) -> usize {
        self.halfedges.len()
    }

    /// Number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Get a vertex by handle.
    #[inline]
    pub fn vertex(&self, id: VertexId<I>) -> &Vertex<I> {
        &self.vertices[id.index()]
    }

    /// Get a mutable vertex by handle.
    #[inline]
    pub fn vertex_mut(&mut self, id: VertexId<I>) -> &mut Vertex<I> {
        &mut self.vertices[id.index()]
    }

    /// Get a half-edge by handle.
    #[inline]
    pub fn halfedge(&self, id: HalfEdgeId<I>) -> &HalfEdge<I> {
        &self.halfedges[id.index()]
    }

    /// Get a mutable half-edge by handle.
    #[inline]
    pub fn halfedge_mut(&mut self, id: HalfEdgeId<I>) -> &mut HalfEdge<I> {
        &mut self.halfedges[id.index()]
    }

    /// Get a face by handle.
    #[inline]
    pub fn face(&self, id: FaceId<I>) -> &Face<I> {
        &self.faces[id.index()]
    }

    /// Get a mutable face by handle.
    #[inline]
    pub fn face_mut(&mut self, id: FaceId<I>) -> &mut Face<I> {
        &mut self.faces[id.index()]
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point3<f64> {
        &self.vertex(v).position
    }

    /// Set the position of a vertex.
    #[inline]
    pub fn set_position(&mut self, v: VertexId<I>, pos: Point3<f64>) {
        self.vertex_mut(v).position = pos;
    }

    // ==================== Tags ====================

    /// Read the tag of a vertex.
    #[inline]
    pub fn vertex_tag(&self, v: VertexId<I>) -> bool {
        self.vertex(v).tag
    }

    /// Set the tag of a vertex.
    #[inline]
    pub fn set_vertex_tag(&mut self, v: VertexId<I>, tag: bool) {
        self.vertex_mut(v).tag = tag;
    }

    /// Read the tag of the edge containing `he` (true if either half is tagged).
    #[inline]
    pub fn edge_tag(&self, he: HalfEdgeId<I>) -> bool {
        self.halfedge(he).tag || self.halfedge(self.twin(he)).tag
    }

    /// Set the tag on both half-edges of the edge containing `he`.
    pub fn set_edge_tag(&mut self, he: HalfEdgeId<I>, tag: bool) {
        let twin = self.twin(he);
        self.halfedge_mut(he).tag = tag;
        self.halfedge_mut(twin).tag = tag;
    }

    /// Read the tag of a face.
    #[inline]
    pub fn face_tag(&self, f: FaceId<I>) -> bool {
        self.face(f).tag
    }

    /// Set the tag of a face.
    #[inline]
    pub fn set_face_tag(&mut self, f: FaceId<I>, tag: bool) {
        self.face_mut(f).tag = tag;
    }

    // ==================== Topology Queries ====================

    /// Get the twin (opposite) half-edge.
    #[inline]
    pub fn twin(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).twin
    }

    /// Get the next half-edge around the face.
    #[inline]
    pub fn next(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).next
    }

    /// Get the previous half-edge around the face.
    #[inline]
    pub fn prev(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).prev
    }

    /// Get the origin vertex of a half-edge.
    #[inline]
    pub fn origin(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.halfedge(he).origin
    }

    /// Get the destination vertex of a half-edge.
    #[inline]
    pub fn dest(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.origin(self.twin(he))
    }

    /// Get the face of a half-edge.
    #[inline]
    pub fn face_of(&self, he: HalfEdgeId<I>) -> FaceId<I> {
        self.halfedge(he).face
    }

    /// Check if a half-edge is on the boundary (has no face).
    #[inline]
    pub fn is_boundary_halfedge(&self, he: HalfEdgeId<I>) -> bool {
        self.halfedge(he).is_boundary()
    }

    /// Check if the edge containing `he` is on the boundary.
    #[inline]
    pub fn is_boundary_edge(&self, he: HalfEdgeId<I>) -> bool {
        self.is_boundary_halfedge(he) || self.is_boundary_halfedge(self.twin(he))
    }

    /// Check if the edge containing `he` is 2-manifold: exactly two
    /// incident triangular faces, one on each side.
    #[inline]
    pub fn is_manifold_edge(&self, he: HalfEdgeId<I>) -> bool {
        !self.is_boundary_halfedge(he) && !self.is_boundary_halfedge(self.twin(he))
    }

    /// Check if a vertex is on the boundary.
    pub fn is_boundary_vertex(&self, v: VertexId<I>) -> bool {
        let start = self.vertex(v).halfedge;
        if !start.is_valid() {
            return true; // Isolated vertex
        }
        let mut he = start;
        loop {
            if self.is_boundary_halfedge(he) {
                return true;
            }
            he = self.next(self.twin(he));
            if he == start {
                break;
            }
        }
        false
    }

    /// The half-edge of the edge containing `he` with the smaller handle.
    ///
    /// Stable identity for a full edge: unaffected by edge rotation, which
    /// reuses the half-edge pair.
    #[inline]
    pub fn canonical_halfedge(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        let twin = self.twin(he);
        if he.index() <= twin.index() {
            he
        } else {
            twin
        }
    }

    /// Find the half-edge from `a` to `b`, if the edge exists.
    pub fn edge_between(&self, a: VertexId<I>, b: VertexId<I>) -> Option<HalfEdgeId<I>> {
        self.vertex_halfedges(a).find(|&he| self.dest(he) == b)
    }

    /// The four vertices of the rotation quad of a manifold edge.
    ///
    /// Returns `[v1, v2, v3, v4]` where `v2-v4` is the current shared edge
    /// (`v2` is the origin of `he`), `v1` is the apex of the face of `he`,
    /// and `v3` is the apex of the twin's face. Rotating the edge replaces
    /// diagonal `v2-v4` with `v1-v3`.
    pub fn rotate_quad(&self, he: HalfEdgeId<I>) -> [VertexId<I>; 4] {
        debug_assert!(self.is_manifold_edge(he));
        let twin = self.twin(he);
        [
            self.origin(self.prev(he)),
            self.origin(he),
            self.origin(self.prev(twin)),
            self.dest(he),
        ]
    }

    /// The four edges bounding the two faces incident to a manifold edge,
    /// excluding the edge itself.
    pub fn quad_edges(&self, he: HalfEdgeId<I>) -> [HalfEdgeId<I>; 4] {
        debug_assert!(self.is_manifold_edge(he));
        let twin = self.twin(he);
        [
            self.next(he),
            self.prev(he),
            self.next(twin),
            self.prev(twin),
        ]
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex handles.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all half-edge handles.
    pub fn halfedge_ids(&self) -> impl Iterator<Item = HalfEdgeId<I>> + '_ {
        (0..self.halfedges.len()).map(HalfEdgeId::new)
    }

    /// Iterate over all face handles.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        (0..self.faces.len()).map(FaceId::new)
    }

    /// Iterate over the outgoing half-edges of a vertex.
    pub fn vertex_halfedges(&self, v: VertexId<I>) -> VertexHalfEdgeIter<'_, I> {
        VertexHalfEdgeIter::new(self, v)
    }

    /// Iterate over the vertices adjacent to a vertex.
    pub fn vertex_neighbors(&self, v: VertexId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.vertex_halfedges(v).map(|he| self.dest(he))
    }

    /// The valence (degree) of a vertex.
    pub fn valence(&self, v: VertexId<I>) -> usize {
        self.vertex_halfedges(v).count()
    }

    /// The three vertices of a face.
    pub fn face_triangle(&self, f: FaceId<I>) -> [VertexId<I>; 3] {
        let he0 = self.face(f).halfedge;
        let he1 = self.next(he0);
        let he2 = self.next(he1);
        [self.origin(he0), self.origin(he1), self.origin(he2)]
    }

    /// The positions of the three vertices of a face.
    pub fn face_positions(&self, f: FaceId<I>) -> [Point3<f64>; 3] {
        let [v0, v1, v2] = self.face_triangle(f);
        [*self.position(v0), *self.position(v1), *self.position(v2)]
    }

    // ==================== Geometry ====================

    /// The (normalized) normal of a face.
    pub fn face_normal(&self, f: FaceId<I>) -> Vector3<f64> {
        let [p0, p1, p2] = self.face_positions(f);
        (p1 - p0).cross(&(p2 - p0)).normalize()
    }

    /// The area of a face.
    pub fn face_area(&self, f: FaceId<I>) -> f64 {
        let [p0, p1, p2] = self.face_positions(f);
        0.5 * (p1 - p0).cross(&(p2 - p0)).norm()
    }

    /// The length of an edge.
    pub fn edge_length(&self, he: HalfEdgeId<I>) -> f64 {
        (self.position(self.dest(he)) - self.position(self.origin(he))).norm()
    }

    // ==================== Construction ====================

    /// Add a new vertex and return its handle.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexId<I> {
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(Vertex::new(position));
        id
    }

    // ==================== Validation ====================

    /// Check that all connectivity is consistent.
    pub fn is_valid(&self) -> bool {
        for (i, v) in self.vertices.iter().enumerate() {
            if v.halfedge.is_valid() && self.origin(v.halfedge).index() != i {
                return false;
            }
        }

        for (i, he) in self.halfedges.iter().enumerate() {
            let id = HalfEdgeId::<I>::new(i);
            if !he.twin.is_valid() || self.twin(he.twin) != id {
                return false;
            }
            if he.next.is_valid() && self.prev(he.next) != id {
                return false;
            }
            if he.prev.is_valid() && self.next(he.prev) != id {
                return false;
            }
            // Interior half-edges must close a triangle.
            if !he.is_boundary() && self.next(self.next(he.next)) != id {
                return false;
            }
        }

        for f in &self.faces {
            if !f.halfedge.is_valid() {
                return false;
            }
        }

        true
    }
}

/// Iterator over the outgoing half-edges of a vertex.
pub struct VertexHalfEdgeIter<'a, I: MeshIndex = u32> {
    mesh: &'a TriMesh<I>,
    start: HalfEdgeId<I>,
    current: HalfEdgeId<I>,
    done: bool,
}

impl<'a, I: MeshIndex> VertexHalfEdgeIter<'a, I> {
    fn new(mesh: &'a TriMesh<I>, v: VertexId<I>) -> Self {
        let start = mesh.vertex(v).halfedge;
        Self {
            mesh,
            start,
            current: start,
            done: !start.is_valid(),
        }
    }
}

impl<I: MeshIndex> Iterator for VertexHalfEdgeIter<'_, I> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self.current;
        // twin(he) ends at the origin of he; its next is the next outgoing
        // half-edge in the fan.
        self.current = self.mesh.next(self.mesh.twin(self.current));
        if self.current == self.start {
            self.done = true;
        }
        Some(result)
    }
}
