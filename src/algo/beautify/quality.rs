//! Edge rotation quality metrics.
//!
//! Both metrics score a manifold edge by comparing the quad's two possible
//! triangulations. The quad vertices follow [`TriMesh::rotate_quad`] roles:
//! `v2-v4` is the current diagonal, `v1-v3` the one a rotation would create.
//! A **negative** score means rotating improves the triangulation; a
//! non-negative score (including [`NO_IMPROVEMENT`]) means leave it alone.
//!
//! [`TriMesh::rotate_quad`]: crate::mesh::TriMesh::rotate_quad

use nalgebra::{Point3, Vector2, Vector3};

/// Sentinel score for edges that must not rotate.
pub const NO_IMPROVEMENT: f64 = f64::INFINITY;

/// Tolerance below which a projected triangle's orientation counts as
/// indeterminate rather than flipped.
const FLIP_SIGN_EPS: f64 = 1e-5;

/// Allow very small triangles to still count as non-zero area.
const ZERO_AREA_EPS: f64 = 1e-12;

/// Angle metric: difference of the dihedral angles across the new and the
/// current diagonal.
///
/// Smaller dihedral deviation is better, so the score is
/// `angle(v1-v3) - angle(v2-v4)`. If either post-rotation triangle would be
/// degenerate the rotation is unusable and [`NO_IMPROVEMENT`] is returned;
/// degenerate *current* triangles contribute a right angle, biasing toward
/// rotating out of the bad state.
pub fn rotate_beauty_angle(
    v1: &Point3<f64>,
    v2: &Point3<f64>,
    v3: &Point3<f64>,
    v4: &Point3<f64>,
) -> f64 {
    let no_a = unit_normal_or_zero(v2, v3, v4);
    let no_b = unit_normal_or_zero(v2, v4, v1);
    let angle_24 = angle_normalized(&no_a, &no_b);

    let no_a = unit_normal_or_zero(v1, v2, v3);
    let no_b = unit_normal_or_zero(v1, v3, v4);
    if no_a == Vector3::zeros() || no_b == Vector3::zeros() {
        return NO_IMPROVEMENT;
    }
    let angle_13 = angle_normalized(&no_a, &no_b);

    angle_13 - angle_24
}

/// Area metric: compare the summed area/perimeter ratios of the two
/// triangulations, evaluated in 2D after projecting the quad along its
/// combined normal.
///
/// `lock_degenerate` keeps a quad whose current triangles fold onto
/// opposite sides from rotating; without it such quads rotate
/// unconditionally on the assumption that any other state is better.
pub fn rotate_beauty_area(
    v1: &Point3<f64>,
    v2: &Point3<f64>,
    v3: &Point3<f64>,
    v4: &Point3<f64>,
    lock_degenerate: bool,
) -> f64 {
    let no_a = cross_tri(v2, v3, v4);
    let no_b = cross_tri(v2, v4, v1);

    let no = no_a + no_b;
    let no_scale = no.norm();
    if no_scale == 0.0 {
        return NO_IMPROVEMENT;
    }
    let normal = no / no_scale;

    let (bu, bv) = plane_basis(&normal);
    let project = |p: &Point3<f64>| Vector2::new(bu.dot(&p.coords), bv.dot(&p.coords));
    let p1 = project(v1);
    let p2 = project(v2);
    let p3 = project(v3);
    let p4 = project(v4);

    // Orientation of the current triangles after projection. Accept
    // (1, 1) / (-1, -1) (the common case) and one indeterminate triangle,
    // which a rotation may repair. Reject (-1, 1): the faces fold onto
    // opposite sides of the projection plane.
    let sign_a = flip_sign(cross2(&p2, &p3, &p4));
    let sign_b = flip_sign(cross2(&p2, &p4, &p1));
    if sign_a == 0 && sign_b == 0 {
        return NO_IMPROVEMENT;
    }
    if sign_a + sign_b == 0 {
        return NO_IMPROVEMENT;
    }

    quad_rotate_calc(&p1, &p2, &p3, &p4, lock_degenerate)
}

/// Core 2D scoring rule shared by the area metric.
fn quad_rotate_calc(
    v1: &Vector2<f64>,
    v2: &Vector2<f64>,
    v3: &Vector2<f64>,
    v4: &Vector2<f64>,
    lock_degenerate: bool,
) -> f64 {
    // Doubled signed areas; fine for comparing ratios.
    let area_2x_234 = cross2(v2, v3, v4);
    let area_2x_241 = cross2(v2, v4, v1);

    let area_2x_123 = cross2(v1, v2, v3);
    let area_2x_134 = cross2(v1, v3, v4);

    // Unusable (1-3) state: the new triangles would point in opposite
    // directions, or one of them would have (near) zero area.
    let folded_13 = if area_2x_123 >= 0.0 {
        area_2x_134 <= 0.0
    } else {
        area_2x_134 >= 0.0
    };
    if folded_13 {
        return NO_IMPROVEMENT;
    }
    if area_2x_123.abs() <= ZERO_AREA_EPS || area_2x_134.abs() <= ZERO_AREA_EPS {
        return NO_IMPROVEMENT;
    }

    // Degenerate (2-4) state: the quad is already folded or squashed.
    // Any other state beats it, so rotate unconditionally unless locked.
    let folded_24 = if area_2x_234 >= 0.0 {
        area_2x_241 <= 0.0
    } else {
        area_2x_241 >= 0.0
    };
    if folded_24 {
        return if lock_degenerate {
            NO_IMPROVEMENT
        } else {
            f64::NEG_INFINITY
        };
    }
    if area_2x_234.abs() <= ZERO_AREA_EPS || area_2x_241.abs() <= ZERO_AREA_EPS {
        return f64::NEG_INFINITY;
    }

    // The quality of a triangle is its area divided by its perimeter;
    // each triangulation scores the sum over its two triangles.
    let len_12 = (v2 - v1).norm();
    let len_23 = (v3 - v2).norm();
    let len_34 = (v4 - v3).norm();
    let len_41 = (v1 - v4).norm();
    let len_13 = (v3 - v1).norm();
    let len_24 = (v4 - v2).norm();

    let fac_24 = area_2x_234.abs() / (len_23 + len_34 + len_24)
        + area_2x_241.abs() / (len_24 + len_41 + len_12);
    let fac_13 = area_2x_123.abs() / (len_12 + len_23 + len_13)
        + area_2x_134.abs() / (len_13 + len_34 + len_41);

    // Negative when the (1-3) triangulation is the better one.
    fac_24 - fac_13
}

/// Unnormalized triangle normal (doubled-area vector).
fn cross_tri(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> Vector3<f64> {
    (b - a).cross(&(c - a))
}

/// Normalized triangle normal, or the zero vector for degenerate triangles.
fn unit_normal_or_zero(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> Vector3<f64> {
    let n = cross_tri(a, b, c);
    let len = n.norm();
    if len > 0.0 {
        n / len
    } else {
        Vector3::zeros()
    }
}

/// Angle between two unit (or zero) vectors.
fn angle_normalized(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    a.dot(b).clamp(-1.0, 1.0).acos()
}

/// Doubled signed area of the 2D triangle `(a, b, c)`.
fn cross2(a: &Vector2<f64>, b: &Vector2<f64>, c: &Vector2<f64>) -> f64 {
    let ab = b - a;
    let ac = c - a;
    ab.x * ac.y - ab.y * ac.x
}

fn flip_sign(area_2x: f64) -> i32 {
    if area_2x > FLIP_SIGN_EPS {
        1
    } else if area_2x < -FLIP_SIGN_EPS {
        -1
    } else {
        0
    }
}

/// Right-handed orthonormal basis for the plane with unit normal `n`,
/// such that `u x v == n` and projected signed areas keep the sign of
/// their 3D orientation relative to `n`.
fn plane_basis(n: &Vector3<f64>) -> (Vector3<f64>, Vector3<f64>) {
    let axis = if n.x.abs() < n.y.abs() && n.x.abs() < n.z.abs() {
        Vector3::x()
    } else if n.y.abs() < n.z.abs() {
        Vector3::y()
    } else {
        Vector3::z()
    };
    let u = n.cross(&axis).normalize();
    let v = n.cross(&u);
    (u, v)
}
