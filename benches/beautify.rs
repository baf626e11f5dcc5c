//! Benchmarks for mesh beautification.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

use burnish::prelude::*;
use nalgebra::Point3;

/// A sheared n x n grid with every cell split along its long diagonal,
/// so most interior diagonals have a profitable rotation.
fn create_sheared_grid(n: usize) -> TriMesh {
    let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
    let mut faces = Vec::with_capacity(n * n * 2);

    for j in 0..=n {
        for i in 0..=n {
            vertices.push(Point3::new(i as f64 + 0.45 * j as f64, j as f64, 0.0));
        }
    }

    for j in 0..n {
        for i in 0..n {
            let v00 = j * (n + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + (n + 1);
            let v11 = v01 + 1;

            faces.push([v00, v10, v11]);
            faces.push([v00, v11, v01]);
        }
    }

    build_from_triangles(&vertices, &faces).unwrap()
}

fn manifold_edges(mesh: &TriMesh) -> Vec<HalfEdgeId> {
    mesh.halfedge_ids()
        .filter(|&he| mesh.canonical_halfedge(he) == he && mesh.is_manifold_edge(he))
        .collect()
}

fn bench_beautify(c: &mut Criterion) {
    for n in [10, 50] {
        let mesh = create_sheared_grid(n);
        let edges = manifold_edges(&mesh);

        c.bench_function(&format!("beautify_area_grid_{n}x{n}"), |b| {
            b.iter_batched(
                || (mesh.clone(), edges.clone()),
                |(mut mesh, mut edges)| {
                    beautify_fill(&mut mesh, &mut edges, &BeautifyOptions::default())
                },
                BatchSize::LargeInput,
            );
        });

        let options = BeautifyOptions::default().with_metric(QualityMetric::Angle);
        c.bench_function(&format!("beautify_angle_grid_{n}x{n}"), |b| {
            b.iter_batched(
                || (mesh.clone(), edges.clone()),
                |(mut mesh, mut edges)| beautify_fill(&mut mesh, &mut edges, &options),
                BatchSize::LargeInput,
            );
        });
    }
}

fn bench_scoring(c: &mut Criterion) {
    let mesh = create_sheared_grid(50);
    let edges = manifold_edges(&mesh);

    c.bench_function("rotate_quad_all_edges", |b| {
        b.iter(|| {
            let mut acc = 0usize;
            for &he in &edges {
                acc += mesh.rotate_quad(he)[0].index();
            }
            acc
        });
    });
}

criterion_group!(benches, bench_beautify, bench_scoring);
criterion_main!(benches);
