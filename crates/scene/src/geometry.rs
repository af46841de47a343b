//! Procedural geometry: icosahedron spheres, box line grids and the
//! primitive meshes used by controller attachments.

use glam::{Vec2, Vec3};
use std::f32::consts::TAU;

/// Indexed triangle mesh in model space. Triangles wind counter-clockwise
/// when seen from their front side.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Per-vertex unit normals, parallel to `positions`.
    pub normals: Vec<Vec3>,
    /// Triangle list indices into `positions`.
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate triangles as vertex triples.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [
                self.positions[tri[0] as usize],
                self.positions[tri[1] as usize],
                self.positions[tri[2] as usize],
            ]
        })
    }

    /// Radius of the smallest origin-centred sphere containing every vertex.
    pub fn bounding_radius(&self) -> f32 {
        self.positions
            .iter()
            .map(|p| p.length())
            .fold(0.0, f32::max)
    }

    fn push_triangle(&mut self, corners: [Vec3; 3], normals: [Vec3; 3]) {
        let base = self.positions.len() as u32;
        self.positions.extend(corners);
        self.normals.extend(normals);
        self.indices.extend([base, base + 1, base + 2]);
    }

    fn empty() -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }
}

/// Unindexed line segments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineData {
    /// Segment endpoints.
    pub segments: Vec<[Vec3; 2]>,
}

impl LineData {
    /// Copy with every point moved by `offset`.
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            segments: self
                .segments
                .iter()
                .map(|[a, b]| [*a + offset, *b + offset])
                .collect(),
        }
    }
}

const ICOSAHEDRON_VERTICES: [[f32; 3]; 12] = {
    // Golden ratio; written out because `sqrt` is not const.
    const T: f32 = 1.618_034;
    [
        [-1.0, T, 0.0],
        [1.0, T, 0.0],
        [-1.0, -T, 0.0],
        [1.0, -T, 0.0],
        [0.0, -1.0, T],
        [0.0, 1.0, T],
        [0.0, -1.0, -T],
        [0.0, 1.0, -T],
        [T, 0.0, -1.0],
        [T, 0.0, 1.0],
        [-T, 0.0, -1.0],
        [-T, 0.0, 1.0],
    ]
};

const ICOSAHEDRON_FACES: [[usize; 3]; 20] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

/// Sphere approximation built by subdividing each icosahedron face into
/// `(detail + 1)^2` triangles and projecting every vertex onto the sphere.
///
/// The result is flat-indexed (three vertices per triangle) with smooth
/// normals equal to the normalized positions.
pub fn icosahedron(radius: f32, detail: u32) -> MeshData {
    let mut mesh = MeshData::empty();
    let cols = detail as usize + 1;

    for face in ICOSAHEDRON_FACES {
        let [a, b, c] = face.map(|i| Vec3::from_array(ICOSAHEDRON_VERTICES[i]));

        // grid[i][j]: row i walks from edge ab towards c, column j across the row.
        let mut grid: Vec<Vec<Vec3>> = Vec::with_capacity(cols + 1);
        for i in 0..=cols {
            let t = i as f32 / cols as f32;
            let row_start = a.lerp(c, t);
            let row_end = b.lerp(c, t);
            let rows = cols - i;
            let row = (0..=rows)
                .map(|j| {
                    if rows == 0 {
                        row_start
                    } else {
                        row_start.lerp(row_end, j as f32 / rows as f32)
                    }
                })
                .collect();
            grid.push(row);
        }

        for i in 0..cols {
            for j in 0..(2 * (cols - i) - 1) {
                let k = j / 2;
                let corners = if j % 2 == 0 {
                    [grid[i][k + 1], grid[i + 1][k], grid[i][k]]
                } else {
                    [grid[i][k + 1], grid[i + 1][k + 1], grid[i + 1][k]]
                };
                let normals = corners.map(Vec3::normalize);
                mesh.push_triangle(normals.map(|n| n * radius), normals);
            }
        }
    }

    mesh
}

/// Wireframe box centred on the origin with a grid of lines on each face.
///
/// Produces `4 * (width_segments + height_segments + depth_segments + 3)`
/// segments: one loop of four around the box per slice, slices taken at every
/// segment boundary along each axis (both ends included).
pub fn box_line_grid(size: Vec3, segments: [u32; 3]) -> LineData {
    let half = size * 0.5;
    let [ws, hs, ds] = segments.map(|s| s.max(1));
    let mut lines = LineData::default();

    for i in 0..=ws {
        let x = -half.x + size.x * i as f32 / ws as f32;
        push_loop(
            &mut lines,
            [
                Vec3::new(x, -half.y, -half.z),
                Vec3::new(x, half.y, -half.z),
                Vec3::new(x, half.y, half.z),
                Vec3::new(x, -half.y, half.z),
            ],
        );
    }
    for i in 0..=hs {
        let y = -half.y + size.y * i as f32 / hs as f32;
        push_loop(
            &mut lines,
            [
                Vec3::new(-half.x, y, -half.z),
                Vec3::new(half.x, y, -half.z),
                Vec3::new(half.x, y, half.z),
                Vec3::new(-half.x, y, half.z),
            ],
        );
    }
    for i in 0..=ds {
        let z = -half.z + size.z * i as f32 / ds as f32;
        push_loop(
            &mut lines,
            [
                Vec3::new(-half.x, -half.y, z),
                Vec3::new(-half.x, half.y, z),
                Vec3::new(half.x, half.y, z),
                Vec3::new(half.x, -half.y, z),
            ],
        );
    }

    lines
}

fn push_loop(lines: &mut LineData, corners: [Vec3; 4]) {
    for i in 0..4 {
        lines.segments.push([corners[i], corners[(i + 1) % 4]]);
    }
}

/// Flat annulus in the XY plane facing +Z.
pub fn ring(inner_radius: f32, outer_radius: f32, theta_segments: u32) -> MeshData {
    let segments = theta_segments.max(3);
    let mut mesh = MeshData::empty();
    let point = |radius: f32, theta: f32| {
        let dir = Vec2::from_angle(theta);
        Vec3::new(dir.x * radius, dir.y * radius, 0.0)
    };

    for s in 0..segments {
        let t0 = TAU * s as f32 / segments as f32;
        let t1 = TAU * (s + 1) as f32 / segments as f32;
        let (i0, o0, i1, o1) = (
            point(inner_radius, t0),
            point(outer_radius, t0),
            point(inner_radius, t1),
            point(outer_radius, t1),
        );
        mesh.push_triangle([i0, o0, o1], [Vec3::Z; 3]);
        mesh.push_triangle([i0, o1, i1], [Vec3::Z; 3]);
    }

    mesh
}

/// Unit cube centred on the origin (edge length 1).
pub fn unit_cube() -> MeshData {
    let mut mesh = MeshData::empty();
    for normal in [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z] {
        let (u, v) = normal.any_orthonormal_pair();
        let center = normal * 0.5;
        let corner = |su: f32, sv: f32| center + (u * su + v * sv) * 0.5;
        let quad = [
            corner(-1.0, -1.0),
            corner(1.0, -1.0),
            corner(1.0, 1.0),
            corner(-1.0, 1.0),
        ];
        push_quad(&mut mesh, quad, normal);
    }
    mesh
}

/// Closed cylinder of radius 1 and length 1 centred on the origin, with its
/// axis along Z.
pub fn unit_cylinder(radial_segments: u32) -> MeshData {
    let segments = radial_segments.max(3);
    let mut mesh = MeshData::empty();
    let rim = |theta: f32| {
        let dir = Vec2::from_angle(theta);
        Vec3::new(dir.x, dir.y, 0.0)
    };

    for s in 0..segments {
        let d0 = rim(TAU * s as f32 / segments as f32);
        let d1 = rim(TAU * (s + 1) as f32 / segments as f32);
        let (b0, b1) = (d0 - Vec3::Z * 0.5, d1 - Vec3::Z * 0.5);
        let (f0, f1) = (d0 + Vec3::Z * 0.5, d1 + Vec3::Z * 0.5);

        mesh.push_triangle([b0, b1, f1], [d0, d1, d1]);
        mesh.push_triangle([b0, f1, f0], [d0, d1, d0]);
        mesh.push_triangle([Vec3::Z * 0.5, f0, f1], [Vec3::Z; 3]);
        mesh.push_triangle([Vec3::NEG_Z * 0.5, b1, b0], [Vec3::NEG_Z; 3]);
    }

    mesh
}

fn push_quad(mesh: &mut MeshData, quad: [Vec3; 4], normal: Vec3) {
    // Corners may arrive in either orientation; flip to face `normal`.
    let facing = (quad[1] - quad[0]).cross(quad[2] - quad[0]).dot(normal) >= 0.0;
    let [a, b, c, d] = if facing {
        quad
    } else {
        [quad[0], quad[3], quad[2], quad[1]]
    };
    mesh.push_triangle([a, b, c], [normal; 3]);
    mesh.push_triangle([a, c, d], [normal; 3]);
}
