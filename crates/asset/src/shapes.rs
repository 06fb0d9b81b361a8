//! Built-in geometry: triangle, regular polygon, unit cube.

use std::f32::consts::TAU;

use rand::Rng;

use crate::mesh::{MeshData, MeshVertex};

pub const MIN_VERTS: u32 = 1;
pub const MAX_VERTS: u32 = 36;

const FACING: [f32; 3] = [0.0, 0.0, 1.0];

/// Single colored triangle in the XY plane.
pub fn triangle() -> MeshData {
    MeshData::from_vertices(vec![
        MeshVertex::new([0.0, 0.5, 0.0], FACING, [0.5, 1.0]).with_color([1.0, 0.0, 0.0]),
        MeshVertex::new([0.5, -0.5, 0.0], FACING, [1.0, 0.0]).with_color([0.0, 1.0, 0.0]),
        MeshVertex::new([-0.5, -0.5, 0.0], FACING, [0.0, 0.0]).with_color([0.0, 0.0, 1.0]),
    ])
}

/// Regular polygon with `vert_count` corners on a circle of `radius`.
///
/// Corner `i` sits at angle `2*pi*i/vert_count`. Depth and color are random
/// in `[0, 1)`, so every rebuild looks different.
pub fn polygon<R: Rng>(vert_count: u32, radius: f32, rng: &mut R) -> MeshData {
    let vert_count = vert_count.max(MIN_VERTS);
    let step = TAU / vert_count as f32;
    let vertices = (0..vert_count)
        .map(|i| {
            let angle = i as f32 * step;
            let (sin, cos) = angle.sin_cos();
            let uv = [0.5 + 0.5 * cos, 0.5 + 0.5 * sin];
            MeshVertex::new([radius * cos, radius * sin, rng.r#gen()], FACING, uv)
                .with_color([rng.r#gen(), rng.r#gen(), rng.r#gen()])
        })
        .collect();
    MeshData::from_vertices(vertices)
}

/// Maps a cursor row to a vertex count: the top of the window gives
/// [`MAX_VERTS`], the bottom [`MIN_VERTS`].
pub fn vertex_count_from_cursor(cursor_y: f64, window_height: u32) -> u32 {
    let height = f64::from(window_height.max(1));
    let from_bottom = (1.0 - cursor_y / height).clamp(0.0, 1.0);
    let range = f64::from(MAX_VERTS - MIN_VERTS);
    (f64::from(MIN_VERTS) + range * from_bottom) as u32
}

/// Steps a vertex count by `delta`, staying within `[MIN_VERTS, MAX_VERTS]`.
pub fn step_vertex_count(current: u32, delta: i32) -> u32 {
    (current as i64 + i64::from(delta)).clamp(i64::from(MIN_VERTS), i64::from(MAX_VERTS)) as u32
}

/// Unit cube centred on the origin: 6 faces x 2 triangles, per-face normals
/// and full-face texture coordinates.
pub fn cube() -> MeshData {
    // (normal, four corners counter-clockwise as seen from outside)
    const FACES: [([f32; 3], [[f32; 3]; 4]); 6] = [
        (
            [0.0, 0.0, -1.0],
            [[0.5, -0.5, -0.5], [-0.5, -0.5, -0.5], [-0.5, 0.5, -0.5], [0.5, 0.5, -0.5]],
        ),
        (
            [0.0, 0.0, 1.0],
            [[-0.5, -0.5, 0.5], [0.5, -0.5, 0.5], [0.5, 0.5, 0.5], [-0.5, 0.5, 0.5]],
        ),
        (
            [-1.0, 0.0, 0.0],
            [[-0.5, -0.5, -0.5], [-0.5, -0.5, 0.5], [-0.5, 0.5, 0.5], [-0.5, 0.5, -0.5]],
        ),
        (
            [1.0, 0.0, 0.0],
            [[0.5, -0.5, 0.5], [0.5, -0.5, -0.5], [0.5, 0.5, -0.5], [0.5, 0.5, 0.5]],
        ),
        (
            [0.0, -1.0, 0.0],
            [[-0.5, -0.5, -0.5], [0.5, -0.5, -0.5], [0.5, -0.5, 0.5], [-0.5, -0.5, 0.5]],
        ),
        (
            [0.0, 1.0, 0.0],
            [[-0.5, 0.5, 0.5], [0.5, 0.5, 0.5], [0.5, 0.5, -0.5], [-0.5, 0.5, -0.5]],
        ),
    ];
    const UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
    const CORNERS: [usize; 6] = [0, 1, 2, 2, 3, 0];

    let vertices = FACES
        .iter()
        .flat_map(|(normal, quad)| {
            CORNERS
                .iter()
                .map(move |&c| MeshVertex::new(quad[c], *normal, UVS[c]))
        })
        .collect();
    MeshData::from_vertices(vertices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn polygon_corners_lie_on_circle() {
        let mut rng = StdRng::seed_from_u64(7);
        let mesh = polygon(6, 2.0, &mut rng);
        assert_eq!(mesh.vertices.len(), 6);
        assert_eq!(mesh.indices, vec![0, 1, 2, 3, 4, 5]);
        for v in &mesh.vertices {
            let [x, y, z] = v.position;
            assert_relative_eq!((x * x + y * y).sqrt(), 2.0, epsilon = 1e-5);
            assert!((0.0..1.0).contains(&z));
            assert!(v.color.iter().all(|c| (0.0..1.0).contains(c)));
        }
        assert_relative_eq!(mesh.vertices[0].position[0], 2.0);
        assert_relative_eq!(mesh.vertices[3].position[0], -2.0, epsilon = 1e-5);
    }

    #[test]
    fn polygon_has_at_least_one_vertex() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(polygon(0, 1.0, &mut rng).vertices.len(), 1);
    }

    #[test]
    fn cursor_maps_to_vertex_range() {
        assert_eq!(vertex_count_from_cursor(0.0, 600), MAX_VERTS);
        assert_eq!(vertex_count_from_cursor(600.0, 600), MIN_VERTS);
        assert_eq!(vertex_count_from_cursor(300.0, 600), 18);
        assert_eq!(vertex_count_from_cursor(-50.0, 600), MAX_VERTS);
        assert_eq!(vertex_count_from_cursor(900.0, 600), MIN_VERTS);
    }

    #[test]
    fn vertex_count_steps_are_clamped() {
        assert_eq!(step_vertex_count(3, 1), 4);
        assert_eq!(step_vertex_count(MAX_VERTS, 1), MAX_VERTS);
        assert_eq!(step_vertex_count(MIN_VERTS, -1), MIN_VERTS);
    }

    #[test]
    fn cube_faces_wind_outwards() {
        let cube = cube();
        assert_eq!(cube.vertices.len(), 36);
        assert_eq!(cube.triangle_count(), 12);
        for tri in cube.triangles() {
            let [a, b, c] = tri.map(|i| cube.vertices[i as usize]);
            let u = [
                b.position[0] - a.position[0],
                b.position[1] - a.position[1],
                b.position[2] - a.position[2],
            ];
            let v = [
                c.position[0] - a.position[0],
                c.position[1] - a.position[1],
                c.position[2] - a.position[2],
            ];
            let n = [
                u[1] * v[2] - u[2] * v[1],
                u[2] * v[0] - u[0] * v[2],
                u[0] * v[1] - u[1] * v[0],
            ];
            let dot = n[0] * a.normal[0] + n[1] * a.normal[1] + n[2] * a.normal[2];
            assert!(dot > 0.0, "triangle {tri:?} winds inwards");
        }
        assert_eq!(cube.average_height(), Some(0.0));
    }
}
