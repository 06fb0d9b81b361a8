//! Minimal OBJ parser supporting positions, vertex colors, normals, texture
//! coordinates and object/group ranges.

use std::{
    collections::HashMap,
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use anyhow::{Context, Result, anyhow};

use crate::mesh::{MeshData, MeshVertex, NamedMesh};

const DEFAULT_GROUP: &str = "default";

/// Contiguous run of triangles belonging to one `o`/`g` statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjGroup {
    pub name: String,
    pub first_index: usize,
    pub index_count: usize,
}

/// Parsed OBJ: one indexed triangle mesh plus its named index ranges.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjModel {
    pub mesh: MeshData,
    pub groups: Vec<ObjGroup>,
}

impl ObjModel {
    /// One mesh per distinct group name, in order of first appearance.
    /// Ranges sharing a name (e.g. `g` reopening a group) are merged.
    pub fn group_meshes(&self) -> Vec<NamedMesh> {
        let mut merged: Vec<(&str, Vec<[u32; 3]>)> = Vec::new();
        for group in &self.groups {
            let triangles = self.group_triangles(group);
            match merged.iter_mut().find(|(name, _)| *name == group.name) {
                Some((_, acc)) => acc.extend(triangles),
                None => merged.push((group.name.as_str(), triangles)),
            }
        }
        merged
            .into_iter()
            .map(|(name, triangles)| NamedMesh {
                name: name.to_string(),
                mesh: crate::split::reindex(&self.mesh, &triangles),
            })
            .collect()
    }

    fn group_triangles(&self, group: &ObjGroup) -> Vec<[u32; 3]> {
        let end = (group.first_index + group.index_count).min(self.mesh.indices.len());
        self.mesh.indices[group.first_index.min(end)..end]
            .chunks_exact(3)
            .map(|t| [t[0], t[1], t[2]])
            .collect()
    }
}

/// Load an OBJ mesh from a file path.
pub fn load_obj_from_path(path: impl AsRef<Path>) -> Result<MeshData> {
    load_obj_model_from_path(path).map(|m| m.mesh)
}

/// Load an OBJ model (mesh + groups) from a file path.
pub fn load_obj_model_from_path(path: impl AsRef<Path>) -> Result<ObjModel> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open OBJ file: {}", path.display()))?;
    let model = parse_obj(BufReader::new(file))
        .with_context(|| format!("Failed to parse OBJ file: {}", path.display()))?;
    log::info!(
        "Loaded {}: {} vertices, {} triangles, {} group(s)",
        path.display(),
        model.mesh.vertices.len(),
        model.mesh.triangle_count(),
        model.groups.len()
    );
    Ok(model)
}

/// Load an OBJ mesh from a [`BufRead`] implementation.
pub fn load_obj_from_reader<R: BufRead>(reader: R) -> Result<MeshData> {
    parse_obj(reader).map(|m| m.mesh)
}

/// Convenience helper to parse an OBJ string literal.
pub fn load_obj_from_str(contents: &str) -> Result<MeshData> {
    parse_obj(io::Cursor::new(contents)).map(|m| m.mesh)
}

pub fn load_obj_model_from_str(contents: &str) -> Result<ObjModel> {
    parse_obj(io::Cursor::new(contents))
}

fn parse_obj<R: BufRead>(reader: R) -> Result<ObjModel> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut colors: Vec<[f32; 3]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut texcoords: Vec<[f32; 2]> = Vec::new();

    #[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
    struct Key(usize, Option<usize>, Option<usize>);

    let mut unique: HashMap<Key, u32> = HashMap::new();
    let mut vertices: Vec<MeshVertex> = Vec::new();
    let mut needs_normal: Vec<bool> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    let mut groups: Vec<ObjGroup> = Vec::new();
    let mut group_name = DEFAULT_GROUP.to_string();
    let mut group_start = 0usize;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", line_no + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut parts = trimmed.split_whitespace();
        let tag = parts
            .next()
            .ok_or_else(|| anyhow!("Malformed OBJ line {}: '{}'", line_no + 1, trimmed))?;

        match tag {
            "v" => {
                let x = parse_f32(parts.next(), line_no, "x coordinate")?;
                let y = parse_f32(parts.next(), line_no, "y coordinate")?;
                let z = parse_f32(parts.next(), line_no, "z coordinate")?;
                positions.push([x, y, z]);

                // "v x y z [w]" or the "v x y z r g b [a]" vertex color extension.
                let rest: Vec<&str> = parts.collect();
                let color = match rest.len() {
                    0 => [1.0, 1.0, 1.0],
                    1 => {
                        parse_f32(Some(rest[0]), line_no, "w coordinate")?;
                        [1.0, 1.0, 1.0]
                    }
                    3 | 4 => [
                        parse_f32(Some(rest[0]), line_no, "red component")?,
                        parse_f32(Some(rest[1]), line_no, "green component")?,
                        parse_f32(Some(rest[2]), line_no, "blue component")?,
                    ],
                    n => {
                        return Err(anyhow!(
                            "Unexpected {} extra value(s) on vertex line {}",
                            n,
                            line_no + 1
                        ));
                    }
                };
                colors.push(color);
            }
            "vt" => {
                let u = parse_f32(parts.next(), line_no, "u coordinate")?;
                let v = parse_f32(parts.next(), line_no, "v coordinate")?;
                texcoords.push([u, v]);
            }
            "vn" => {
                let nx = parse_f32(parts.next(), line_no, "nx coordinate")?;
                let ny = parse_f32(parts.next(), line_no, "ny coordinate")?;
                let nz = parse_f32(parts.next(), line_no, "nz coordinate")?;
                normals.push([nx, ny, nz]);
            }
            "o" | "g" => {
                close_group(&mut groups, &group_name, group_start, indices.len());
                group_name = parts.collect::<Vec<_>>().join(" ");
                if group_name.is_empty() {
                    group_name = DEFAULT_GROUP.to_string();
                }
                group_start = indices.len();
            }
            "f" => {
                let mut face_indices: Vec<u32> = Vec::new();
                for part in parts {
                    let (vi, vti, vni) = parse_face_vertex(
                        part,
                        positions.len(),
                        texcoords.len(),
                        normals.len(),
                        line_no,
                    )?;
                    let key = Key(vi, vti, vni);
                    let index = match unique.get(&key) {
                        Some(&idx) => idx,
                        None => {
                            let position = positions.get(vi).copied().ok_or_else(|| {
                                anyhow!("Position index out of bounds on line {}", line_no + 1)
                            })?;
                            let uv = vti
                                .and_then(|i| texcoords.get(i).copied())
                                .unwrap_or([0.0, 0.0]);
                            let normal = vni.and_then(|i| normals.get(i).copied());

                            let idx = u32::try_from(vertices.len())
                                .map_err(|_| anyhow!("Too many vertices in OBJ (>{})", u32::MAX))?;
                            vertices.push(MeshVertex {
                                position,
                                color: colors[vi],
                                normal: normal.unwrap_or([0.0, 0.0, 0.0]),
                                uv,
                            });
                            needs_normal.push(normal.is_none());
                            unique.insert(key, idx);
                            idx
                        }
                    };
                    face_indices.push(index);
                }

                if face_indices.len() < 3 {
                    log::debug!("Skipping degenerate face on line {}", line_no + 1);
                    continue;
                }
                // Triangulate fan
                for tri in 1..(face_indices.len() - 1) {
                    indices.push(face_indices[0]);
                    indices.push(face_indices[tri]);
                    indices.push(face_indices[tri + 1]);
                }
            }
            _ => {
                // Ignore other directives (s/usemtl/mtllib/etc.)
            }
        }
    }
    close_group(&mut groups, &group_name, group_start, indices.len());

    if vertices.is_empty() || indices.is_empty() {
        anyhow::bail!("OBJ contained no triangles");
    }

    fill_missing_normals(&mut vertices, &needs_normal, &indices);

    Ok(ObjModel {
        mesh: MeshData::new(vertices, indices),
        groups,
    })
}

fn close_group(groups: &mut Vec<ObjGroup>, name: &str, start: usize, end: usize) {
    if end > start {
        groups.push(ObjGroup {
            name: name.to_string(),
            first_index: start,
            index_count: end - start,
        });
    }
}

/// Accumulates face normals into vertices that had no `vn` reference.
fn fill_missing_normals(vertices: &mut [MeshVertex], needs_normal: &[bool], indices: &[u32]) {
    if !needs_normal.iter().any(|&n| n) {
        return;
    }
    let mut acc = vec![[0.0f32; 3]; vertices.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let n = face_normal(
            vertices[a].position,
            vertices[b].position,
            vertices[c].position,
        );
        for &i in &[a, b, c] {
            if needs_normal[i] {
                for axis in 0..3 {
                    acc[i][axis] += n[axis];
                }
            }
        }
    }
    for (i, v) in vertices.iter_mut().enumerate() {
        if needs_normal[i] {
            v.normal = normalize_or(acc[i], [0.0, 0.0, 1.0]);
        }
    }
}

fn face_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
    let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ]
}

fn normalize_or(n: [f32; 3], fallback: [f32; 3]) -> [f32; 3] {
    let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    if len <= f32::EPSILON {
        fallback
    } else {
        [n[0] / len, n[1] / len, n[2] / len]
    }
}

fn parse_f32(value: Option<&str>, line_no: usize, what: &str) -> Result<f32> {
    let token = value.ok_or_else(|| anyhow!("Missing {} on line {}", what, line_no + 1))?;
    token
        .parse::<f32>()
        .with_context(|| format!("Failed to parse {} on line {}", what, line_no + 1))
}

fn parse_face_vertex(
    token: &str,
    pos_count: usize,
    tex_count: usize,
    norm_count: usize,
    line_no: usize,
) -> Result<(usize, Option<usize>, Option<usize>)> {
    let mut split = token.split('/');
    let pos = split
        .next()
        .ok_or_else(|| anyhow!("Malformed face element '{}' on line {}", token, line_no + 1))?;
    let pos_idx = resolve_index(pos, pos_count, line_no)?;

    let tex_idx = match split.next() {
        Some(value) if !value.is_empty() => Some(resolve_index(value, tex_count, line_no)?),
        _ => None,
    };

    let norm_idx = match split.next() {
        Some(value) if !value.is_empty() => Some(resolve_index(value, norm_count, line_no)?),
        _ => None,
    };

    Ok((pos_idx, tex_idx, norm_idx))
}

fn resolve_index(token: &str, len: usize, line_no: usize) -> Result<usize> {
    let raw = token
        .parse::<i64>()
        .with_context(|| format!("Invalid index '{}' on line {}", token, line_no + 1))?;
    if raw == 0 {
        anyhow::bail!("OBJ indices are 1-based; found 0 on line {}", line_no + 1);
    }

    let idx = if raw > 0 { raw - 1 } else { len as i64 + raw };

    if idx < 0 || idx as usize >= len {
        anyhow::bail!(
            "OBJ index {} resolved out of bounds (len={}) on line {}",
            raw,
            len,
            line_no + 1
        );
    }

    Ok(idx as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;

    #[test]
    fn parse_simple_triangle() {
        let src = r#"
            v 0.0 0.0 0.0
            v 1.0 0.0 0.0
            v 0.0 1.0 0.0
            vn 0.0 0.0 1.0
            vt 0.0 0.0
            vt 1.0 0.0
            vt 0.0 1.0
            f 1/1/1 2/2/1 3/3/1
        "#;
        let mesh = load_obj_from_str(src).expect("parse triangle");
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.indices.len(), 3);
        assert_eq!(mesh.vertices[1].uv, [1.0, 0.0]);
        assert!(mesh.is_valid());
    }

    #[test]
    fn shared_corners_are_deduplicated() {
        let src = "
            v 0 0 0
            v 1 0 0
            v 1 1 0
            v 0 1 0
            f 1 2 3
            f 1 3 4
        ";
        let mesh = load_obj_from_str(src).unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn distinct_attributes_split_vertices() {
        let src = "
            v 0 0 0
            v 1 0 0
            v 0 1 0
            vt 0 0
            vt 1 1
            f 1/1 2/1 3/1
            f 1/2 3/1 2/1
        ";
        let mesh = load_obj_from_str(src).unwrap();
        // Position 1 appears with two different texcoords.
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 3, 2, 1]);
    }

    #[test]
    fn quad_is_fan_triangulated() {
        let src = "
            v 0 0 0
            v 1 0 0
            v 1 1 0
            v 0 1 0
            v -1 1 0
            f 1 2 3 4 5
        ";
        let mesh = load_obj_from_str(src).unwrap();
        assert_eq!(mesh.triangle_count(), 3);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3, 0, 3, 4]);
    }

    #[test]
    fn negative_indices_are_relative() {
        let src = "
            v 0 0 0
            v 1 0 0
            v 0 1 0
            f -3 -2 -1
        ";
        let mesh = load_obj_from_str(src).unwrap();
        assert_eq!(mesh.vertices[0].position, [0.0, 0.0, 0.0]);
        assert_eq!(mesh.vertices[2].position, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn zero_and_out_of_range_indices_fail() {
        assert!(load_obj_from_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2").is_err());
        assert!(load_obj_from_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 4").is_err());
        assert!(load_obj_from_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1/5 2 3").is_err());
    }

    #[test]
    fn malformed_numbers_fail() {
        let err = load_obj_from_str("v 0 zero 0").unwrap_err();
        assert!(format!("{err:#}").contains("line 1"));
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(load_obj_from_str("# nothing here\n").is_err());
        assert!(load_obj_from_str("v 0 0 0\nv 1 0 0\nf 1 2").is_err());
    }

    #[test]
    fn vertex_colors_are_read() {
        let src = "
            v 0 0 0 1 0 0
            v 1 0 0 0 1 0
            v 0 1 0
            f 1 2 3
        ";
        let mesh = load_obj_from_str(src).unwrap();
        assert_eq!(mesh.vertices[0].color, [1.0, 0.0, 0.0]);
        assert_eq!(mesh.vertices[1].color, [0.0, 1.0, 0.0]);
        assert_eq!(mesh.vertices[2].color, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn homogeneous_w_is_not_a_color() {
        let src = "v 0 0 0 1.0\nv 1 0 0 1.0\nv 0 1 0 1.0\nf 1 2 3\n";
        let mesh = load_obj_from_str(src).expect("w coordinate is valid OBJ");
        assert_eq!(mesh.vertices.len(), 3);
        assert!(mesh.vertices.iter().all(|v| v.color == [1.0, 1.0, 1.0]));
        assert_eq!(mesh.vertices[1].position, [1.0, 0.0, 0.0]);

        // A trailing alpha after r g b is accepted too.
        let mesh = load_obj_from_str("v 0 0 0 0 0 1 1\nv 1 0 0\nv 0 1 0\nf 1 2 3").unwrap();
        assert_eq!(mesh.vertices[0].color, [0.0, 0.0, 1.0]);

        assert!(load_obj_from_str("v 0 0 0 1 1\nv 1 0 0\nv 0 1 0\nf 1 2 3").is_err());
    }

    #[test]
    fn missing_normals_are_computed() {
        let src = "
            v 0 0 0
            v 1 0 0
            v 0 1 0
            f 1 2 3
        ";
        let mesh = load_obj_from_str(src).unwrap();
        for v in &mesh.vertices {
            assert_relative_eq!(v.normal[2], 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn explicit_normals_are_kept() {
        let src = "
            v 0 0 0
            v 1 0 0
            v 0 1 0
            vn 0 1 0
            f 1//1 2//1 3//1
        ";
        let mesh = load_obj_from_str(src).unwrap();
        assert!(mesh.vertices.iter().all(|v| v.normal == [0.0, 1.0, 0.0]));
    }

    #[test]
    fn groups_record_index_ranges() {
        let src = "
            v 0 0 0
            v 1 0 0
            v 0 1 0
            v 0 0 1
            f 1 2 3
            o roof
            f 1 2 4
            f 2 3 4
            g
            f 1 3 4
        ";
        let model = load_obj_model_from_str(src).unwrap();
        let names: Vec<_> = model.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["default", "roof", "default"]);
        assert_eq!(model.groups[1].first_index, 3);
        assert_eq!(model.groups[1].index_count, 6);

        let parts = model.group_meshes();
        let roof = &parts[1].mesh;
        assert_eq!(roof.triangle_count(), 2);
        assert_eq!(roof.vertices.len(), 4);
        assert!(roof.is_valid());
    }

    #[test]
    fn reopened_groups_are_merged_by_name() {
        let src = "
            v 0 0 0
            v 1 0 0
            v 0 1 0
            v 0 0 1
            f 1 2 3
            o roof
            f 1 2 4
            f 2 3 4
            g
            f 1 3 4
        ";
        let model = load_obj_model_from_str(src).unwrap();
        let parts = model.group_meshes();
        let names: Vec<_> = parts.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["default", "roof"]);
        assert_eq!(parts[0].mesh.triangle_count(), 2);
        assert_eq!(parts[1].mesh.triangle_count(), 2);
        assert!(parts.iter().all(|p| p.mesh.is_valid()));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3").unwrap();
        let mesh = load_obj_from_path(file.path()).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_obj_from_path("does/not/exist.obj").unwrap_err();
        assert!(err.to_string().contains("does/not/exist.obj"));
    }
}
