//! ASCII Scene Export (`.ase`) importer.
//!
//! ASE describes a mesh as a list of shared vertices plus faces that index into it. The
//! importer flattens that into one vertex per face corner, in face order, so the result can
//! be drawn with the sequential index buffer [`Mesh::upload`] generates. No index array is
//! produced.
//!
//! Positions and normals are converted from the exporter's Z-up axes to Y-up:
//! `(x, y, z)` becomes `(-x, z, y)`.
//!
//! Blocks are read in file order with a forward-only [`TextParser`]:
//!
//! ```text
//! *MESH_NUMVERTEX 3
//! *MESH_NUMFACES 1
//! *MESH_VERTEX_LIST { *MESH_VERTEX 0 x y z ... }
//! *MESH_FACE_LIST { *MESH_FACE 0: A: 0 B: 1 C: 2 AB: 1 BC: 1 CA: 1 ... }
//! *MESH_NUMTVERTEX 3                      (uvs only)
//! *MESH_TVERTLIST { *MESH_TVERT 0 u v w }  (uvs only)
//! *MESH_NUMTVFACES 1                      (uvs only)
//! *MESH_TFACELIST { *MESH_TFACE 0 a b c }  (uvs only)
//! *MESH_NORMALS { *MESH_FACENORMAL 0 x y z ... }  (face normals only)
//! ```

use std::path::Path;

use glam::{Vec2, Vec3, vec2, vec3};

use crate::abs::{GpuDevice, Mesh};
use crate::config::AseOptions;
use crate::error::{MeshError, Result};
use crate::geometry::Geometry;
use crate::parser::TextParser;

/// Z-up export axes to Y-up.
fn remap(x: f32, y: f32, z: f32) -> Vec3 {
    vec3(-x, z, y)
}

/// Reads the count after `tag`. Each of the `record` entries it announces takes at least
/// `record.len() + 1` bytes, so counts the rest of the input cannot hold are rejected before
/// anything is allocated for them.
fn read_count(
    parser: &mut TextParser,
    tag: &str,
    record: &str,
    what: &'static str,
) -> Result<usize> {
    parser.seek(tag)?;
    let value = parser.get_int()?;
    usize::try_from(value)
        .ok()
        .filter(|&count| count <= parser.remaining() / (record.len() + 1))
        .ok_or(MeshError::InvalidCount { what, value })
}

/// One vertex per face corner.
fn corner_count(num_faces: usize) -> Result<usize> {
    num_faces.checked_mul(3).ok_or(MeshError::InvalidCount {
        what: "face count",
        value: num_faces as i64,
    })
}

fn read_index(parser: &mut TextParser, len: usize, what: &'static str) -> Result<usize> {
    let index = parser.get_int()?;
    usize::try_from(index)
        .ok()
        .filter(|&i| i < len)
        .ok_or(MeshError::IndexOutOfRange { what, index, len })
}

fn read_vec3(parser: &mut TextParser) -> Result<Vec3> {
    let x = parser.get_float()?;
    let y = parser.get_float()?;
    let z = parser.get_float()?;
    Ok(remap(x, y, z))
}

/// Reads one mesh from `parser` and flattens it into per-corner vertices.
pub fn parse_ase(parser: &mut TextParser, options: &AseOptions) -> Result<Geometry> {
    let num_vertices = read_count(parser, "*MESH_NUMVERTEX", "*MESH_VERTEX", "vertex count")?;
    let num_faces = read_count(parser, "*MESH_NUMFACES", "*MESH_FACE", "face count")?;

    let mut unique = vec![Vec3::ZERO; num_vertices];
    for _ in 0..num_vertices {
        parser.seek("*MESH_VERTEX")?;
        let index = read_index(parser, num_vertices, "vertex")?;
        unique[index] = read_vec3(parser)?;
    }

    let mut geometry = Geometry::new();
    geometry.positions.reserve(corner_count(num_faces)?);
    for _ in 0..num_faces {
        parser.seek("*MESH_FACE")?;
        // The face number is not used; faces are kept in file order.
        parser.get_int()?;
        for corner in ["A:", "B:", "C:"] {
            parser.seek(corner)?;
            let index = read_index(parser, num_vertices, "face corner")?;
            geometry.positions.push(unique[index]);
        }
    }

    if options.uvs {
        geometry.uvs = read_uvs(parser, num_faces)?;
    }

    if options.face_normals {
        geometry.normals = read_face_normals(parser, num_faces)?;
    }

    Ok(geometry)
}

fn read_uvs(parser: &mut TextParser, num_faces: usize) -> Result<Vec<Vec2>> {
    let num_tverts = read_count(
        parser,
        "*MESH_NUMTVERTEX",
        "*MESH_TVERT",
        "texture vertex count",
    )?;
    let mut tverts = vec![Vec2::ZERO; num_tverts];
    for _ in 0..num_tverts {
        parser.seek("*MESH_TVERT")?;
        let index = read_index(parser, num_tverts, "texture vertex")?;
        let u = parser.get_float()?;
        let v = parser.get_float()?;
        parser.get_float()?;
        tverts[index] = vec2(u, v);
    }

    let num_tfaces = read_count(
        parser,
        "*MESH_NUMTVFACES",
        "*MESH_TFACE",
        "texture face count",
    )?;
    if num_tfaces != num_faces {
        return Err(MeshError::InvalidCount {
            what: "texture face count",
            value: num_tfaces as i64,
        });
    }

    let mut uvs = Vec::with_capacity(corner_count(num_faces)?);
    for _ in 0..num_tfaces {
        parser.seek("*MESH_TFACE")?;
        parser.get_int()?;
        for _ in 0..3 {
            let index = read_index(parser, num_tverts, "texture face corner")?;
            uvs.push(tverts[index]);
        }
    }
    Ok(uvs)
}

/// Every corner of a face gets that face's normal.
fn read_face_normals(parser: &mut TextParser, num_faces: usize) -> Result<Vec<Vec3>> {
    let mut normals = Vec::with_capacity(corner_count(num_faces)?);
    for _ in 0..num_faces {
        parser.seek("*MESH_FACENORMAL")?;
        parser.get_int()?;
        let normal = read_vec3(parser)?;
        normals.extend([normal; 3]);
    }
    Ok(normals)
}

/// Reads and parses the ASE file at `path`.
pub fn load_ase<P: AsRef<Path>>(path: P, options: &AseOptions) -> Result<Geometry> {
    let mut parser = TextParser::create(path)?;
    parse_ase(&mut parser, options)
}

impl<D: GpuDevice> Mesh<D> {
    /// Replaces the mesh with the contents of an ASE file and uploads it.
    ///
    /// On error the mesh is left exactly as it was.
    pub fn read_ase<P: AsRef<Path>>(&mut self, path: P, options: &AseOptions) -> Result<()> {
        let path = path.as_ref();
        let geometry = load_ase(path, options)?;
        log::info!(
            "Read {}: {} faces, {} vertices",
            path.display(),
            geometry.vertex_count() / 3,
            geometry.vertex_count()
        );
        self.set_geometry(geometry);
        self.upload()
    }
}
