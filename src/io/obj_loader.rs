use crate::error::Result;
use crate::scene::mesh::Mesh;
use log::{debug, info, warn};
use nalgebra::{Point3, Vector2};
use std::io::BufRead;
use std::path::Path;

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: true,
        single_index: true, // One index per corner for positions and UVs.
        ..Default::default()
    }
}

/// Loads an OBJ file into a single mesh. Every object in the file is merged;
/// materials are ignored.
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let path = path.as_ref();
    info!("Loading OBJ file: {}", path.display());
    let (models, _materials) = tobj::load_obj(path, &load_options())?;
    merge_models(&models)
}

/// Reads OBJ text from any buffered reader. `mtllib` references are ignored.
pub fn load_obj_buf<R: BufRead>(reader: &mut R) -> Result<Mesh> {
    let (models, _materials) =
        tobj::load_obj_buf(reader, &load_options(), |_| Ok(Default::default()))?;
    merge_models(&models)
}

fn merge_models(models: &[tobj::Model]) -> Result<Mesh> {
    let mut positions = Vec::new();
    let mut texcoords = Vec::new();
    let mut faces = Vec::new();

    for model in models {
        let mesh = &model.mesh;
        let offset = positions.len();
        if mesh.texcoords.is_empty() {
            debug!("OBJ object '{}' has no texture coordinates", model.name);
        }

        for (i, p) in mesh.positions.chunks_exact(3).enumerate() {
            positions.push(Point3::new(p[0], p[1], p[2]));
            // Vertices without a `vt` get (0, 0).
            let uv = mesh
                .texcoords
                .get(i * 2..i * 2 + 2)
                .map_or_else(Vector2::zeros, |uv| Vector2::new(uv[0], uv[1]));
            texcoords.push(uv);
        }

        if mesh.indices.len() % 3 != 0 {
            warn!(
                "OBJ object '{}' has {} trailing indices; ignoring them",
                model.name,
                mesh.indices.len() % 3
            );
        }
        // The mesh contract is 1-based, like the OBJ text itself.
        for tri in mesh.indices.chunks_exact(3) {
            faces.push([
                offset + tri[0] as usize + 1,
                offset + tri[1] as usize + 1,
                offset + tri[2] as usize + 1,
            ]);
        }
    }

    let mut out = Mesh::from_faces(&positions, &faces)?;
    for (tri, face) in out.triangles.iter_mut().zip(&faces) {
        for (v, &i) in tri.vertices.iter_mut().zip(face) {
            v.texcoord = texcoords[i - 1];
        }
    }

    info!(
        "OBJ loaded successfully. Vertices: {}, triangles: {}",
        positions.len(),
        out.triangles.len()
    );
    Ok(out)
}
