use crate::error::Result;
use crate::nalgebra_types::*;
use crate::trimesh::TriangleMesh;
use std::path::Path;

/// Something that can bring a mesh into memory from a file and write it back out.
///
/// The converter only talks to this trait, so the mesh type stays opaque to it.
/// Implementations decide which formats they understand, usually from the
/// file extension.
pub trait MeshBackend {
    type Mesh;

    fn load(&self, path: &Path) -> Result<Self::Mesh>;

    /// Write `mesh` to `path`, replacing whatever is there.
    fn save(&self, mesh: &Self::Mesh, path: &Path) -> Result<()>;
}

/// Backend over [`TriangleMesh`], handling `.ply`, `.stl` and `.obj`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TriMeshBackend;

impl MeshBackend for TriMeshBackend {
    type Mesh = TriangleMesh<f64>;

    fn load(&self, path: &Path) -> Result<TriangleMesh<f64>> {
        let mesh = TriangleMesh::from_file(&path)?;
        log::info!("Loaded {}: {}", path.display(), summary(&mesh));
        Ok(mesh)
    }

    fn save(&self, mesh: &TriangleMesh<f64>, path: &Path) -> Result<()> {
        mesh.to_file(&path)?;
        log::info!(
            "Saved {} nodes and {} triangles to {}",
            mesh.node_len(),
            mesh.triangle_len(),
            path.display()
        );
        Ok(())
    }
}

/// One line description of a mesh for the log.
pub fn summary<T: FloatField>(mesh: &TriangleMesh<T>) -> String {
    let mut result = format!(
        "{} nodes, {} triangles",
        mesh.node_len(),
        mesh.triangle_len()
    );
    if let Some(bounds) = mesh.bounds() {
        result.push_str(&format!(", bounds {}", bounds));
    }
    if mesh.triangle_len() > 0 {
        result.push_str(&format!(", area {}", mesh.surface_area()));
    }
    result
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn summary_text() {
        let mut mesh = TriangleMesh::<f64>::new();
        assert_eq!(summary(&mesh), "0 nodes, 0 triangles");

        mesh.add_node(Vector3::new(0.0, 0.0, 0.0));
        mesh.add_node(Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(summary(&mesh), "2 nodes, 0 triangles, bounds [0, 0, 0] .. [1, 0, 0]");

        mesh.add_node(Vector3::new(0.0, 1.0, 0.0));
        mesh.add_triangle([0, 1, 2]);
        assert_eq!(
            summary(&mesh),
            "3 nodes, 1 triangles, bounds [0, 0, 0] .. [1, 1, 0], area 0.5"
        );
    }

    #[test]
    fn load_and_save() {
        let mut block_path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        block_path.push("test_assets/block.ply");

        let backend = TriMeshBackend;
        let mesh = backend.load(&block_path).unwrap();
        assert_eq!(mesh.triangle_len(), 12);

        let dir = tempdir::TempDir::new("mesh_io_save").unwrap();
        let out = dir.path().join("block.obj");
        backend.save(&mesh, &out).unwrap();
        let reloaded = backend.load(&out).unwrap();
        assert_eq!(reloaded.node_len(), 8);
        assert_eq!(reloaded.triangle_len(), 12);
    }
}
