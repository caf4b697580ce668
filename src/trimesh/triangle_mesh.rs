use crate::aabb::AABB;
use crate::error::{MeshError, Result};
use crate::nalgebra_types::*;
use crate::trimesh::format::MeshFormat;
use crate::trimesh::obj::{read_obj_file, write_obj_file};
use crate::trimesh::ply::{read_ply_file, write_ply_file};
use crate::trimesh::stl::{read_stl_file, write_stl_file};

/// Triangle Mesh class.
/// Tracks triangle -> node topology.
/// A mesh with nodes but no triangles is a point cloud.
#[derive(Clone, Debug, Default)]
pub struct TriangleMesh<T: FloatField> {
    pub node_positions: Vec<SVector<T, 3>>,
    pub triangle_indices: Vec<[usize; 3]>,
}

impl<T: FloatField> TriangleMesh<T> {
    pub fn new() -> TriangleMesh<T> {
        TriangleMesh {
            node_positions: Vec::new(),
            triangle_indices: Vec::new(),
        }
    }

    /// Read a TriangleMesh from file.
    /// `.ply`, `.stl` and `.obj` files are supported.
    pub fn from_file<P: AsRef<std::path::Path>>(p: &P) -> Result<TriangleMesh<T>> {
        let path: &std::path::Path = p.as_ref();
        let format = MeshFormat::from_path(path)?;
        log::debug!("Reading {:?} mesh from {}", format, path.display());

        let mesh = match format {
            MeshFormat::Stl => read_stl_file(&path),
            MeshFormat::Ply => read_ply_file(&path),
            MeshFormat::Obj => read_obj_file(&path),
        }
        .map_err(|error| MeshError::from_io(error, path))?;

        mesh.validate()?;
        Ok(mesh)
    }

    /// Write a TriangleMesh to file, picking the format from the extension.
    /// An existing file is overwritten.
    pub fn to_file<P: AsRef<std::path::Path>>(&self, p: &P) -> Result<()> {
        let path: &std::path::Path = p.as_ref();
        let format = MeshFormat::from_path(path)?;
        if format == MeshFormat::Stl && self.triangle_len() == 0 && self.node_len() > 0 {
            return Err(MeshError::InvalidArgument(format!(
                "stl stores only triangles, refusing to drop the {} nodes of a point cloud: {}",
                self.node_len(),
                path.display()
            )));
        }
        log::debug!("Writing {:?} mesh to {}", format, path.display());

        match format {
            MeshFormat::Stl => write_stl_file(&path, self),
            MeshFormat::Ply => write_ply_file(&path, self),
            MeshFormat::Obj => write_obj_file(&path, self),
        }
        .map_err(|error| MeshError::from_io(error, path))
    }

    pub fn with_capacity(node_len: usize, triangle_len: usize) -> TriangleMesh<T> {
        TriangleMesh {
            node_positions: Vec::with_capacity(node_len),
            triangle_indices: Vec::with_capacity(triangle_len),
        }
    }

    pub fn node_len(&self) -> usize {
        self.node_positions.len()
    }

    pub fn triangle_len(&self) -> usize {
        self.triangle_indices.len()
    }

    pub fn add_node(&mut self, position: SVector<T, 3>) -> usize {
        let result = self.node_len();
        self.node_positions.push(position);
        result
    }

    pub fn node(&self, index: usize) -> &SVector<T, 3> {
        &self.node_positions[index]
    }

    pub fn add_triangle(&mut self, indices: [usize; 3]) -> usize {
        let result = self.triangle_len();
        self.triangle_indices.push(indices);
        result
    }

    /// Fan triangulate a polygon around its first corner.
    /// Returns the number of triangles added; fewer than 3 corners adds nothing.
    pub fn add_polygon(&mut self, corners: &[usize]) -> usize {
        if corners.len() < 3 {
            return 0;
        }
        for i in 1..corners.len() - 1 {
            self.add_triangle([corners[0], corners[i], corners[i + 1]]);
        }
        corners.len() - 2
    }

    pub fn triangle(&self, index: usize) -> &[usize; 3] {
        &self.triangle_indices[index]
    }

    /// Unit normal of a triangle, or the zero vector if it is degenerate.
    pub fn triangle_normal(&self, index: usize) -> SVector<T, 3> {
        let &[n0, n1, n2] = self.triangle(index);
        let a = self.node(n1) - self.node(n0);
        let b = self.node(n2) - self.node(n0);
        a.cross(&b)
            .try_normalize(T::zero())
            .unwrap_or_else(SVector::zeros)
    }

    pub fn triangle_area(&self, t: usize) -> T {
        let [n0, n1, n2] = self.triangle(t);
        let a = self.node(*n1) - self.node(*n0);
        let b = self.node(*n2) - self.node(*n0);
        (a.cross(&b) * T::half()).norm()
    }

    pub fn surface_area(&self) -> T {
        let mut surface_area = T::zero();
        for t in 0..self.triangle_len() {
            surface_area += self.triangle_area(t);
        }
        surface_area
    }

    /// Bounding box of all nodes, `None` for a mesh without nodes.
    pub fn bounds(&self) -> Option<AABB<T, 3>> {
        let (first, rest) = self.node_positions.split_first()?;
        let mut aabb = AABB::from_point(*first);
        for n in rest {
            aabb.mut_add_point(n);
        }
        Some(aabb)
    }

    /// Check that every triangle references an existing node.
    pub fn validate(&self) -> Result<()> {
        let node_len = self.node_len();
        for (t, triangle) in self.triangle_indices.iter().enumerate() {
            if let Some(bad) = triangle.iter().find(|&&n| n >= node_len) {
                return Err(MeshError::InvalidFormat(format!(
                    "triangle {} references node {} but the mesh has {} nodes",
                    t, bad, node_len
                )));
            }
        }
        Ok(())
    }
}
