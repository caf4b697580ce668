//! File tree listing and mesh format conversion.
//!
//! [`listing`] walks a directory and reports every regular file under it.
//! [`convert`] moves a mesh from one container format to another through a
//! [`MeshBackend`]; the built in backend reads and writes PLY, STL and OBJ.

pub mod aabb;
pub mod convert;
pub mod error;
pub mod listing;
pub mod mesh_io;
pub mod nalgebra_types;
pub mod trimesh;

pub use convert::{convert, ConvertOptions};
pub use error::{MeshError, Result};
pub use listing::{list_files, list_files_with, print_files, relative_to, ListOptions};
pub use mesh_io::{MeshBackend, TriMeshBackend};
pub use trimesh::{MeshFormat, TriangleMesh};
