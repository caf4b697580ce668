pub mod format;
pub mod obj;
pub mod ply;
pub mod stl;
pub mod triangle_mesh;

pub use format::MeshFormat;
pub use obj::{read_obj_file, write_obj_file};
pub use ply::{read_ply_file, write_ply_file};
pub use stl::{read_stl_file, write_stl_file};
pub use triangle_mesh::TriangleMesh;
