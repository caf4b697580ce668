use crate::error::{MeshError, Result};
use std::path::Path;

/// Container formats the triangle mesh can be read from and written to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeshFormat {
    Ply,
    Stl,
    Obj,
}

impl MeshFormat {
    pub const ALL: [MeshFormat; 3] = [MeshFormat::Ply, MeshFormat::Stl, MeshFormat::Obj];

    /// Pick a format from the file extension, ignoring case.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<MeshFormat> {
        let path = path.as_ref();
        let extension = match path.extension() {
            Some(ext) => ext.to_str().ok_or_else(|| {
                MeshError::UnsupportedFormat(format!(
                    "Failed to convert file extension to str: {}",
                    path.display()
                ))
            })?,
            None => {
                return Err(MeshError::UnsupportedFormat(format!(
                    "No extension on mesh file: {}",
                    path.display()
                )));
            }
        };

        MeshFormat::from_extension(extension).ok_or_else(|| {
            MeshError::UnsupportedFormat(format!(
                "Unknown file type \"{}\" for mesh file: {}",
                extension,
                path.display()
            ))
        })
    }

    pub fn from_extension(extension: &str) -> Option<MeshFormat> {
        MeshFormat::ALL
            .into_iter()
            .find(|format| extension.eq_ignore_ascii_case(format.extension()))
    }

    pub fn extension(&self) -> &'static str {
        match self {
            MeshFormat::Ply => "ply",
            MeshFormat::Stl => "stl",
            MeshFormat::Obj => "obj",
        }
    }
}
