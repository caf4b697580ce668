use crate::error::{MeshError, Result};
use crate::mesh_io::MeshBackend;
use std::path::PathBuf;

/// Where to read the mesh from and where to write it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConvertOptions {
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl ConvertOptions {
    pub const USAGE: &'static str = "usage: mesh_convert <source> <destination>";

    pub fn new<S: Into<PathBuf>, D: Into<PathBuf>>(source: S, destination: D) -> ConvertOptions {
        ConvertOptions {
            source: source.into(),
            destination: destination.into(),
        }
    }

    /// Build from the command line arguments after the program name:
    /// exactly a source path followed by a destination path.
    pub fn from_args<I, S>(args: I) -> Result<ConvertOptions>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        match args.as_slice() {
            [source, destination] => Ok(ConvertOptions::new(source, destination)),
            _ => Err(MeshError::InvalidArgument(format!(
                "{}, got {} argument(s)",
                ConvertOptions::USAGE,
                args.len()
            ))),
        }
    }

    /// The line printed once the destination has been written.
    pub fn confirmation(&self) -> String {
        format!(
            "Converted {} to {}",
            self.source.display(),
            self.destination.display()
        )
    }
}

/// Load `options.source` completely, then write it to `options.destination`.
///
/// Nothing is written unless the load succeeds. A failure part way through
/// the write can leave a partial destination file behind.
pub fn convert<B: MeshBackend>(backend: &B, options: &ConvertOptions) -> Result<()> {
    log::debug!(
        "Converting {} to {}",
        options.source.display(),
        options.destination.display()
    );
    let mesh = backend.load(&options.source)?;
    backend.save(&mesh, &options.destination)
}
