use anyhow::Context;
use meshutil::{convert, ConvertOptions, TriMeshBackend};

/// Convert a mesh between ply, stl and obj.
/// The output format follows the destination extension.
///
/// Usage: mesh_convert <source> <destination>
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let options = ConvertOptions::from_args(std::env::args().skip(1))?;
    convert(&TriMeshBackend, &options).with_context(|| {
        format!(
            "Failed to convert {} to {}",
            options.source.display(),
            options.destination.display()
        )
    })?;

    println!("{}", options.confirmation());
    Ok(())
}
