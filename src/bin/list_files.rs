use anyhow::Context;
use meshutil::{list_files_with, print_files, ListOptions};

/// Print every file under a directory, relative to that directory.
///
/// Usage: list_files [--sorted] <root>
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let options = ListOptions::from_args(std::env::args().skip(1))?;
    let files = list_files_with(&options)
        .with_context(|| format!("Failed to list files under {}", options.root.display()))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    print_files(&mut out, &options.root, &files)?;
    Ok(())
}
