use crate::error::{MeshError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// What to walk and how to order the result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListOptions {
    pub root: PathBuf,
    /// Sort entries by file name within each directory.
    /// Otherwise the order is whatever the filesystem hands back.
    pub sorted: bool,
}

impl ListOptions {
    pub const USAGE: &'static str = "usage: list_files [--sorted] <root>";

    pub fn new<P: Into<PathBuf>>(root: P) -> ListOptions {
        ListOptions {
            root: root.into(),
            sorted: false,
        }
    }

    pub fn sorted(mut self, sorted: bool) -> ListOptions {
        self.sorted = sorted;
        self
    }

    /// Build from the command line arguments after the program name:
    /// an optional `--sorted` flag and exactly one root directory.
    pub fn from_args<I, S>(args: I) -> Result<ListOptions>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut root = None;
        let mut sorted = false;
        for arg in args {
            let arg: String = arg.into();
            match arg.as_str() {
                "--sorted" => sorted = true,
                flag if flag.starts_with("--") => {
                    return Err(MeshError::InvalidArgument(format!(
                        "{}, unknown flag {}",
                        ListOptions::USAGE,
                        flag
                    )));
                }
                _ if root.is_some() => {
                    return Err(MeshError::InvalidArgument(format!(
                        "{}, more than one root directory given: {}",
                        ListOptions::USAGE,
                        arg
                    )));
                }
                _ => root = Some(PathBuf::from(&arg)),
            }
        }
        let root =
            root.ok_or_else(|| MeshError::InvalidArgument(ListOptions::USAGE.to_string()))?;
        Ok(ListOptions::new(root).sorted(sorted))
    }
}

/// Every regular file under `root`, in traversal order.
pub fn list_files<P: AsRef<Path>>(root: P) -> Result<Vec<PathBuf>> {
    list_files_with(&ListOptions::new(root.as_ref()))
}

/// Every regular file under `options.root`, at any depth.
///
/// The returned paths are the root joined with the path below it.
/// Directories are never included. Symbolic links are not descended into,
/// but a link that resolves to a regular file is listed.
pub fn list_files_with(options: &ListOptions) -> Result<Vec<PathBuf>> {
    let root = options.root.as_path();
    let metadata = std::fs::metadata(root).map_err(|error| MeshError::from_io(error, root))?;
    if !metadata.is_dir() {
        return Err(MeshError::InvalidArgument(format!(
            "not a directory: {}",
            root.display()
        )));
    }

    let mut walker = WalkDir::new(root).follow_links(false);
    if options.sorted {
        walker = walker.sort_by_file_name();
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|error| walk_error(error, root))?;
        if is_regular_file(&entry) {
            files.push(entry.into_path());
        }
    }
    log::debug!("Found {} files under {}", files.len(), root.display());
    Ok(files)
}

fn is_regular_file(entry: &walkdir::DirEntry) -> bool {
    let file_type = entry.file_type();
    if file_type.is_file() {
        return true;
    }
    file_type.is_symlink() && entry.path().is_file()
}

fn walk_error(error: walkdir::Error, root: &Path) -> MeshError {
    let path = error
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.to_path_buf());
    MeshError::from_io(std::io::Error::from(error), path)
}

/// `path` with the leading `root` components removed.
/// A path that is not under `root` comes back unchanged.
pub fn relative_to<'a>(root: &Path, path: &'a Path) -> &'a Path {
    path.strip_prefix(root).unwrap_or(path)
}

/// Write each file relative to `root`, one per line, in the given order.
pub fn print_files<W: Write>(out: &mut W, root: &Path, files: &[PathBuf]) -> Result<()> {
    for file in files {
        writeln!(out, "{}", relative_to(root, file).display())?;
    }
    out.flush()?;
    Ok(())
}
