// Linewright - platform/fs.rs
//
// Filesystem helpers for the batch runner: opening inputs, choosing output
// paths and writing results. No knowledge of the transform itself.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Open an input file for reading.
///
/// Directories are rejected up front with `InvalidInput` so callers get a
/// clear message instead of a platform-specific read error later.
pub fn open_input(path: &Path) -> io::Result<File> {
    if path.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("'{}' is a directory", path.display()),
        ));
    }
    File::open(path)
}

/// Path the output for `input` is written to inside `output_dir`.
///
/// Only the file name of `input` is kept, so inputs from different
/// directories with the same name collide; the batch runner checks for that.
pub fn output_path(input: &Path, output_dir: &Path) -> io::Result<PathBuf> {
    let name = input.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("'{}' has no file name", input.display()),
        )
    })?;
    Ok(output_dir.join(name))
}

/// Write `text` to `path`, creating parent directories as needed.
///
/// Writes to a sibling temp file first and renames it into place, so a
/// failed run never leaves a half-written output behind.
pub fn write_output(path: &Path, text: &str) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".partial");
    let tmp = path.with_file_name(tmp_name);

    let result = File::create(&tmp)
        .and_then(|mut f| f.write_all(text.as_bytes()).and_then(|()| f.sync_all()))
        .and_then(|()| std::fs::rename(&tmp, path));

    if result.is_err() {
        let _ = std::fs::remove_file(&tmp);
    }
    result
}
