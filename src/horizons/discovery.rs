use camino::{Utf8Path, Utf8PathBuf};
use log::debug;

use crate::ephemcheck_errors::EphemCheckError;

/// List the reference files of a directory
///
/// Only regular files directly under `dir` whose extension is exactly `extension` are kept.
/// The listing is sorted so repeated runs visit the files in the same order.
///
/// Arguments
/// ---------
/// * `dir`: the directory holding the reference ephemerides
/// * `extension`: the file extension to match, without the dot (e.g. `"txt"`)
///
/// Return
/// ------
/// * the sorted list of matching paths, or an I/O error if the directory cannot be listed
pub fn discover_reference_files(
    dir: &Utf8Path,
    extension: &str,
) -> Result<Vec<Utf8PathBuf>, EphemCheckError> {
    if !dir.is_dir() {
        return Err(EphemCheckError::Utf8PathError(format!(
            "{dir} is not a directory"
        )));
    }

    let mut paths = Vec::new();
    for entry in dir.read_dir_utf8()? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_file() && path.extension() == Some(extension) {
            paths.push(path.to_path_buf());
        }
    }
    paths.sort();

    debug!("{} reference files found in {dir}", paths.len());
    Ok(paths)
}
