use std::io::Write;
use std::path::Path;

use super::error::InvoiceError;

/// Persist a finished byte stream at `path`.
///
/// The bytes go to a temporary file in the destination directory first,
/// which is renamed over `path` only after everything was written and
/// synced. On any failure the temporary file is removed and `path` is left
/// untouched.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), InvoiceError> {
    let output_error = |source: std::io::Error| InvoiceError::Output {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = tempfile::Builder::new()
        .prefix(".pdf-invoicer-")
        .suffix(".partial")
        .tempfile_in(dir)
        .map_err(output_error)?;
    file.write_all(bytes).map_err(output_error)?;
    file.as_file().sync_all().map_err(output_error)?;
    file.persist(path).map_err(|e| output_error(e.error))?;

    tracing::info!(path = %path.display(), bytes = bytes.len(), "document written");
    Ok(())
}
