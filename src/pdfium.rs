//! Locating and binding the pdfium shared library.
//!
//! Resolution order:
//!
//! 1. `PDFIUM_LIB_PATH`: a library file, or a directory holding the
//!    platform's library (`libpdfium.so`, `libpdfium.dylib`, `pdfium.dll`).
//! 2. The current working directory.
//! 3. The system library search path.
//!
//! Nothing is downloaded.

use crate::error::AtsError;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable naming the pdfium library or its directory.
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Bind to pdfium using the resolution order above.
///
/// # Errors
/// [`AtsError::PdfiumBindingFailed`] with every attempted location when no
/// candidate binds.
pub fn bind_pdfium() -> Result<Pdfium, AtsError> {
    let mut attempts = Vec::new();

    if let Some(env_path) = std::env::var_os(PDFIUM_LIB_PATH_ENV) {
        let path = library_path(Path::new(&env_path));
        if path.exists() {
            match bind_pdfium_from_path(&path) {
                Ok(pdfium) => return Ok(pdfium),
                Err(e) => attempts.push(e.to_string()),
            }
        } else {
            warn!("{PDFIUM_LIB_PATH_ENV} '{}' not found; trying other locations", path.display());
            attempts.push(format!("{}: not found", path.display()));
        }
    }

    let local = Pdfium::pdfium_platform_library_name_at_path("./");
    if local.exists() {
        match bind_pdfium_from_path(&local) {
            Ok(pdfium) => return Ok(pdfium),
            Err(e) => attempts.push(e.to_string()),
        }
    }

    match Pdfium::bind_to_system_library() {
        Ok(bindings) => {
            debug!("pdfium: bound system library");
            Ok(Pdfium::new(bindings))
        }
        Err(e) => {
            attempts.push(format!("system library: {e}"));
            Err(AtsError::PdfiumBindingFailed(attempts.join("; ")))
        }
    }
}

/// Bind to the pdfium library at `path` (a file, or a directory holding the
/// platform's library).
pub fn bind_pdfium_from_path(path: &Path) -> Result<Pdfium, AtsError> {
    let path = library_path(path);
    Pdfium::bind_to_library(&path)
        .map(|bindings| {
            debug!("pdfium: bound {}", path.display());
            Pdfium::new(bindings)
        })
        .map_err(|e| AtsError::PdfiumBindingFailed(format!("{}: {e}", path.display())))
}

fn library_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        Pdfium::pdfium_platform_library_name_at_path(path)
    } else {
        path.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_resolves_to_platform_library_name() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = library_path(dir.path());
        assert_eq!(resolved.parent(), Some(dir.path()));
        assert!(resolved
            .file_name()
            .unwrap()
            .to_string_lossy()
            .contains("pdfium"));
    }

    #[test]
    fn file_path_is_kept() {
        let p = Path::new("/opt/lib/libpdfium.so");
        assert_eq!(library_path(p), p);
    }

    #[test]
    fn missing_library_is_binding_error() {
        let err = bind_pdfium_from_path(Path::new("/definitely/not/libpdfium.so")).unwrap_err();
        assert_eq!(err.kind(), "pdfium_binding");
    }
}
