//! ZIP archive extraction.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::{MvnupError, Result};

/// Extracts a distribution archive into an install directory.
pub struct ZipExtractor;

impl ZipExtractor {
    /// Extract the archive's full contents into `dest_dir`, preserving the
    /// archive's internal directory structure. Returns the number of
    /// entries written.
    ///
    /// Entries that would escape the destination directory are rejected.
    pub fn extract(archive_path: &Path, dest_dir: &Path) -> Result<usize> {
        let file = File::open(archive_path)?;
        let reader = BufReader::new(file);
        let mut archive = zip::ZipArchive::new(reader)
            .map_err(|e| MvnupError::Extraction(format!("failed to open zip: {}", e)))?;

        std::fs::create_dir_all(dest_dir)?;

        let mut written = 0;
        for i in 0..archive.len() {
            let mut entry = archive
                .by_index(i)
                .map_err(|e| MvnupError::Extraction(format!("failed to read zip entry: {}", e)))?;

            // enclosed_name() yields None for entries with absolute paths
            // or `..` components.
            let relative = entry.enclosed_name().ok_or_else(|| {
                MvnupError::Extraction(format!(
                    "unsafe path in archive: {}",
                    entry.name()
                ))
            })?;

            if relative.as_os_str().is_empty() {
                continue;
            }

            let outpath = dest_dir.join(&relative);

            if entry.is_dir() {
                std::fs::create_dir_all(&outpath)?;
            } else {
                if let Some(parent) = outpath.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                let mut outfile = File::create(&outpath)?;
                std::io::copy(&mut entry, &mut outfile)?;

                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    if let Some(mode) = entry.unix_mode() {
                        std::fs::set_permissions(
                            &outpath,
                            std::fs::Permissions::from_mode(mode),
                        )?;
                    }
                }
            }

            written += 1;
        }

        Ok(written)
    }
}
