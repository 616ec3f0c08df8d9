use crate::config::Config;
use crate::db::log::audit_or_warn;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::export::fs_utils::ensure_writable;
use crate::ui::messages::{success, warning};
use crate::utils::path::expand_tilde;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::FileOptions;

pub struct BackupLogic;

impl BackupLogic {
    /// Copy the database to `dest_file`, optionally zipping it.
    /// Returns the path of the final artifact.
    pub fn backup(cfg: &Config, dest_file: &str, compress: bool, force: bool) -> AppResult<PathBuf> {
        let src = expand_tilde(&cfg.database);
        let dest = expand_tilde(dest_file);

        if !src.exists() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Database not found: {}", src.display()),
            )
            .into());
        }

        if let Some(parent) = dest.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let final_path = if compress {
            dest.with_extension("zip")
        } else {
            dest.clone()
        };
        ensure_writable(&final_path, force)?;

        // uncompressed snapshot; a scratch file when it only feeds the archive
        let snapshot = if compress {
            dest.with_extension("snapshot.tmp")
        } else {
            dest.clone()
        };
        if snapshot.exists() {
            fs::remove_file(&snapshot)?;
        }

        // VACUUM INTO gives a consistent copy even with other connections open
        let pool = DbPool::new(&src.to_string_lossy())?;
        pool.conn
            .execute("VACUUM INTO ?1", [snapshot.to_string_lossy().as_ref()])?;

        if compress {
            let entry = dest
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .ok_or_else(|| AppError::Other(format!("Invalid backup path: {}", dest.display())))?;
            compress_backup(&snapshot, &entry, &final_path)?;
            if let Err(e) = fs::remove_file(&snapshot) {
                warning(format!("Failed to remove temporary snapshot: {e}"));
            }
        }

        success(format!("Backup created: {}", final_path.display()));

        audit_or_warn(
            &pool.conn,
            "backup",
            &final_path.to_string_lossy(),
            if compress {
                "Backup created and compressed"
            } else {
                "Backup created"
            },
        );

        Ok(final_path)
    }
}

/// Write `snapshot` into a zip archive at `zip_path` under the name `entry`.
fn compress_backup(snapshot: &Path, entry: &str, zip_path: &Path) -> AppResult<()> {
    let file = fs::File::create(zip_path)?;
    let mut zip = ZipWriter::new(file);

    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    zip.start_file(entry, options).map_err(io::Error::other)?;

    let mut f = fs::File::open(snapshot)?;
    io::copy(&mut f, &mut zip)?;
    zip.finish().map_err(io::Error::other)?;

    Ok(())
}
