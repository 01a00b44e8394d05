use crate::utils::error::{EtlError, Result};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use zip::write::{FileOptions, ZipWriter};

/// Packages `dir` into a sibling `<dir>.zip`, replacing any previous archive.
///
/// Entry names keep the directory itself as their first component, so the
/// archive unpacks to a folder of the same name.
pub fn package_directory(dir: &Path) -> Result<PathBuf> {
    let dir_name = dir.file_name().ok_or_else(|| EtlError::ConfigError {
        message: format!("Cannot derive an archive name from '{}'", dir.display()),
    })?;
    let mut zip_name = dir_name.to_os_string();
    zip_name.push(".zip");
    let zip_path = dir.with_file_name(zip_name);

    tracing::info!("Creating {}...", zip_path.display());
    if zip_path.exists() {
        fs::remove_file(&zip_path)?;
    }

    let mut files = Vec::new();
    collect_files(dir, &mut files)?;
    files.sort();

    let mut zip = ZipWriter::new(File::create(&zip_path)?);
    tracing::debug!("Adding {} files to zip", files.len());
    for path in &files {
        let entry_name = entry_name(dir, dir_name, path);
        zip.start_file::<_, ()>(entry_name, FileOptions::default())?;
        io::copy(&mut File::open(path)?, &mut zip)?;
    }
    zip.finish()?;

    Ok(zip_path)
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(&path, files)?;
        } else {
            files.push(path);
        }
    }
    Ok(())
}

fn entry_name(dir: &Path, dir_name: &std::ffi::OsStr, path: &Path) -> String {
    let relative = path.strip_prefix(dir).unwrap_or(path);
    let mut name = dir_name.to_string_lossy().into_owned();
    for component in relative.components() {
        name.push('/');
        name.push_str(&component.as_os_str().to_string_lossy());
    }
    name
}
