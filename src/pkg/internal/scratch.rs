use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use uuid::Uuid;

use crate::prelude::Result;

pub async fn ensure_dir(dir: &Path) -> Result<()> {
    match fs::metadata(dir).await {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            fs::create_dir_all(dir).await?;
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Staged name keeps only the final path component of the client-supplied
/// filename and gets a uuid infix, so traversal attempts and concurrent
/// uploads with the same name cannot collide.
pub fn staged_name(original: &str) -> String {
    let safe = Path::new(original)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload");
    let stem = Path::new(safe)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("upload");
    let ext = Path::new(safe)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("bin");
    format!("{}-{}.{}", stem, Uuid::new_v4(), ext)
}

pub async fn stage(dir: &Path, original: &str, bytes: &[u8]) -> Result<PathBuf> {
    let path = dir.join(staged_name(original));
    fs::write(&path, bytes).await?;
    tracing::debug!("staged upload at {}", path.display());
    Ok(path)
}

pub async fn discard(path: &Path) -> Result<()> {
    fs::remove_file(path).await?;
    tracing::debug!("removed staged upload {}", path.display());
    Ok(())
}
