// sentinel-core/src/infrastructure/fs.rs

use crate::infrastructure::error::InfrastructureError;
use std::io::Write;
use std::path::Path;

/// Writes a rendered page atomically: a reader (or a static file server)
/// sees either the previous page or the new one, never half of it.
/// Missing parent directories are created.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    // Same directory, so the rename never crosses filesystems
    let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
    temp_file.write_all(content.as_ref())?;
    temp_file
        .persist(path)
        .map_err(|e| InfrastructureError::Io(e.error))?;

    Ok(())
}
