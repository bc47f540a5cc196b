use prefab_core::CoreError;
use std::fs;
use std::path::Path;
use tracing::info;

/// Writes generated sources, leaving unchanged files untouched
pub struct CodeWriter;

impl CodeWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write `content` to `path` unless the file already holds exactly that
    /// content. Parent directories are created as needed.
    pub fn write_if_changed(&self, path: &Path, content: &str) -> Result<bool, CoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        if path.exists() {
            let existing = fs::read_to_string(path)?;
            if existing == content {
                return Ok(false);
            }
        }

        fs::write(path, content)?;
        info!(path = %path.display(), "wrote generated source");
        Ok(true)
    }
}

impl Default for CodeWriter {
    fn default() -> Self {
        Self::new()
    }
}
