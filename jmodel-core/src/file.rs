use std::path::{Path, PathBuf};

use crate::Result;

/// A rendered compilation unit and the path it belongs at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    path: PathBuf,
    content: String,
}

impl SourceFile {
    /// Create a new file with a path relative to the output root.
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// The path relative to the output root.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Write the file below `base`, creating parent directories.
    pub fn write(&self, base: &Path) -> Result<PathBuf> {
        let path = base.join(&self.path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, &self.content)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let file = SourceFile::new("com/example/Foo.java", "class Foo {}\n");

        let written = file.write(dir.path()).unwrap();

        assert_eq!(written, dir.path().join("com/example/Foo.java"));
        assert_eq!(std::fs::read_to_string(written).unwrap(), "class Foo {}\n");
    }
}
