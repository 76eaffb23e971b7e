use std::path::{Path, PathBuf};

use eyre::{Result, bail};

/// Trait for rendered sources that know where they belong on disk
pub trait GeneratedFile {
    /// Get the file path relative to the output directory
    fn relative_path(&self) -> PathBuf;

    /// Render the file content
    fn render(&self) -> Result<String>;

    /// Render and write the file below `dir`, returning the written path
    fn write_to(&self, dir: &Path, overwrite: Overwrite) -> Result<(PathBuf, WriteResult)> {
        let file = OutputFile::new(self.relative_path(), self.render()?).overwrite(overwrite);
        let result = file.write_to(dir)?;
        Ok((dir.join(file.path()), result))
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    // Always UTF-8, whatever the platform default.
    std::fs::write(path, content.as_bytes())?;
    Ok(())
}

/// Result of a write operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written
    Written,
    /// File was skipped (already exists)
    Skipped,
}

/// How to handle existing files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Overwrite {
    /// Always overwrite
    #[default]
    Always,
    /// Only create if file doesn't exist
    IfMissing,
}

/// A rendered file waiting to be written below an output directory
#[derive(Debug, Clone)]
pub struct OutputFile {
    path: PathBuf,
    content: String,
    overwrite: Overwrite,
}

impl OutputFile {
    /// Create a new file with a path relative to the output directory
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            overwrite: Overwrite::default(),
        }
    }

    /// Set how an existing file is handled
    pub fn overwrite(mut self, overwrite: Overwrite) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Get the relative file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the file content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Write the file below `dir`.
    ///
    /// `dir` may be missing (it is created) but must not be anything other
    /// than a directory.
    pub fn write_to(&self, dir: &Path) -> Result<WriteResult> {
        if dir.exists() && !dir.is_dir() {
            bail!("path {} exists but is not a directory", dir.display());
        }
        let target = dir.join(&self.path);
        match self.overwrite {
            Overwrite::IfMissing if target.exists() => Ok(WriteResult::Skipped),
            _ => {
                write_file(&target, &self.content)?;
                Ok(WriteResult::Written)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_write_file_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a").join("b").join("c").join("Taco.kt");

        write_file(&path, "nested").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "nested");
    }

    #[test]
    fn test_output_file_writes_below_dir() {
        let temp = TempDir::new().unwrap();
        let file = OutputFile::new("com/squareup/tacos/Taco.kt", "package com.squareup.tacos\n");

        let result = file.write_to(temp.path()).unwrap();

        assert_eq!(result, WriteResult::Written);
        let written = temp.path().join("com/squareup/tacos/Taco.kt");
        assert_eq!(
            fs::read_to_string(written).unwrap(),
            "package com.squareup.tacos\n"
        );
    }

    #[test]
    fn test_output_file_creates_missing_dir() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("generated");

        OutputFile::new("Taco.kt", "").write_to(&out).unwrap();

        assert!(out.join("Taco.kt").exists());
    }

    #[test]
    fn test_output_file_rejects_file_as_dir() {
        let temp = TempDir::new().unwrap();
        let not_a_dir = temp.path().join("file.txt");
        fs::write(&not_a_dir, "x").unwrap();

        let err = OutputFile::new("Taco.kt", "").write_to(&not_a_dir).unwrap_err();

        assert!(err.to_string().contains("exists but is not a directory"));
    }

    #[test]
    fn test_output_file_writes_utf8() {
        let temp = TempDir::new().unwrap();
        OutputFile::new("Taco.kt", "val piñata = \"🌮\"\n")
            .write_to(temp.path())
            .unwrap();

        let bytes = fs::read(temp.path().join("Taco.kt")).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "val piñata = \"🌮\"\n");
    }

    #[test]
    fn test_if_missing_skips_existing() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("Taco.kt"), "original").unwrap();

        let result = OutputFile::new("Taco.kt", "updated")
            .overwrite(Overwrite::IfMissing)
            .write_to(temp.path())
            .unwrap();

        assert_eq!(result, WriteResult::Skipped);
        assert_eq!(
            fs::read_to_string(temp.path().join("Taco.kt")).unwrap(),
            "original"
        );
    }

    #[test]
    fn test_always_overwrites_existing() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("Taco.kt"), "original").unwrap();

        OutputFile::new("Taco.kt", "updated")
            .write_to(temp.path())
            .unwrap();

        assert_eq!(
            fs::read_to_string(temp.path().join("Taco.kt")).unwrap(),
            "updated"
        );
    }
}
