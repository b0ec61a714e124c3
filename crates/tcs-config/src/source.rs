//! Where configuration documents are read from.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Read access to configuration documents.
pub trait DocumentSource {
    /// Read the document at `path`.
    fn read(&self, path: &Path) -> io::Result<String>;

    /// File names (not paths) directly inside `dir`, sorted
    /// lexicographically. A missing directory lists as empty.
    fn list(&self, dir: &Path) -> io::Result<Vec<String>>;
}

/// Documents on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSource;

impl DocumentSource for FsSource {
    fn read(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn list(&self, dir: &Path) -> io::Result<Vec<String>> {
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
        {
            let entry = entry.map_err(io::Error::from)?;
            if entry.file_type().is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Documents held in memory, keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: BTreeMap<PathBuf, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }
}

impl DocumentSource for MemorySource {
    fn read(&self, path: &Path) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            )
        })
    }

    fn list(&self, dir: &Path) -> io::Result<Vec<String>> {
        let mut names: Vec<String> = self
            .files
            .keys()
            .filter(|path| path.parent() == Some(dir))
            .filter_map(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect();
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_source_lists_direct_children_sorted() {
        let source = MemorySource::new()
            .with_file("/sw/crm/b.xml", "<group name=\"crm1\"/>")
            .with_file("/sw/crm/a.xml", "<group name=\"crm1\"/>")
            .with_file("/sw/crm/nested/c.xml", "")
            .with_file("/sw/config/d.xml", "");

        assert_eq!(source.list(Path::new("/sw/crm")).unwrap(), ["a.xml", "b.xml"]);
        assert!(source.list(Path::new("/sw/missing")).unwrap().is_empty());
        assert!(source.read(Path::new("/sw/crm/a.xml")).is_ok());
        assert_eq!(
            source.read(Path::new("/sw/crm/z.xml")).unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
    }

    #[test]
    fn test_fs_source_lists_files_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.xml"), "<config/>").unwrap();
        std::fs::write(dir.path().join("a.xml"), "<config/>").unwrap();
        std::fs::write(dir.path().join(".hidden.xml"), "<config/>").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub").join("c.xml"), "<config/>").unwrap();

        let names = FsSource.list(dir.path()).unwrap();
        assert_eq!(names, [".hidden.xml", "a.xml", "b.xml"]);
        assert_eq!(FsSource.read(&dir.path().join("a.xml")).unwrap(), "<config/>");
    }

    #[test]
    fn test_fs_source_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FsSource.list(&dir.path().join("nope")).unwrap().is_empty());
    }
}
