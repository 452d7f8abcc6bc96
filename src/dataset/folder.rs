use std::{
    collections::BTreeMap,
    ffi::{OsStr, OsString},
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::{Error, Result};

use super::ClassImage;

/// A directory of class subdirectories, each holding images of one label:
/// `<root>/<class>/<stem>.<extension>`.
#[derive(Debug, Clone, Default)]
pub struct ImageFolder {
    root: PathBuf,
    images: Vec<ClassImage>,
}

fn read_dir_sorted(dir: &Path) -> Result<Vec<PathBuf>> {
    read_entries(std::fs::read_dir(dir), dir)
}

fn read_entries(entries: std::io::Result<std::fs::ReadDir>, dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = entries
        .map_err(|e| Error::io(dir, e))?
        .map(|entry| entry.map(|e| e.path()).map_err(|e| Error::io(dir, e)))
        .collect::<Result<Vec<_>>>()?;
    paths.sort();
    Ok(paths)
}

fn name_of(path: &Path, part: Option<&OsStr>) -> OsString {
    part.unwrap_or_else(|| path.as_os_str()).to_os_string()
}

impl ImageFolder {
    /// Collects every file matching `*/*.<extension>` under `root`.
    /// Only the second level is looked at; loose files in `root` and deeper
    /// directories are ignored. A root that does not exist holds no images.
    pub fn scan(root: &Path, extension: &str) -> Result<Self> {
        let mut images = Vec::new();

        let class_dirs = match std::fs::read_dir(root) {
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            entries => read_entries(entries, root)?,
        };

        for class_dir in class_dirs {
            if !class_dir.is_dir() {
                continue;
            }
            let class_name = name_of(&class_dir, class_dir.file_name());

            for path in read_dir_sorted(&class_dir)? {
                if !path.is_file() || path.extension() != Some(OsStr::new(extension)) {
                    continue;
                }
                images.push(ClassImage {
                    class_name: class_name.clone(),
                    file_stem: name_of(&path, path.file_stem()),
                    path,
                });
            }
        }

        Ok(Self { root: root.to_path_buf(), images })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn images(&self) -> &[ClassImage] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Class names that own at least one matching image, with their image counts.
    pub fn classes(&self) -> BTreeMap<&OsStr, usize> {
        let mut classes = BTreeMap::new();
        for image in &self.images {
            *classes.entry(image.class_name.as_os_str()).or_insert(0) += 1;
        }
        classes
    }
}

impl IntoIterator for ImageFolder {
    type Item = ClassImage;
    type IntoIter = std::vec::IntoIter<ClassImage>;

    fn into_iter(self) -> Self::IntoIter {
        self.images.into_iter()
    }
}
