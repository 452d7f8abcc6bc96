use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

mod folder;
pub use folder::*;

pub const OUTPUT_EXTENSION: &str = "pgm";

/// One source image, labelled by the directory it sits in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClassImage {
    pub class_name: OsString,
    pub file_stem: OsString,
    pub path: PathBuf,
}

impl ClassImage {
    /// `<class>_<stem>.pgm`; the class prefix keeps stems unique once classes are flattened.
    /// Built from the raw names, so distinct non-UTF-8 inputs never share an output.
    pub fn output_file_name(&self) -> OsString {
        let mut name = self.class_name.clone();
        name.push("_");
        name.push(&self.file_stem);
        name.push(".");
        name.push(OUTPUT_EXTENSION);
        name
    }

    pub fn output_dir(&self, output_root: &Path) -> PathBuf {
        output_root.join(&self.class_name)
    }

    pub fn output_path(&self, output_root: &Path) -> PathBuf {
        self.output_dir(output_root).join(self.output_file_name())
    }
}
