//! Source file representation used throughout the resolver and parser.

use std::{path::PathBuf, sync::Arc};

/// A source file with its path and contents.
///
/// Cheap to clone: path and code are both reference-counted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceFile {
    pub path: Arc<Vec<String>>,
    pub code: Arc<String>,
}

impl SourceFile {
    pub fn new(path: Vec<String>, code: String) -> Self {
        Self {
            path: path.into(),
            code: code.into(),
        }
    }

    pub fn path(&self) -> &Vec<String> {
        &self.path
    }

    pub fn code(&self) -> &String {
        self.code.as_ref()
    }

    fn display_path(&self) -> String {
        PathBuf::from_iter(self.path.iter()).to_string_lossy().into_owned()
    }
}

impl std::fmt::Display for SourceFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_path())
    }
}

impl From<SourceFile> for miette::NamedSource<String> {
    fn from(file: SourceFile) -> Self {
        miette::NamedSource::new(file.display_path(), file.code.to_string())
    }
}

impl From<&SourceFile> for miette::NamedSource<String> {
    fn from(file: &SourceFile) -> Self {
        miette::NamedSource::new(file.display_path(), file.code.to_string())
    }
}
