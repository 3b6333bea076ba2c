//! Module Store: maps module identifiers to files under the source root.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    diagnostics::{Diagnostic, MODULE_READ_FAILED, position::Span},
    module_graph::ModuleId,
    syntax::{parse_source, program::Program},
};

/// A module's source text as read from disk.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub id: ModuleId,
    pub path: PathBuf,
    /// Path relative to the source root, used in messages and chunk names.
    pub display_path: String,
    pub source: String,
}

#[derive(Debug, Clone)]
pub struct ModuleStore {
    root: PathBuf,
    extension: String,
}

impl ModuleStore {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn path_for(&self, id: &ModuleId) -> PathBuf {
        self.root.join(id.relative_path(&self.extension))
    }

    pub fn display_path(&self, id: &ModuleId) -> String {
        id.relative_path(&self.extension)
            .to_string_lossy()
            .replace('\\', "/")
    }

    pub fn contains(&self, id: &ModuleId) -> bool {
        self.path_for(id).is_file()
    }

    pub fn load(&self, id: &ModuleId) -> Result<SourceFile, Box<Diagnostic>> {
        let path = self.path_for(id);
        let display_path = self.display_path(id);
        let source = fs::read_to_string(&path).map_err(|err| {
            Box::new(Diagnostic::make_error(
                &MODULE_READ_FAILED,
                &[&display_path, &err.to_string()],
                display_path.clone(),
                Span::default(),
            ))
        })?;

        Ok(SourceFile {
            id: id.clone(),
            path,
            display_path,
            source,
        })
    }

    /// Parses a loaded file; syntax errors come back with the file attached.
    pub fn parse(&self, file: &SourceFile) -> Result<Program, Vec<Diagnostic>> {
        parse_source(&file.source).map_err(|mut diags| {
            for diag in &mut diags {
                diag.set_file(file.display_path.clone());
            }
            diags
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_dotted_names_to_nested_files() {
        let store = ModuleStore::new("/project/src", "lua");
        let id = ModuleId::parse("util.strings").unwrap();
        assert_eq!(
            store.path_for(&id),
            PathBuf::from("/project/src/util/strings.lua")
        );
        assert_eq!(store.display_path(&id), "util/strings.lua");
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let store = ModuleStore::new("/definitely/not/here", "lua");
        let id = ModuleId::parse("nope").unwrap();
        assert!(!store.contains(&id));
        let err = store.load(&id).unwrap_err();
        assert_eq!(err.code(), Some("E010"));
        assert_eq!(err.file(), Some("nope.lua"));
    }
}
