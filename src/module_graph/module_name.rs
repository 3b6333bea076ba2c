use std::{
    fmt,
    path::{Component, Path, PathBuf},
};

use serde::Serialize;

/// A dotted module identifier such as `util.strings`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ModuleId(String);

impl ModuleId {
    /// Validates `name`: dot-separated Lua names, no empty segments.
    pub fn parse(name: &str) -> Option<Self> {
        is_valid_module_name(name).then(|| ModuleId(name.to_string()))
    }

    /// Maps an entry file path (`war3map.lua`, `maps/main.lua`, or an
    /// absolute path inside `source_root`) to its module identifier.
    pub fn from_entry_path(entry: &Path, source_root: &Path, extension: &str) -> Option<Self> {
        let relative = if entry.is_absolute() {
            entry.strip_prefix(source_root).ok()?
        } else {
            entry.strip_prefix(source_root).unwrap_or(entry)
        };

        let mut segments = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => segments.push(part.to_str()?.to_string()),
                Component::CurDir => {}
                _ => return None,
            }
        }

        let last = segments.pop()?;
        let stem = last
            .strip_suffix(&format!(".{extension}"))
            .unwrap_or(&last)
            .to_string();
        segments.push(stem);
        Self::parse(&segments.join("."))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `a.b.c` → `a/b/c.<extension>`
    pub fn relative_path(&self, extension: &str) -> PathBuf {
        let mut path: PathBuf = self.0.split('.').collect();
        path.set_extension(extension);
        path
    }

    /// True when this module is `namespace` itself or lives under it.
    pub fn is_in_namespace(&self, namespace: &str) -> bool {
        !namespace.is_empty()
            && (self.0 == namespace
                || self
                    .0
                    .strip_prefix(namespace)
                    .is_some_and(|rest| rest.starts_with('.')))
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn is_valid_module_name(name: &str) -> bool {
    !name.is_empty() && name.split('.').all(is_valid_module_segment)
}

fn is_valid_module_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}
