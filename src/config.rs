//! Build configuration, read from a JSON file and overridden from the
//! command line.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    diagnostics::{CONFIG_ERROR, Diagnostic},
    module_graph::{ModuleId, is_valid_module_name},
    syntax::token_type::is_keyword,
};

/// Name of the config file picked up from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "lunac.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Entry file, relative to `src_dir` (or a path inside it).
    pub entry: PathBuf,
    pub src_dir: PathBuf,
    pub dst_dir: PathBuf,
    pub output_name: String,
    pub extension: String,
    pub compiletime_namespace: String,
    pub compiletime_marker: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            entry: PathBuf::from("war3map.lua"),
            src_dir: PathBuf::from("src"),
            dst_dir: PathBuf::from("build"),
            output_name: "war3map.lua".to_string(),
            extension: "lua".to_string(),
            compiletime_namespace: "compiletime".to_string(),
            compiletime_marker: "compiletime".to_string(),
        }
    }
}

impl BuildConfig {
    pub fn load(path: &Path) -> Result<Self, Box<Diagnostic>> {
        let text = fs::read_to_string(path).map_err(|err| {
            config_error(format!("cannot read `{}`: {err}", path.display()))
        })?;
        Self::from_json(&text, &path.display().to_string())
    }

    /// Parses a config document; `origin` names it in error messages.
    pub fn from_json(text: &str, origin: &str) -> Result<Self, Box<Diagnostic>> {
        serde_json::from_str(text).map_err(|err| config_error(format!("`{origin}`: {err}")))
    }

    /// Module identifier of the entry file.
    pub fn entry_module(&self) -> Result<ModuleId, Box<Diagnostic>> {
        ModuleId::from_entry_path(&self.entry, &self.src_dir, &self.extension).ok_or_else(|| {
            config_error(format!(
                "entry `{}` does not name a module inside `{}`",
                self.entry.display(),
                self.src_dir.display()
            ))
        })
    }

    pub fn output_path(&self) -> PathBuf {
        self.dst_dir.join(&self.output_name)
    }

    /// Checks the fields serde cannot: names must be usable as Lua names
    /// and module paths.
    pub fn validate(&self) -> Result<(), Vec<Diagnostic>> {
        let mut problems = Vec::new();

        let marker = &self.compiletime_marker;
        if marker.contains('.') || !is_valid_module_name(marker) || is_keyword(marker) {
            problems.push(format!("`compiletime_marker` must be a Lua name, got `{marker}`"));
        }
        if !is_valid_module_name(&self.compiletime_namespace) {
            problems.push(format!(
                "`compiletime_namespace` must be a module name, got `{}`",
                self.compiletime_namespace
            ));
        }
        if self.extension.is_empty() || self.extension.contains(['.', '/', '\\']) {
            problems.push(format!(
                "`extension` must be a bare file extension, got `{}`",
                self.extension
            ));
        }
        if self.output_name.is_empty() || self.output_name.contains(['/', '\\']) {
            problems.push(format!(
                "`output_name` must be a file name, got `{}`",
                self.output_name
            ));
        }
        if let Err(diag) = self.entry_module() {
            return Err(problems
                .into_iter()
                .map(|problem| *config_error(problem))
                .chain(std::iter::once(*diag))
                .collect());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems.into_iter().map(|problem| *config_error(problem)).collect())
        }
    }
}

fn config_error(message: String) -> Box<Diagnostic> {
    Box::new(Diagnostic::make_global_error(&CONFIG_ERROR, &[&message]))
}
