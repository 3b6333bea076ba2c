#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use lunac::config::BuildConfig;

/// A throwaway project tree under the system temp directory.
pub struct Project {
    pub root: PathBuf,
}

impl Project {
    pub fn new(name: &str) -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let root = std::env::temp_dir().join(format!(
            "lunac_{}_{}_{}",
            name,
            std::process::id(),
            nanos
        ));
        fs::create_dir_all(root.join("src")).unwrap();
        Self { root }
    }

    /// Writes `source` to `src/<relative>`.
    pub fn file(self, relative: &str, source: &str) -> Self {
        let path = self.src().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, source).unwrap();
        self
    }

    pub fn src(&self) -> PathBuf {
        self.root.join("src")
    }

    pub fn dst(&self) -> PathBuf {
        self.root.join("build")
    }

    pub fn config(&self) -> BuildConfig {
        BuildConfig {
            src_dir: self.src(),
            dst_dir: self.dst(),
            ..BuildConfig::default()
        }
    }

    pub fn output(&self) -> PathBuf {
        self.dst().join("war3map.lua")
    }

    pub fn read_output(&self) -> String {
        fs::read_to_string(self.output()).unwrap()
    }
}
