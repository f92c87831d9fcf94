use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Root configuration, one section per task family.
///
/// Loaded once at startup from a `.legwork.json` and passed by reference
/// into the task types; nothing mutates it afterwards. Keys absent from
/// the file take the section defaults below, so a partial file behaves
/// like the full one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    #[serde(default)]
    pub manage: ManageConfig,
    #[serde(default)]
    pub docs: DocsConfig,
    #[serde(default)]
    pub sphinx: SphinxConfig,
    #[serde(default)]
    pub setup: SetupConfig,
}

/// Options for the Django management tasks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ManageConfig {
    /// Path to the project's `manage.py`. When unset, the tasks fall
    /// back to invoking `django-admin.py` directly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manage_py: Option<PathBuf>,
    /// Dotted settings module, e.g. `proj.settings`. Required by every
    /// management task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<String>,
    #[serde(default)]
    pub test: TestConfig,
    #[serde(default)]
    pub syncdb: SyncdbConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TestConfig {
    /// Settings module used for the `test` task only, replacing
    /// `manage.settings` for the duration of that call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SyncdbConfig {
    /// Fixtures loaded (in order) after a successful `syncdb`.
    #[serde(default)]
    pub fixtures: Vec<String>,
}

/// Options for the Sphinx make-driven docs tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DocsConfig {
    /// Sphinx folder, where the Makefile resides.
    #[serde(default = "default_docs_path")]
    pub path: PathBuf,
    /// Make targets issued by the `docs` task.
    #[serde(default = "default_docs_targets")]
    pub targets: Vec<String>,
    /// Build output folder, relative to `path`.
    #[serde(default = "default_build_rel")]
    pub build_rel: String,
    /// rsync destination for `rsync-docs`. `rsync_location` is accepted
    /// as an alias; older setups used both names for the same option.
    #[serde(default, alias = "rsync_location", skip_serializing_if = "Option::is_none")]
    pub upload_location: Option<String>,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            path: default_docs_path(),
            targets: default_docs_targets(),
            build_rel: default_build_rel(),
            upload_location: None,
        }
    }
}

/// Sphinx directory layout used only by `ghpages`, `showhtml`, `showpdf`
/// and `pdf`. Deliberately a separate namespace from [`DocsConfig`]; the
/// two sets of tasks resolved their paths independently upstream and
/// still do.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SphinxConfig {
    /// Root under which Sphinx works.
    #[serde(default = "default_docroot")]
    pub docroot: PathBuf,
    /// Directory under the docroot where build output lands.
    #[serde(default = "default_builddir")]
    pub builddir: String,
    /// Directory under the docroot holding the sources; empty means the
    /// docroot itself.
    #[serde(default)]
    pub sourcedir: String,
}

impl Default for SphinxConfig {
    fn default() -> Self {
        Self {
            docroot: default_docroot(),
            builddir: default_builddir(),
            sourcedir: String::new(),
        }
    }
}

/// Options for the packaging check tasks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SetupConfig {
    /// Distribution name installed into the throwaway virtualenv.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

fn default_docs_path() -> PathBuf {
    PathBuf::from("./docs")
}

fn default_docs_targets() -> Vec<String> {
    vec!["html".to_string()]
}

fn default_build_rel() -> String {
    "_build/html".to_string()
}

fn default_docroot() -> PathBuf {
    PathBuf::from("docs")
}

fn default_builddir() -> String {
    ".build".to_string()
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&contents)
            .map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Walk up from `start_path` looking for a config file.
    pub fn find_config_file(start_path: &Path) -> Option<PathBuf> {
        let mut current = start_path;

        loop {
            let config_path = current.join(".legwork.json");
            if config_path.exists() {
                return Some(config_path);
            }

            let config_path = current.join("legwork.json");
            if config_path.exists() {
                return Some(config_path);
            }

            current = current.parent()?;
        }
    }
}
