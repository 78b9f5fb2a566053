//! Staging configuration (`.cold-start-staging/config.json`)

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::workspace::Staging;

/// Selected language as persisted in staging and project configs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LanguageChoice {
    /// Catalog id (`"python"`).
    pub id: String,
    /// Display name (`"Python"`).
    pub name: String,
    /// Value rendered into `CODE_LANGUAGE`.
    pub code_language: String,
}

/// Selected framework as persisted in staging and project configs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FrameworkChoice {
    /// Catalog id (`"django"`).
    pub id: String,
    /// Display name (`"Django"`).
    pub name: String,
    /// Value rendered into `BUILD_TOOL`.
    pub build_tool: String,
}

/// In-progress initialization answers, one per staging area.
///
/// Created by `init` from the library's blank `config.template.json`, then
/// read by `process` and `export`. `created_at` is captured once at `init`
/// and feeds the `GENERATION_DATE` placeholder, which keeps repeated
/// `process` runs byte-identical.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StagingConfig {
    /// Project name entered by the user.
    pub project_name: String,
    /// Selected language.
    pub language: LanguageChoice,
    /// Selected framework.
    pub framework: FrameworkChoice,
    /// Selected platform ids, in selection order.
    pub platforms: Vec<String>,
    /// Whether generated docs should include the GitHub Actions section.
    #[serde(rename = "enableGitHubAction")]
    pub enable_github_action: bool,
    /// Optional free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_description: Option<String>,
    /// Timestamp captured at `init` (`%Y-%m-%d %H:%M:%S`).
    pub created_at: String,
}

impl StagingConfig {
    /// Loads the staging config.
    ///
    /// # Errors
    ///
    /// [`Error::ConfigMissing`] when no staging config exists (run `init`
    /// first), [`Error::Json`]/[`Error::Io`] on broken files.
    pub fn load(staging: &Staging) -> Result<Self> {
        let path = staging.config_file();
        if !path.is_file() {
            return Err(Error::ConfigMissing {
                path,
                hint: "run `init` to create a staging config".to_string(),
            });
        }
        let raw = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        serde_json::from_str(&raw).map_err(|e| Error::json(&path, e))
    }

    /// Parses the library's blank config template.
    ///
    /// # Errors
    ///
    /// [`Error::TemplateNotFound`] when the template is absent (the library
    /// installation is incomplete), [`Error::Json`]/[`Error::Io`] otherwise.
    pub fn from_template(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::TemplateNotFound {
                path: path.to_path_buf(),
            });
        }
        let raw = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        serde_json::from_str(&raw).map_err(|e| Error::json(path, e))
    }

    /// Writes the staging config, creating the staging directory if needed.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] on write failure.
    pub fn save(&self, staging: &Staging) -> Result<()> {
        fs::create_dir_all(staging.dir()).map_err(|e| Error::io(staging.dir(), e))?;
        let path = staging.config_file();
        let mut body = serde_json::to_string_pretty(self)
            .map_err(|e| Error::json(&path, e))?;
        body.push('\n');
        fs::write(&path, body).map_err(|e| Error::io(&path, e))
    }
}
