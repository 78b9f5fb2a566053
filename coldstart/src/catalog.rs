//! Options catalog (`options.json`)
//!
//! The template library ships a catalog of selectable languages (each with
//! its frameworks), target platforms, and the numeric priority table used to
//! prefix rendered rule files:
//!
//! ```json
//! {
//!   "languages": [
//!     {
//!       "id": "python", "name": "Python", "codeLanguage": "python",
//!       "default": true,
//!       "frameworks": [
//!         { "id": "django", "name": "Django", "buildTool": "pip", "default": true }
//!       ]
//!     }
//!   ],
//!   "platforms": [ { "id": "web", "name": "Web", "default": true } ],
//!   "rulePriorities": { "languages": 10, "frameworks": 20, "platforms": 30 }
//! }
//! ```
//!
//! Every field tolerates absence; priorities fall back to 10/20/30.

use std::fs;

use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::workspace::TemplateLibrary;

/// Platform id used when the catalog offers no platforms at all.
pub const FALLBACK_PLATFORM: &str = "web";

/// A selectable programming language and its frameworks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LanguageOption {
    /// Stable identifier (`"python"`).
    pub id: String,
    /// Display name (`"Python"`).
    pub name: String,
    /// Identifier rendered into `CODE_LANGUAGE`.
    pub code_language: String,
    /// Marks the pre-selected entry.
    pub default: bool,
    /// Frameworks available for this language.
    pub frameworks: Vec<FrameworkOption>,
}

/// A selectable framework belonging to one language.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FrameworkOption {
    /// Stable identifier (`"django"`).
    pub id: String,
    /// Display name (`"Django"`).
    pub name: String,
    /// Build tool rendered into `BUILD_TOOL`.
    pub build_tool: String,
    /// Marks the pre-selected entry.
    pub default: bool,
}

/// A selectable target platform.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlatformOption {
    /// Stable identifier (`"android"`).
    pub id: String,
    /// Display name (`"Android"`).
    pub name: String,
    /// Marks a pre-selected entry.
    pub default: bool,
}

/// Numeric priority table for rendered rule-file prefixes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RulePriorities {
    /// Prefix for language rules.
    pub languages: u32,
    /// Prefix for framework rules.
    pub frameworks: u32,
    /// Starting prefix for platform rules (increments per resolved platform).
    pub platforms: u32,
}

impl Default for RulePriorities {
    fn default() -> Self {
        Self {
            languages: 10,
            frameworks: 20,
            platforms: 30,
        }
    }
}

/// The full catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OptionsCatalog {
    /// Selectable languages.
    pub languages: Vec<LanguageOption>,
    /// Selectable platforms.
    pub platforms: Vec<PlatformOption>,
    /// Priority table.
    pub rule_priorities: RulePriorities,
}

impl OptionsCatalog {
    /// Loads the catalog from the library's `options.json`.
    ///
    /// # Errors
    ///
    /// [`Error::TemplateNotFound`] when the catalog file is absent (the
    /// library installation is incomplete), [`Error::Json`] when it does not
    /// parse, [`Error::Io`] on read failure.
    pub fn load(library: &TemplateLibrary) -> Result<Self> {
        let path = library.options_file();
        if !path.is_file() {
            return Err(Error::TemplateNotFound { path });
        }
        let raw = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        serde_json::from_str(&raw).map_err(|e| Error::json(&path, e))
    }

    /// Looks up a language by id.
    #[must_use]
    pub fn language(&self, id: &str) -> Option<&LanguageOption> {
        self.languages.iter().find(|l| l.id == id)
    }

    /// Looks up a platform by id.
    #[must_use]
    pub fn platform(&self, id: &str) -> Option<&PlatformOption> {
        self.platforms.iter().find(|p| p.id == id)
    }

    /// The language pre-selected by the catalog (first `default: true`, else
    /// the first entry).
    #[must_use]
    pub fn default_language(&self) -> Option<&LanguageOption> {
        self.languages
            .iter()
            .find(|l| l.default)
            .or_else(|| self.languages.first())
    }

    /// The platform id used when the user selects nothing.
    #[must_use]
    pub fn default_platform_id(&self) -> String {
        self.platforms
            .iter()
            .find(|p| p.default)
            .or_else(|| self.platforms.first())
            .map_or_else(|| FALLBACK_PLATFORM.to_string(), |p| p.id.clone())
    }

    /// Display name for a platform id, Title-cased when the catalog does not
    /// know the id.
    #[must_use]
    pub fn platform_display(&self, id: &str) -> String {
        self.platform(id)
            .map_or_else(|| id.to_case(Case::Title), |p| p.name.clone())
    }
}

impl LanguageOption {
    /// The framework pre-selected for this language.
    #[must_use]
    pub fn default_framework(&self) -> Option<&FrameworkOption> {
        self.frameworks
            .iter()
            .find(|f| f.default)
            .or_else(|| self.frameworks.first())
    }

    /// Looks up a framework by id.
    #[must_use]
    pub fn framework(&self, id: &str) -> Option<&FrameworkOption> {
        self.frameworks.iter().find(|f| f.id == id)
    }
}
