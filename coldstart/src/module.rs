//! Injectable module definitions
//!
//! A module is a directory under `templates/modules/<id>/` holding a
//! `module.config.json` manifest next to one or more `.mdc.template`
//! files. The manifest declares display metadata, an ordering priority,
//! dependencies on other modules, and the parameters its templates expect.

use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fsutil;
use crate::workspace::TemplateLibrary;

/// Manifest file name inside a module directory.
pub const MODULE_CONFIG_FILE: &str = "module.config.json";

const DEFAULT_MODULE_PRIORITY: u32 = 40;

/// Broad module category, used as the `type` of the injected record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleType {
    /// User-facing capability (networking, auth).
    #[default]
    Feature,
    /// Supporting helpers with no feature surface of their own.
    Utility,
    /// Long-running or external-facing service integration.
    Service,
}

impl ModuleType {
    /// Stable identifier as persisted in `project.json`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Feature => "feature",
            Self::Utility => "utility",
            Self::Service => "service",
        }
    }

    /// All selectable types, in prompt order.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Feature, Self::Utility, Self::Service]
    }
}

impl fmt::Display for ModuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Other modules this one builds on. Advisory only; injection does not
/// verify that required modules are already present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleDependencies {
    /// Module ids this module expects to be present.
    pub required: Vec<String>,
    /// Module ids this module can take advantage of.
    pub optional: Vec<String>,
}

/// One template parameter declared by a module manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterSpec {
    /// What the parameter controls.
    pub description: String,
    /// Whether injection fails when no value is available.
    pub required: bool,
    /// Value used when the caller supplies none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Question shown when collecting the value interactively.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

/// Parsed `module.config.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModuleDefinition {
    /// Stable identifier, also the module's directory name.
    pub module_id: String,
    /// Display name.
    pub module_name: String,
    /// One-line description shown in listings and prompts.
    pub module_description: String,
    /// Broad category persisted as the injected record's `type`.
    pub module_type: ModuleType,
    /// Filename prefix for this module's rendered rule files.
    pub priority: u32,
    /// Modules this one builds on.
    pub dependencies: ModuleDependencies,
    /// Parameter declarations in prompt order.
    pub parameters: IndexMap<String, ParameterSpec>,
    /// Language ids this module was written for; empty means any.
    pub compatible_languages: Vec<String>,
    /// Framework ids this module was written for; empty means any.
    pub compatible_frameworks: Vec<String>,
}

impl Default for ModuleDefinition {
    fn default() -> Self {
        Self {
            module_id: String::new(),
            module_name: String::new(),
            module_description: String::new(),
            module_type: ModuleType::default(),
            priority: DEFAULT_MODULE_PRIORITY,
            dependencies: ModuleDependencies::default(),
            parameters: IndexMap::new(),
            compatible_languages: Vec::new(),
            compatible_frameworks: Vec::new(),
        }
    }
}

impl ModuleDefinition {
    /// Warnings for a module injected into a stack it does not declare
    /// support for. Empty declarations are treated as universal.
    #[must_use]
    pub fn compatibility_warnings(&self, language_id: &str, framework_id: &str) -> Vec<String> {
        let mut warnings = Vec::new();
        if !self.compatible_languages.is_empty()
            && !self.compatible_languages.iter().any(|l| l == language_id)
        {
            warnings.push(format!(
                "module `{}` lists compatible languages {:?}, project uses `{language_id}`",
                self.module_id, self.compatible_languages
            ));
        }
        if !self.compatible_frameworks.is_empty()
            && !self.compatible_frameworks.iter().any(|f| f == framework_id)
        {
            warnings.push(format!(
                "module `{}` lists compatible frameworks {:?}, project uses `{framework_id}`",
                self.module_id, self.compatible_frameworks
            ));
        }
        warnings
    }
}

/// Loads the manifest from one module directory.
///
/// # Errors
///
/// [`Error::TemplateNotFound`] when the directory has no manifest, and
/// [`Error::Io`] / [`Error::Json`] when it cannot be read or parsed.
pub fn load_definition(module_dir: &Path) -> Result<ModuleDefinition> {
    let path = module_dir.join(MODULE_CONFIG_FILE);
    if !path.is_file() {
        return Err(Error::TemplateNotFound { path });
    }
    let raw = fsutil::read(&path)?;
    serde_json::from_str(&raw).map_err(|e| Error::json(path, e))
}

/// Every installable module in the library, sorted by directory name.
/// Directories without a parseable manifest are skipped.
///
/// # Errors
///
/// [`Error::Io`] when the modules directory exists but cannot be listed.
pub fn list_modules(library: &TemplateLibrary) -> Result<Vec<ModuleDefinition>> {
    let root = library.modules_dir();
    if !root.is_dir() {
        return Ok(Vec::new());
    }
    let mut dirs: Vec<PathBuf> = std::fs::read_dir(&root)
        .map_err(|e| Error::io(&root, e))?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();

    let mut modules = Vec::new();
    for dir in dirs {
        if let Ok(definition) = load_definition(&dir) {
            modules.push(definition);
        }
    }
    Ok(modules)
}

/// Final parameter values for rendering, in declaration order.
///
/// A caller-provided value wins, then the declared default. A required
/// parameter with neither is an error; an optional one is left out and
/// its placeholder renders empty.
///
/// # Errors
///
/// [`Error::MissingRequiredParameter`] for a required parameter with no
/// value and no default.
pub fn collect_parameters(
    definition: &ModuleDefinition,
    provided: &IndexMap<String, String>,
) -> Result<IndexMap<String, String>> {
    let mut values = IndexMap::new();
    for (name, spec) in &definition.parameters {
        let supplied = provided.get(name).filter(|v| !v.is_empty());
        match (supplied, &spec.default) {
            (Some(value), _) => {
                values.insert(name.clone(), value.clone());
            }
            (None, Some(default)) => {
                values.insert(name.clone(), default.clone());
            }
            (None, None) if spec.required => {
                return Err(Error::MissingRequiredParameter { name: name.clone() });
            }
            (None, None) => {}
        }
    }
    Ok(values)
}

/// Creates a new module in the library: the manifest plus a starter
/// template named after the module id. Returns the module directory.
///
/// # Errors
///
/// [`Error::Io`] when the directory or its files cannot be written.
pub fn write_module(library: &TemplateLibrary, definition: &ModuleDefinition) -> Result<PathBuf> {
    let dir = library.module_dir(&definition.module_id);
    fsutil::create_dir_all(&dir)?;

    let manifest = dir.join(MODULE_CONFIG_FILE);
    let mut raw = serde_json::to_string_pretty(definition).map_err(|e| Error::json(&manifest, e))?;
    raw.push('\n');
    fsutil::write(&manifest, &raw)?;

    let template = dir.join(format!("{}.mdc.template", definition.module_id));
    fsutil::write(&template, &starter_template(definition))?;
    Ok(dir)
}

fn starter_template(definition: &ModuleDefinition) -> String {
    let mut parameter_lines = String::new();
    for name in definition.parameters.keys() {
        parameter_lines.push_str(&format!("- `{name}`: {{{{{name}}}}}\n"));
    }
    if parameter_lines.is_empty() {
        parameter_lines.push_str("- none\n");
    }
    format!(
        "---\ndescription: {{{{MODULE_DESCRIPTION}}}}\nglobs: {{{{MODULE_PATH}}}}\nalwaysApply: false\n---\n\n\
         # {{{{MODULE_NAME}}}} Module ({{{{PROJECT_NAME}}}})\n\n\
         ## Overview\n\n{{{{MODULE_DESCRIPTION}}}}\n\n\
         ## Conventions\n\n\
         - Implement {} code for this module in `{{{{CODE_LANGUAGE}}}}`.\n\
         - Keep module files under the paths matched by `{{{{MODULE_PATH}}}}`.\n\n\
         ## Parameters\n\n{parameter_lines}",
        definition.module_type
    )
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn library(dir: &Path) -> TemplateLibrary {
        TemplateLibrary::at(dir)
    }

    fn write_manifest(dir: &Path, raw: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(MODULE_CONFIG_FILE), raw).unwrap();
    }

    #[test]
    fn parses_a_full_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let module_dir = dir.path().join("network-module");
        write_manifest(
            &module_dir,
            r#"{
  "moduleId": "network-module",
  "moduleName": "Network Layer",
  "moduleDescription": "HTTP client conventions",
  "moduleType": "service",
  "priority": 41,
  "dependencies": { "required": ["logging"], "optional": ["cache"] },
  "parameters": {
    "BASE_URL": { "description": "API origin", "required": true },
    "TIMEOUT_SECONDS": { "description": "request timeout", "default": "30" }
  },
  "compatibleLanguages": ["dart"],
  "compatibleFrameworks": ["flutter"]
}"#,
        );

        let definition = load_definition(&module_dir).unwrap();
        assert_eq!(definition.module_id, "network-module");
        assert_eq!(definition.module_type, ModuleType::Service);
        assert_eq!(definition.priority, 41);
        assert_eq!(definition.dependencies.required, vec!["logging"]);
        let names: Vec<&String> = definition.parameters.keys().collect();
        assert_eq!(names, vec!["BASE_URL", "TIMEOUT_SECONDS"]);
        assert!(definition.parameters["BASE_URL"].required);
    }

    #[test]
    fn minimal_manifest_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let module_dir = dir.path().join("logging");
        write_manifest(&module_dir, r#"{ "moduleId": "logging" }"#);

        let definition = load_definition(&module_dir).unwrap();
        assert_eq!(definition.module_type, ModuleType::Feature);
        assert_eq!(definition.priority, 40);
        assert!(definition.parameters.is_empty());
        assert!(definition.compatible_languages.is_empty());
    }

    #[test]
    fn missing_manifest_is_template_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_definition(&dir.path().join("ghost")).unwrap_err();
        assert!(matches!(err, Error::TemplateNotFound { .. }));
    }

    #[test]
    fn listing_skips_directories_with_broken_manifests() {
        let dir = tempfile::tempdir().unwrap();
        let lib = library(dir.path());
        write_manifest(
            &lib.module_dir("auth"),
            r#"{ "moduleId": "auth", "moduleName": "Auth" }"#,
        );
        write_manifest(&lib.module_dir("broken"), "{ not json");
        fs::create_dir_all(lib.module_dir("empty")).unwrap();

        let modules = list_modules(&lib).unwrap();
        let ids: Vec<&str> = modules.iter().map(|m| m.module_id.as_str()).collect();
        assert_eq!(ids, vec!["auth"]);
    }

    #[test]
    fn parameter_collection_applies_defaults_and_flags_missing_required() {
        let mut definition = ModuleDefinition::default();
        definition.parameters.insert(
            "BASE_URL".to_string(),
            ParameterSpec {
                required: true,
                ..ParameterSpec::default()
            },
        );
        definition.parameters.insert(
            "TIMEOUT_SECONDS".to_string(),
            ParameterSpec {
                default: Some("30".to_string()),
                ..ParameterSpec::default()
            },
        );
        definition
            .parameters
            .insert("NOTE".to_string(), ParameterSpec::default());

        let err = collect_parameters(&definition, &IndexMap::new()).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingRequiredParameter { ref name } if name == "BASE_URL"
        ));

        let mut provided = IndexMap::new();
        provided.insert("BASE_URL".to_string(), "https://api.example.com".to_string());
        let values = collect_parameters(&definition, &provided).unwrap();
        assert_eq!(values["BASE_URL"], "https://api.example.com");
        assert_eq!(values["TIMEOUT_SECONDS"], "30");
        assert!(!values.contains_key("NOTE"));
    }

    #[test]
    fn compatibility_warnings_only_fire_on_declared_mismatches() {
        let definition = ModuleDefinition {
            module_id: "network-module".to_string(),
            compatible_languages: vec!["dart".to_string()],
            ..ModuleDefinition::default()
        };
        assert!(definition.compatibility_warnings("dart", "flutter").is_empty());
        let warnings = definition.compatibility_warnings("python", "django");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("network-module"));
    }

    #[test]
    fn write_module_creates_manifest_and_starter_template() {
        let dir = tempfile::tempdir().unwrap();
        let lib = library(dir.path());
        let mut definition = ModuleDefinition {
            module_id: "cache".to_string(),
            module_name: "Cache".to_string(),
            module_description: "Caching conventions".to_string(),
            ..ModuleDefinition::default()
        };
        definition
            .parameters
            .insert("TTL_SECONDS".to_string(), ParameterSpec::default());

        let module_dir = write_module(&lib, &definition).unwrap();
        let reloaded = load_definition(&module_dir).unwrap();
        assert_eq!(reloaded.module_name, "Cache");

        let starter = fs::read_to_string(module_dir.join("cache.mdc.template")).unwrap();
        assert!(starter.contains("{{MODULE_NAME}}"));
        assert!(starter.contains("{{TTL_SECONDS}}"));
    }
}
