//! Persisted project configuration (`.cold-start/project.json`)
//!
//! The long-lived record for a target project. Field names are an external
//! contract: other tooling reads this file, and the three-tier loading
//! fallback (current schema, legacy flat config, rule-file inference) exists
//! to pick up projects initialized by older tool versions.

use std::fs;

use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};

use super::staging::{FrameworkChoice, LanguageChoice, StagingConfig};
use super::now_rfc3339;
use crate::catalog::OptionsCatalog;
use crate::classify::{classify, RuleKind};
use crate::detect;
use crate::error::{Error, Result};
use crate::fsutil;
use crate::workspace::TargetProject;

/// Schema version written into fresh configs.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Tool tag written into `generatedBy`.
pub const GENERATED_BY: &str = "coldstart";

/// Sentinel id for fields the inference fallback could not resolve.
pub const UNKNOWN: &str = "unknown";

/// `project { … }` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectInfo {
    /// Project name.
    pub name: String,
    /// Free-form description.
    pub description: String,
}

/// A selected platform as persisted in `technology.platforms`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlatformRef {
    /// Platform id (`"web"`).
    pub id: String,
    /// Display name (`"Web"`).
    pub name: String,
}

/// `technology { … }` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Technology {
    /// Selected language.
    pub language: LanguageChoice,
    /// Selected framework.
    pub framework: FrameworkChoice,
    /// Selected platforms.
    pub platforms: Vec<PlatformRef>,
}

impl Technology {
    /// Builds the technology section from a completed staging config,
    /// resolving platform display names through the catalog.
    #[must_use]
    pub fn from_staging(cfg: &StagingConfig, catalog: &OptionsCatalog) -> Self {
        Self {
            language: cfg.language.clone(),
            framework: cfg.framework.clone(),
            platforms: cfg
                .platforms
                .iter()
                .map(|id| PlatformRef {
                    id: id.clone(),
                    name: catalog.platform_display(id),
                })
                .collect(),
        }
    }

    /// Builds the technology section from raw ids, resolving names through
    /// the catalog and Title-casing ids the catalog does not know.
    #[must_use]
    pub fn from_ids(
        catalog: &OptionsCatalog,
        language_id: &str,
        framework_id: &str,
        platform_ids: &[String],
    ) -> Self {
        let language = catalog.language(language_id).map_or_else(
            || language_fallback(language_id),
            |l| LanguageChoice {
                id: l.id.clone(),
                name: l.name.clone(),
                code_language: l.code_language.clone(),
            },
        );
        let framework = catalog
            .language(language_id)
            .and_then(|l| l.framework(framework_id))
            .map_or_else(
                || framework_fallback(framework_id),
                |f| FrameworkChoice {
                    id: f.id.clone(),
                    name: f.name.clone(),
                    build_tool: f.build_tool.clone(),
                },
            );
        Self {
            language,
            framework,
            platforms: platform_ids
                .iter()
                .map(|id| PlatformRef {
                    id: id.clone(),
                    name: catalog.platform_display(id),
                })
                .collect(),
        }
    }
}

/// One injected module in `modules.injected`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModuleRecord {
    /// Module id, unique within `modules.injected`.
    pub id: String,
    /// Module display name.
    pub name: String,
    /// Module type label (`feature`/`utility`/`service`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Injection timestamp (RFC 3339).
    pub injected_at: String,
    /// Rule files this injection produced.
    pub files: Vec<RuleRecord>,
}

/// `modules { … }` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Modules {
    /// Modules injected into this project.
    pub injected: Vec<ModuleRecord>,
    /// Reserved for catalog advertisement; written empty.
    pub available: Vec<serde_json::Value>,
}

/// One generated plan document in `files.plans`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlanRecord {
    /// File name.
    pub name: String,
    /// Path relative to the target root, forward slashes.
    pub path: String,
}

/// One generated rule document in `files.rules`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RuleRecord {
    /// File name, the dedup key for merges.
    pub name: String,
    /// Path relative to the target root, forward slashes.
    pub path: String,
    /// Classifier category.
    #[serde(rename = "type")]
    pub kind: RuleKind,
}

impl RuleRecord {
    /// Record for a rule file under `.cursor/rules/`, classified by name.
    #[must_use]
    pub fn for_rule(name: &str) -> Self {
        Self {
            name: name.to_string(),
            path: format!(".cursor/rules/{name}"),
            kind: classify(name),
        }
    }
}

impl PlanRecord {
    /// Record for a plan file under `.cursor/plans/`.
    #[must_use]
    pub fn for_plan(name: &str) -> Self {
        Self {
            name: name.to_string(),
            path: format!(".cursor/plans/{name}"),
        }
    }
}

/// `files { … }` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Files {
    /// Generated plan documents.
    pub plans: Vec<PlanRecord>,
    /// Generated rule documents.
    pub rules: Vec<RuleRecord>,
}

/// `config.logService { … }` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LogService {
    /// Logger class name rendered into templates.
    pub class: String,
    /// Log file path rendered into templates.
    pub file_path: String,
    /// Collection script path rendered into templates.
    pub collect_script: String,
}

impl Default for LogService {
    fn default() -> Self {
        Self {
            class: "Logger".to_string(),
            file_path: "logs/app.log".to_string(),
            collect_script: "scripts/collect_logs.sh".to_string(),
        }
    }
}

/// `config { … }` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToolConfig {
    /// Whether generated docs include the GitHub Actions section.
    #[serde(rename = "enableGitHubAction")]
    pub enable_github_action: bool,
    /// Logging conventions rendered into templates.
    pub log_service: LogService,
}

/// The persisted per-project record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Schema version.
    pub version: String,
    /// Creation timestamp (RFC 3339).
    pub generated_at: String,
    /// Tool tag.
    pub generated_by: String,
    /// Last mutation timestamp (RFC 3339), bumped on every save.
    pub last_updated: String,
    /// Project identity.
    pub project: ProjectInfo,
    /// Technology stack.
    pub technology: Technology,
    /// Injected/available modules.
    pub modules: Modules,
    /// Generated file records.
    pub files: Files,
    /// Tool options captured at generation time.
    pub config: ToolConfig,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        let now = now_rfc3339();
        Self {
            version: SCHEMA_VERSION.to_string(),
            generated_at: now.clone(),
            generated_by: GENERATED_BY.to_string(),
            last_updated: now,
            project: ProjectInfo::default(),
            technology: Technology::default(),
            modules: Modules::default(),
            files: Files::default(),
            config: ToolConfig::default(),
        }
    }
}

impl ProjectConfig {
    /// Fresh config with empty module and file sections.
    #[must_use]
    pub fn new(project: ProjectInfo, technology: Technology, config: ToolConfig) -> Self {
        Self {
            project,
            technology,
            config,
            ..Self::default()
        }
    }

    /// Loads the project config through the three-tier fallback: the
    /// current-schema file, then the legacy flat config (migrated), then
    /// best-effort inference from existing rule files.
    ///
    /// # Errors
    ///
    /// [`Error::ProjectNotInitialized`] when none of the three sources
    /// yields data; [`Error::Json`]/[`Error::Io`] when a present source is
    /// unreadable.
    pub fn load(target: &TargetProject) -> Result<Self> {
        let path = target.config_file();
        if path.is_file() {
            let raw = fsutil::read(&path)?;
            return serde_json::from_str(&raw).map_err(|e| Error::json(&path, e));
        }

        let legacy_path = target.legacy_config_file();
        if legacy_path.is_file() {
            let raw = fsutil::read(&legacy_path)?;
            let legacy: LegacyFlatConfig =
                serde_json::from_str(&raw).map_err(|e| Error::json(&legacy_path, e))?;
            return Ok(Self::migrate_legacy(&legacy, target));
        }

        let rule_files = fsutil::files_with_suffix(&target.rules_dir(), ".mdc")?;
        if !rule_files.is_empty() {
            return Self::infer_from_rules(target, &rule_files);
        }

        Err(Error::ProjectNotInitialized {
            path: target.root().to_path_buf(),
        })
    }

    /// Loads only the current-schema file; never migrates or infers.
    ///
    /// # Errors
    ///
    /// [`Error::ProjectNotInitialized`] when the file is absent;
    /// [`Error::Json`]/[`Error::Io`] when it is unreadable.
    pub fn load_strict(target: &TargetProject) -> Result<Self> {
        let path = target.config_file();
        if !path.is_file() {
            return Err(Error::ProjectNotInitialized {
                path: target.root().to_path_buf(),
            });
        }
        let raw = fsutil::read(&path)?;
        serde_json::from_str(&raw).map_err(|e| Error::json(&path, e))
    }

    /// Writes the config, bumping `lastUpdated` and creating `.cold-start/`
    /// as needed.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] on write failure.
    pub fn save(&mut self, target: &TargetProject) -> Result<()> {
        self.last_updated = now_rfc3339();
        let dir = target.state_dir();
        fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;
        let path = target.config_file();
        let mut body = serde_json::to_string_pretty(self).map_err(|e| Error::json(&path, e))?;
        body.push('\n');
        fsutil::write(&path, &body)
    }

    /// Replaces the record with a matching id or appends a new one; records
    /// the operation does not touch keep their relative order.
    pub fn upsert_module(&mut self, record: ModuleRecord) {
        if let Some(existing) = self
            .modules
            .injected
            .iter_mut()
            .find(|m| m.id == record.id)
        {
            *existing = record;
        } else {
            self.modules.injected.push(record);
        }
    }

    /// Appends rule records whose file name is not already present; existing
    /// records are never altered or removed.
    pub fn merge_rule_files(&mut self, new_files: Vec<RuleRecord>) {
        for record in new_files {
            if !self.files.rules.iter().any(|r| r.name == record.name) {
                self.files.rules.push(record);
            }
        }
    }

    /// Replaces `files.rules` wholesale with a freshly computed set.
    pub fn replace_rule_files(&mut self, rules: Vec<RuleRecord>) {
        self.files.rules = rules;
    }

    /// Lifts a legacy flat config into the current schema. Missing fields
    /// fall back to defaults; the project name falls back to the target
    /// directory name.
    fn migrate_legacy(legacy: &LegacyFlatConfig, target: &TargetProject) -> Self {
        let language_id = non_empty_or(&legacy.language, UNKNOWN);
        let framework_id = non_empty_or(&legacy.framework, UNKNOWN);
        let technology = Technology {
            language: LanguageChoice {
                id: language_id.clone(),
                name: non_empty_or(&legacy.language_name, &language_id.to_case(Case::Title)),
                code_language: non_empty_or(&legacy.code_language, &language_id),
            },
            framework: FrameworkChoice {
                id: framework_id.clone(),
                name: framework_id.to_case(Case::Title),
                build_tool: legacy.build_tool.clone(),
            },
            platforms: legacy
                .platforms
                .iter()
                .map(|id| PlatformRef {
                    id: id.clone(),
                    name: id.to_case(Case::Title),
                })
                .collect(),
        };
        Self {
            project: ProjectInfo {
                name: non_empty_or(&legacy.project_name, &dir_name(target)),
                description: legacy.project_description.clone(),
            },
            technology,
            config: ToolConfig {
                enable_github_action: legacy.enable_github_action,
                log_service: LogService::default(),
            },
            ..Self::default()
        }
    }

    /// Best-effort reconstruction from rule-file names and contents.
    /// Unresolved fields get `"unknown"` sentinels, and keyword hits in
    /// prose can mislead it.
    fn infer_from_rules(target: &TargetProject, rule_files: &[std::path::PathBuf]) -> Result<Self> {
        let stack = detect::scan_rules_dir(&target.rules_dir())?;

        let language_id = stack.language.unwrap_or_else(|| UNKNOWN.to_string());
        let framework_id = stack.framework.unwrap_or_else(|| UNKNOWN.to_string());
        let technology = Technology {
            language: language_fallback(&language_id),
            framework: framework_fallback(&framework_id),
            platforms: stack
                .platforms
                .iter()
                .map(|id| PlatformRef {
                    id: id.clone(),
                    name: id.to_case(Case::Title),
                })
                .collect(),
        };

        let rules = rule_files
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .map(RuleRecord::for_rule)
            .collect();

        let mut cfg = Self {
            project: ProjectInfo {
                name: stack.project_name.unwrap_or_else(|| dir_name(target)),
                description: String::new(),
            },
            technology,
            ..Self::default()
        };
        cfg.files.rules = rules;
        Ok(cfg)
    }
}

/// Language fields derived from an id alone.
fn language_fallback(id: &str) -> LanguageChoice {
    LanguageChoice {
        id: id.to_string(),
        name: id.to_case(Case::Title),
        code_language: id.to_string(),
    }
}

/// Framework fields derived from an id alone.
fn framework_fallback(id: &str) -> FrameworkChoice {
    FrameworkChoice {
        id: id.to_string(),
        name: id.to_case(Case::Title),
        build_tool: String::new(),
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

fn dir_name(target: &TargetProject) -> String {
    target
        .root()
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(UNKNOWN)
        .to_string()
}

/// The flat single-file schema written by older tool versions
/// (`.cold-start-config.json`). Only ever read, never written.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LegacyFlatConfig {
    project_name: String,
    language: String,
    language_name: String,
    code_language: String,
    framework: String,
    build_tool: String,
    platforms: Vec<String>,
    #[serde(rename = "enableGitHubAction")]
    enable_github_action: bool,
    project_description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> ModuleRecord {
        ModuleRecord {
            id: id.to_string(),
            name: id.to_case(Case::Title),
            kind: "feature".to_string(),
            injected_at: now_rfc3339(),
            files: Vec::new(),
        }
    }

    fn rule(name: &str) -> RuleRecord {
        RuleRecord::for_rule(name)
    }

    #[test]
    fn upsert_appends_then_replaces_in_place() {
        let mut cfg = ProjectConfig::default();
        cfg.upsert_module(record("logging"));
        cfg.upsert_module(record("network-module"));
        assert_eq!(cfg.modules.injected.len(), 2);

        let mut updated = record("logging");
        updated.kind = "utility".to_string();
        cfg.upsert_module(updated);

        assert_eq!(cfg.modules.injected.len(), 2);
        assert_eq!(cfg.modules.injected[0].id, "logging");
        assert_eq!(cfg.modules.injected[0].kind, "utility");
        assert_eq!(cfg.modules.injected[1].id, "network-module");
    }

    #[test]
    fn merge_keeps_existing_records_and_appends_new_names() {
        let mut cfg = ProjectConfig::default();
        cfg.files.rules = vec![rule("00-core.mdc"), rule("10-python.mdc")];

        let mut incoming_b = rule("10-python.mdc");
        incoming_b.path = "somewhere/else.mdc".to_string();
        cfg.merge_rule_files(vec![incoming_b, rule("20-django.mdc")]);

        let names: Vec<&str> = cfg.files.rules.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["00-core.mdc", "10-python.mdc", "20-django.mdc"]);
        // The pre-existing record for 10-python.mdc is untouched.
        assert_eq!(cfg.files.rules[1].path, ".cursor/rules/10-python.mdc");
    }

    #[test]
    fn replace_discards_prior_rules() {
        let mut cfg = ProjectConfig::default();
        cfg.files.rules = vec![rule("00-core.mdc"), rule("10-python.mdc")];
        cfg.replace_rule_files(vec![rule("10-rust.mdc"), rule("30-web.mdc")]);
        let names: Vec<&str> = cfg.files.rules.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["10-rust.mdc", "30-web.mdc"]);
    }

    #[test]
    fn legacy_flat_config_migrates_to_nested_schema() {
        let dir = tempfile::tempdir().unwrap();
        let target = TargetProject::at(dir.path());
        std::fs::write(
            target.legacy_config_file(),
            r#"{"projectName": "Foo", "language": "dart", "framework": "flutter"}"#,
        )
        .unwrap();

        let cfg = ProjectConfig::load(&target).unwrap();
        assert_eq!(cfg.project.name, "Foo");
        assert_eq!(cfg.technology.language.id, "dart");
        assert_eq!(cfg.technology.language.name, "Dart");
        assert_eq!(cfg.technology.framework.id, "flutter");
        assert!(cfg.modules.injected.is_empty());
        assert!(cfg.files.rules.is_empty());
    }

    #[test]
    fn inference_scans_rule_files_when_no_config_exists() {
        let dir = tempfile::tempdir().unwrap();
        let target = TargetProject::at(dir.path());
        std::fs::create_dir_all(target.rules_dir()).unwrap();
        std::fs::write(
            target.rules_dir().join("10-python.mdc"),
            "# Python conventions\nUse type hints.\n",
        )
        .unwrap();
        std::fs::write(
            target.rules_dir().join("20-django.mdc"),
            "# Django conventions\n",
        )
        .unwrap();

        let cfg = ProjectConfig::load(&target).unwrap();
        assert_eq!(cfg.technology.language.id, "python");
        assert_eq!(cfg.technology.framework.id, "django");
        assert_eq!(cfg.files.rules.len(), 2);
        assert_eq!(cfg.files.rules[0].kind, RuleKind::Language);
    }

    #[test]
    fn empty_target_is_not_initialized() {
        let dir = tempfile::tempdir().unwrap();
        let target = TargetProject::at(dir.path());
        let err = ProjectConfig::load(&target).unwrap_err();
        assert!(matches!(err, Error::ProjectNotInitialized { .. }));
    }

    #[test]
    fn strict_load_ignores_legacy_sources() {
        let dir = tempfile::tempdir().unwrap();
        let target = TargetProject::at(dir.path());
        std::fs::write(
            target.legacy_config_file(),
            r#"{"projectName": "Foo", "language": "dart"}"#,
        )
        .unwrap();

        assert!(matches!(
            ProjectConfig::load_strict(&target),
            Err(Error::ProjectNotInitialized { .. })
        ));
    }

    #[test]
    fn save_bumps_last_updated_and_preserves_field_names() {
        let dir = tempfile::tempdir().unwrap();
        let target = TargetProject::at(dir.path());

        let mut cfg = ProjectConfig::default();
        cfg.project.name = "Demo".to_string();
        cfg.last_updated = "2001-01-01T00:00:00Z".to_string();
        cfg.save(&target).unwrap();
        assert_ne!(cfg.last_updated, "2001-01-01T00:00:00Z");

        let raw = std::fs::read_to_string(target.config_file()).unwrap();
        for key in [
            "\"version\"",
            "\"generatedAt\"",
            "\"generatedBy\"",
            "\"lastUpdated\"",
            "\"technology\"",
            "\"enableGitHubAction\"",
            "\"logService\"",
            "\"collectScript\"",
            "\"injected\"",
            "\"available\"",
        ] {
            assert!(raw.contains(key), "missing {key} in {raw}");
        }
    }

    #[test]
    fn round_trips_through_current_schema() {
        let dir = tempfile::tempdir().unwrap();
        let target = TargetProject::at(dir.path());

        let mut cfg = ProjectConfig::default();
        cfg.project.name = "Demo".to_string();
        cfg.technology.language = language_fallback("python");
        cfg.files.rules.push(rule("10-python.mdc"));
        cfg.upsert_module(record("network-module"));
        cfg.save(&target).unwrap();

        let loaded = ProjectConfig::load(&target).unwrap();
        assert_eq!(loaded.project.name, "Demo");
        assert_eq!(loaded.technology.language.id, "python");
        assert_eq!(loaded.modules.injected.len(), 1);
        assert_eq!(loaded.files.rules[0].kind, RuleKind::Language);
        assert_eq!(loaded.generated_by, GENERATED_BY);
    }
}
