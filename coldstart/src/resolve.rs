//! Template resolution
//!
//! Locates template artifacts for a technology selection and computes their
//! rendered output names. Resolution is pure directory probing: it renders
//! nothing and treats a missing optional template as "skip", not an error.
//!
//! Naming conventions, in probe order for languages/frameworks/platforms:
//! `"<defaultPriority>-<id>.mdc.template"` then `"<id>.mdc.template"`. The
//! probe prefix always uses the built-in defaults (10/20/30); the *output*
//! name `"<priority>-<id>.mdc"` uses the catalog's configured priorities.

use std::path::{Path, PathBuf};

use crate::catalog::RulePriorities;
use crate::classify::RuleKind;
use crate::error::Result;
use crate::fsutil;
use crate::workspace::TemplateLibrary;

/// Suffix of rule template files.
pub const TEMPLATE_SUFFIX: &str = ".mdc.template";

const PROBE_LANGUAGE: u32 = 10;
const PROBE_FRAMEWORK: u32 = 20;
const PROBE_PLATFORM: u32 = 30;

/// A template scheduled for rendering, with its computed output name.
#[derive(Debug, Clone)]
pub struct ResolvedRule {
    /// Template file in the library.
    pub template_path: PathBuf,
    /// Output file name (`"10-python.mdc"`).
    pub file_name: String,
    /// Category this resolution belongs to.
    pub kind: RuleKind,
}

/// Every common template, in name order. Output names keep the template's
/// own base name; common templates ship their ordering prefix themselves.
///
/// # Errors
///
/// [`crate::Error::Io`] when the common directory cannot be listed.
pub fn common_rules(library: &TemplateLibrary) -> Result<Vec<ResolvedRule>> {
    let dir = library.rules_dir("common");
    let mut rules = Vec::new();
    for path in fsutil::files_with_suffix(&dir, TEMPLATE_SUFFIX)? {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let file_name = name.strip_suffix(".template").unwrap_or(name).to_string();
        rules.push(ResolvedRule {
            template_path: path.clone(),
            file_name,
            kind: RuleKind::Common,
        });
    }
    Ok(rules)
}

/// Language, framework, and platform templates for one technology
/// selection. Identifiers without a template are skipped; each selected
/// platform that does resolve bumps the platform priority counter so
/// multiple platform files never collide.
pub fn technology_rules(
    library: &TemplateLibrary,
    language_id: &str,
    framework_id: &str,
    platform_ids: &[String],
    priorities: RulePriorities,
) -> Vec<ResolvedRule> {
    let mut rules = Vec::new();

    if let Some(path) = probe(&library.rules_dir("languages"), PROBE_LANGUAGE, language_id) {
        rules.push(ResolvedRule {
            template_path: path,
            file_name: format!("{}-{language_id}.mdc", priorities.languages),
            kind: RuleKind::Language,
        });
    }

    if let Some(path) = probe(&library.rules_dir("frameworks"), PROBE_FRAMEWORK, framework_id) {
        rules.push(ResolvedRule {
            template_path: path,
            file_name: format!("{}-{framework_id}.mdc", priorities.frameworks),
            kind: RuleKind::Framework,
        });
    }

    let mut platform_priority = priorities.platforms;
    for id in platform_ids {
        if let Some(path) = probe(&library.rules_dir("platforms"), PROBE_PLATFORM, id) {
            rules.push(ResolvedRule {
                template_path: path,
                file_name: format!("{platform_priority}-{id}.mdc"),
                kind: RuleKind::Platform,
            });
            platform_priority += 1;
        }
    }

    rules
}

/// The complete rule set for a technology selection: common templates plus
/// the technology-specific ones. Used by `process` (from the staging
/// config) and `update-rules` (from the persisted technology section).
///
/// # Errors
///
/// [`crate::Error::Io`] when the common directory cannot be listed.
pub fn full_rule_set(
    library: &TemplateLibrary,
    language_id: &str,
    framework_id: &str,
    platform_ids: &[String],
    priorities: RulePriorities,
) -> Result<Vec<ResolvedRule>> {
    let mut rules = common_rules(library)?;
    rules.extend(technology_rules(
        library,
        language_id,
        framework_id,
        platform_ids,
        priorities,
    ));
    Ok(rules)
}

/// Every template inside a module directory, named with the module's
/// declared priority.
///
/// # Errors
///
/// [`crate::Error::Io`] when the module directory cannot be listed.
pub fn module_rules(module_dir: &Path, priority: u32) -> Result<Vec<ResolvedRule>> {
    let mut rules = Vec::new();
    for path in fsutil::files_with_suffix(module_dir, TEMPLATE_SUFFIX)? {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(stem) = name.strip_suffix(TEMPLATE_SUFFIX) else {
            continue;
        };
        rules.push(ResolvedRule {
            template_path: path.clone(),
            file_name: format!("{priority}-{stem}.mdc"),
            kind: RuleKind::Module,
        });
    }
    Ok(rules)
}

/// Probes the two naming conventions; the prefixed form wins.
fn probe(dir: &Path, default_priority: u32, id: &str) -> Option<PathBuf> {
    if id.is_empty() {
        return None;
    }
    let prefixed = dir.join(format!("{default_priority}-{id}{TEMPLATE_SUFFIX}"));
    if prefixed.is_file() {
        return Some(prefixed);
    }
    let bare = dir.join(format!("{id}{TEMPLATE_SUFFIX}"));
    bare.is_file().then_some(bare)
}
