//! `update-rules`: regenerate the technology rule set for a project.

use std::path::PathBuf;

use similar::{ChangeTag, TextDiff};

use crate::catalog::OptionsCatalog;
use crate::classify::RuleKind;
use crate::config::{now_display, ProjectConfig, RuleRecord};
use crate::error::Result;
use crate::fsutil;
use crate::render::{Placeholders, Renderer};
use crate::resolve;
use crate::workspace::{TargetProject, Workspace};

/// Whether an output file existed before this pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStatus {
    /// The file did not exist and was written fresh.
    Created,
    /// The file existed and was overwritten; counts are changed lines
    /// against the previous content (both zero when nothing changed).
    Updated {
        /// Lines present now that were not before.
        added: usize,
        /// Lines present before that are gone now.
        removed: usize,
    },
}

/// One regenerated rule file.
#[derive(Debug)]
pub struct RuleUpdate {
    /// Output file name under `.cursor/rules/`.
    pub file_name: String,
    /// Resolution category.
    pub kind: RuleKind,
    /// Created fresh or overwritten.
    pub status: UpdateStatus,
}

/// What `update-rules` wrote.
#[derive(Debug)]
pub struct UpdateOutcome {
    /// Per-file results, in resolution order.
    pub updates: Vec<RuleUpdate>,
    /// The updated `project.json`.
    pub config_file: PathBuf,
}

/// Recomputes the full template set the way `process` does, but from the
/// persisted `technology` section, and overwrites each output under the
/// target's rules directory. `files.rules` is replaced wholesale with the
/// freshly computed set.
///
/// Unlike `inject`, this stage never migrates or infers: the target must
/// already carry a current-schema `project.json`.
///
/// # Errors
///
/// [`crate::Error::ProjectNotInitialized`] when `project.json` is absent,
/// plus I/O and render errors.
pub fn update_rules(
    workspace: &Workspace,
    catalog: &OptionsCatalog,
    target: &TargetProject,
) -> Result<UpdateOutcome> {
    let library = workspace.library();
    let mut project = ProjectConfig::load_strict(target)?;

    let platform_ids: Vec<String> = project
        .technology
        .platforms
        .iter()
        .map(|p| p.id.clone())
        .collect();
    let resolved = resolve::full_rule_set(
        &library,
        &project.technology.language.id,
        &project.technology.framework.id,
        &platform_ids,
        catalog.rule_priorities,
    )?;

    let rules_dir = target.rules_dir();
    fsutil::create_dir_all(&rules_dir)?;
    let renderer = Renderer::new();
    let values = Placeholders::from_project(&project, &now_display()).into_value();

    let mut updates = Vec::new();
    let mut records = Vec::new();
    for rule in &resolved {
        let rendered = renderer.render_file(&rule.template_path, &values)?;
        let dest = rules_dir.join(&rule.file_name);
        let status = if dest.is_file() {
            line_change_counts(&fsutil::read(&dest)?, &rendered)
        } else {
            UpdateStatus::Created
        };
        fsutil::write(&dest, &rendered)?;
        records.push(RuleRecord::for_rule(&rule.file_name));
        updates.push(RuleUpdate {
            file_name: rule.file_name.clone(),
            kind: rule.kind,
            status,
        });
    }

    project.replace_rule_files(records);
    project.save(target)?;

    Ok(UpdateOutcome {
        updates,
        config_file: target.config_file(),
    })
}

fn line_change_counts(previous: &str, current: &str) -> UpdateStatus {
    let diff = TextDiff::from_lines(previous, current);
    let mut added = 0;
    let mut removed = 0;
    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => added += 1,
            ChangeTag::Delete => removed += 1,
            ChangeTag::Equal => {}
        }
    }
    UpdateStatus::Updated { added, removed }
}
