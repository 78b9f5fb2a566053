//! `extract-rules`: pull generalizable rules back into the library.

use std::path::{Path, PathBuf};

use chrono::Local;

use crate::classify::{classify, RuleKind};
use crate::config::{ProjectConfig, UNKNOWN};
use crate::detect::CORE_RULE_MARKER;
use crate::error::Result;
use crate::fsutil;
use crate::render::has_unrendered_placeholder;
use crate::workspace::{TargetProject, Workspace};

use super::file_name_of;

/// The split of a target's rule files into extraction candidates and the
/// project-specific remainder.
#[derive(Debug)]
pub struct ExtractCandidates {
    /// Recorded project name the split keyed on.
    pub project_name: String,
    /// Generalizable files offered for extraction, in name order.
    pub extractable: Vec<String>,
    /// Files kept out of the offer: they carry the project's name, an
    /// unrendered placeholder, or the core-identity marker.
    pub project_specific: Vec<String>,
}

/// One file copied into the library's extract area.
#[derive(Debug)]
pub struct ExtractedRule {
    /// Source file name under `.cursor/rules/`.
    pub source: String,
    /// Destination under the library's `extract/rules/` tree.
    pub destination: PathBuf,
    /// Classifier category that chose the destination directory.
    pub kind: RuleKind,
}

/// What `extract-rules` wrote.
#[derive(Debug)]
pub struct ExtractOutcome {
    /// Files copied into the extract area, in selection order.
    pub extracted: Vec<ExtractedRule>,
    /// The integration log, when at least one file was extracted.
    pub log_file: Option<PathBuf>,
}

/// Splits the target's rule files into extractable candidates and
/// project-specific files. The split is heuristic: it errs toward keeping
/// files out of the offer rather than extracting project-bound content.
///
/// # Errors
///
/// Project-load and I/O errors.
pub fn extract_candidates(target: &TargetProject) -> Result<ExtractCandidates> {
    let project = ProjectConfig::load(target)?;
    let project_name = project.project.name;

    let mut extractable = Vec::new();
    let mut project_specific = Vec::new();
    for path in fsutil::files_with_suffix(&target.rules_dir(), ".mdc")? {
        let name = file_name_of(&path);
        let content = fsutil::read(&path)?;
        if is_project_specific(&content, &project_name) {
            project_specific.push(name);
        } else {
            extractable.push(name);
        }
    }

    Ok(ExtractCandidates {
        project_name,
        extractable,
        project_specific,
    })
}

/// Copies the selected rule files into the library's
/// `extract/rules/<category>/` area as Markdown with a provenance header,
/// then appends to the integration log under today's date heading. Selected
/// names that no longer exist on disk are skipped.
///
/// # Errors
///
/// Project-load and I/O errors.
pub fn extract_rules(
    workspace: &Workspace,
    target: &TargetProject,
    selection: &[String],
) -> Result<ExtractOutcome> {
    let library = workspace.library();
    let project = ProjectConfig::load(target)?;
    let project_name = &project.project.name;
    let date = Local::now().format("%Y-%m-%d").to_string();
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    let mut extracted = Vec::new();
    let mut log_entries = Vec::new();
    for name in selection {
        let source = target.rules_dir().join(name);
        if !source.is_file() {
            continue;
        }
        let content = fsutil::read(&source)?;
        let kind = classify(name);
        let category = category_dir(kind);
        let dir = library.extract_rules_dir(category);
        fsutil::create_dir_all(&dir)?;

        let out_name = format!("{}.md", name.strip_suffix(".mdc").unwrap_or(name));
        let destination = dir.join(&out_name);
        let body = format!(
            "> Extracted from project `{project_name}` at {timestamp}.\n\
             > Source: `.cursor/rules/{name}`\n\n---\n\n{content}"
        );
        fsutil::write(&destination, &body)?;

        log_entries.push(format!(
            "- `{name}` from `{project_name}` -> `rules/{category}/{out_name}`"
        ));
        extracted.push(ExtractedRule {
            source: name.clone(),
            destination,
            kind,
        });
    }

    let log_file = if log_entries.is_empty() {
        None
    } else {
        let path = library.integration_log();
        append_log_entries(&path, &date, &log_entries)?;
        Some(path)
    };

    Ok(ExtractOutcome {
        extracted,
        log_file,
    })
}

fn is_project_specific(content: &str, project_name: &str) -> bool {
    let name_hit =
        !project_name.is_empty() && project_name != UNKNOWN && content.contains(project_name);
    name_hit || has_unrendered_placeholder(content) || content.contains(CORE_RULE_MARKER)
}

/// Extract-area directory per classifier category.
const fn category_dir(kind: RuleKind) -> &'static str {
    match kind {
        RuleKind::Common => "common",
        RuleKind::Language => "languages",
        RuleKind::Framework => "frameworks",
        RuleKind::Platform => "platforms",
        RuleKind::Module => "modules",
        RuleKind::Unknown => "uncategorized",
    }
}

/// Inserts entries under today's heading, or prepends a fresh dated block
/// above the previous log when today has no heading yet.
fn append_log_entries(path: &Path, date: &str, entries: &[String]) -> Result<()> {
    let heading = format!("## {date}");

    if !path.is_file() {
        if let Some(parent) = path.parent() {
            fsutil::create_dir_all(parent)?;
        }
        let mut content = format!("# Rule Integration Log\n\n{heading}\n\n");
        for entry in entries {
            content.push_str(entry);
            content.push('\n');
        }
        content.push_str("\n---\n");
        return fsutil::write(path, &content);
    }

    let existing = fsutil::read(path)?;
    let mut lines: Vec<String> = existing.lines().map(str::to_string).collect();

    if let Some(idx) = lines.iter().position(|l| l.trim() == heading) {
        // Newest entries go directly under the heading, above older ones.
        let mut at = idx + 1;
        if lines.get(at).is_some_and(|l| l.trim().is_empty()) {
            at += 1;
        }
        for (offset, entry) in entries.iter().enumerate() {
            lines.insert(at + offset, entry.clone());
        }
    } else {
        let mut at = 0;
        if lines.first().is_some_and(|l| l.starts_with("# ")) {
            at = 1;
            if lines.get(1).is_some_and(|l| l.trim().is_empty()) {
                at = 2;
            }
        }
        let mut block = vec![heading, String::new()];
        block.extend(entries.iter().cloned());
        block.push(String::new());
        block.push("---".to_string());
        block.push(String::new());
        for (offset, line) in block.into_iter().enumerate() {
            lines.insert(at + offset, line);
        }
    }

    let mut content = lines.join("\n");
    content.push('\n');
    fsutil::write(path, &content)
}
