//! Pipeline stages
//!
//! Each stage is a plain function over the filesystem: typed inputs in, a
//! typed outcome out. Stages never prompt and never print; the CLI owns the
//! interactive layer, collects answers up front, and renders outcomes.

pub mod export;
pub mod extract;
pub mod init;
pub mod init_config;
pub mod inject;
pub mod process;
pub mod update;

pub use export::{clean_staging, export, ExportOutcome};
pub use extract::{
    extract_candidates, extract_rules, ExtractCandidates, ExtractOutcome, ExtractedRule,
};
pub use init::{init, InitAnswers, InitOutcome};
pub use init_config::{init_config, InitConfigOutcome};
pub use inject::{inject, InjectOutcome, InjectRequest};
pub use process::{process, ProcessOutcome, StagedRule};
pub use update::{update_rules, RuleUpdate, UpdateOutcome, UpdateStatus};

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::fsutil;
use crate::workspace::TargetProject;

const STATE_README: &str = "\
# .cold-start

Tool-managed state for this project.

- `project.json` records the project's technology stack, generated plan and
  rule files, and injected modules. Commands like `inject` and `update-rules`
  read and rewrite it.
- Field names in `project.json` are a stable contract; edit values if you
  must, but keep the structure intact.

Delete this directory only if you no longer use the scaffolding tool here.
";

/// Writes the explanatory README next to `project.json`.
pub(crate) fn write_state_readme(target: &TargetProject) -> Result<PathBuf> {
    let dir = target.state_dir();
    fsutil::create_dir_all(&dir)?;
    let path = target.readme_file();
    fsutil::write(&path, STATE_README)?;
    Ok(path)
}

/// Last path component as an owned string.
pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |n| n.to_string_lossy().into_owned(),
    )
}
