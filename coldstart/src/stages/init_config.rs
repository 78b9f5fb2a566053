//! `init-config`: persist a project config without the staging pipeline.

use std::path::PathBuf;

use crate::catalog::OptionsCatalog;
use crate::config::{
    LogService, PlanRecord, ProjectConfig, ProjectInfo, RuleRecord, Technology, ToolConfig,
};
use crate::error::Result;
use crate::fsutil;
use crate::workspace::TargetProject;

use super::init::InitAnswers;
use super::{file_name_of, write_state_readme};

/// Result of `init-config`: either the untouched existing config or the
/// freshly persisted one.
#[derive(Debug)]
pub enum InitConfigOutcome {
    /// `project.json` already exists and `overwrite` was not requested;
    /// nothing on disk changed.
    AlreadyInitialized {
        /// The untouched config file.
        config_file: PathBuf,
        /// Its current contents.
        config: Box<ProjectConfig>,
    },
    /// A fresh config was written (plus the state README).
    Created {
        /// The persisted config file.
        config_file: PathBuf,
        /// What was persisted.
        config: Box<ProjectConfig>,
    },
}

/// Builds and persists a `project.json` for a target that was set up
/// without the staging pipeline. Existing `.cursor/plans` and
/// `.cursor/rules` files are scanned into `files` with classifier
/// categories. Ids the catalog does not know are kept with Title-cased
/// display names, so detection results outside the catalog still persist
/// faithfully.
///
/// An existing config short-circuits unless `overwrite` is set; overwrite
/// is the caller's explicit, separately confirmed path.
///
/// # Errors
///
/// I/O and JSON errors from loading or writing the config.
pub fn init_config(
    catalog: &OptionsCatalog,
    target: &TargetProject,
    answers: &InitAnswers,
    overwrite: bool,
) -> Result<InitConfigOutcome> {
    let config_file = target.config_file();
    if config_file.is_file() && !overwrite {
        let config = ProjectConfig::load_strict(target)?;
        return Ok(InitConfigOutcome::AlreadyInitialized {
            config_file,
            config: Box::new(config),
        });
    }

    let platform_ids = if answers.platform_ids.is_empty() {
        vec![catalog.default_platform_id()]
    } else {
        answers.platform_ids.clone()
    };
    let mut project = ProjectConfig::new(
        ProjectInfo {
            name: answers.project_name.clone(),
            description: answers.project_description.clone().unwrap_or_default(),
        },
        Technology::from_ids(
            catalog,
            &answers.language_id,
            &answers.framework_id,
            &platform_ids,
        ),
        ToolConfig {
            enable_github_action: answers.enable_github_action,
            log_service: LogService::default(),
        },
    );

    let mut plan_files = fsutil::files_with_suffix(&target.plans_dir(), ".mdc")?;
    plan_files.extend(fsutil::files_with_suffix(&target.plans_dir(), ".md")?);
    plan_files.sort();
    project.files.plans = plan_files
        .iter()
        .map(|p| PlanRecord::for_plan(&file_name_of(p)))
        .collect();
    project.files.rules = fsutil::files_with_suffix(&target.rules_dir(), ".mdc")?
        .iter()
        .map(|p| RuleRecord::for_rule(&file_name_of(p)))
        .collect();

    project.save(target)?;
    write_state_readme(target)?;

    Ok(InitConfigOutcome::Created {
        config_file,
        config: Box::new(project),
    })
}
