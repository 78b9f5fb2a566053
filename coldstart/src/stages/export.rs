//! `export`: move the staged tree into a target project.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::catalog::OptionsCatalog;
use crate::config::{
    LogService, PlanRecord, ProjectConfig, ProjectInfo, RuleRecord, StagingConfig, Technology,
    ToolConfig,
};
use crate::error::{Error, Result};
use crate::fsutil;
use crate::workspace::{Staging, TargetProject, Workspace};

use super::{file_name_of, write_state_readme};

/// What `export` copied and wrote.
#[derive(Debug)]
pub struct ExportOutcome {
    /// Plan file names copied into `.cursor/plans/`.
    pub plans: Vec<String>,
    /// Rule file names copied into `.cursor/rules/`.
    pub rules: Vec<String>,
    /// The persisted `project.json`.
    pub config_file: PathBuf,
    /// The README written beside it.
    pub readme_file: PathBuf,
}

/// Copies staged plans and rules into the target's `.cursor/` tree and
/// persists the initial `project.json` (plus its README). The target
/// directory tree is created as needed. Staging is left in place; callers
/// remove it with [`clean_staging`] once the user confirms.
///
/// # Errors
///
/// [`Error::ConfigMissing`] when no staging pass exists, plus I/O errors.
pub fn export(
    workspace: &Workspace,
    catalog: &OptionsCatalog,
    target: &TargetProject,
) -> Result<ExportOutcome> {
    let staging = workspace.staging();
    let cfg = StagingConfig::load(&staging)?;

    let plans_dir = target.plans_dir();
    fsutil::create_dir_all(&plans_dir)?;
    let mut plans = Vec::new();
    let mut plan_records = Vec::new();
    for path in staged_documents(&staging.plans_dir())? {
        let name = file_name_of(&path);
        fsutil::copy(&path, &plans_dir.join(&name))?;
        plan_records.push(PlanRecord::for_plan(&name));
        plans.push(name);
    }

    let rules_dir = target.rules_dir();
    fsutil::create_dir_all(&rules_dir)?;
    let mut rules = Vec::new();
    let mut rule_records = Vec::new();
    for path in fsutil::files_with_suffix(&staging.rules_dir(), ".mdc")? {
        let name = file_name_of(&path);
        fsutil::copy(&path, &rules_dir.join(&name))?;
        rule_records.push(RuleRecord::for_rule(&name));
        rules.push(name);
    }

    let mut project = ProjectConfig::new(
        ProjectInfo {
            name: cfg.project_name.clone(),
            description: cfg.project_description.clone().unwrap_or_default(),
        },
        Technology::from_staging(&cfg, catalog),
        ToolConfig {
            enable_github_action: cfg.enable_github_action,
            log_service: LogService::default(),
        },
    );
    project.files.plans = plan_records;
    project.files.rules = rule_records;
    project.save(target)?;

    let readme_file = write_state_readme(target)?;

    Ok(ExportOutcome {
        plans,
        rules,
        config_file: target.config_file(),
        readme_file,
    })
}

/// Removes the staging tree. A staging tree that is already gone is fine.
///
/// # Errors
///
/// [`Error::Io`] when removal fails for any other reason.
pub fn clean_staging(staging: &Staging) -> Result<()> {
    match fs::remove_dir_all(staging.dir()) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::io(staging.dir(), e)),
    }
}

/// Staged plan documents: rendered `.mdc` plans plus copied `.md` notes.
fn staged_documents(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = fsutil::files_with_suffix(dir, ".mdc")?;
    files.extend(fsutil::files_with_suffix(dir, ".md")?);
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::RuleKind;
    use crate::stages::fixtures::seed_library;
    use crate::stages::init::{init, InitAnswers};
    use crate::stages::process::process;

    fn run_pipeline(root: &Path) -> (Workspace, OptionsCatalog) {
        seed_library(root);
        let workspace = Workspace::at(root);
        let catalog = OptionsCatalog::load(&workspace.library()).unwrap();
        let answers = InitAnswers {
            project_name: "Demo".to_string(),
            language_id: "python".to_string(),
            framework_id: "django".to_string(),
            platform_ids: vec!["web".to_string()],
            enable_github_action: false,
            project_description: Some("A demo project".to_string()),
        };
        init(&workspace, &catalog, &answers).unwrap();
        process(&workspace, &catalog).unwrap();
        (workspace, catalog)
    }

    #[test]
    fn export_copies_staged_files_and_persists_the_project() {
        let dir = tempfile::tempdir().unwrap();
        let (workspace, catalog) = run_pipeline(dir.path());
        // The target directory does not exist yet; export must create it.
        let target = TargetProject::at(dir.path().join("demo-app"));

        let outcome = export(&workspace, &catalog, &target).unwrap();
        assert_eq!(
            outcome.plans,
            vec!["00-project-init-plan.mdc", "01-project-description.md"]
        );
        assert_eq!(
            outcome.rules,
            vec!["00-core.mdc", "10-python.mdc", "20-django.mdc", "30-web.mdc"]
        );
        assert!(target.rules_dir().join("10-python.mdc").is_file());
        assert!(outcome.readme_file.is_file());

        let project = ProjectConfig::load(&target).unwrap();
        assert_eq!(project.project.name, "Demo");
        assert_eq!(project.project.description, "A demo project");
        assert_eq!(project.technology.language.id, "python");
        assert_eq!(project.technology.platforms[0].name, "Web");
        assert!(project.modules.injected.is_empty());
        let kinds: Vec<RuleKind> = project.files.rules.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RuleKind::Common,
                RuleKind::Language,
                RuleKind::Framework,
                RuleKind::Platform
            ]
        );
    }

    #[test]
    fn export_without_a_staging_pass_is_config_missing() {
        let dir = tempfile::tempdir().unwrap();
        seed_library(dir.path());
        let workspace = Workspace::at(dir.path());
        let catalog = OptionsCatalog::load(&workspace.library()).unwrap();
        let target = TargetProject::at(dir.path().join("demo-app"));

        let err = export(&workspace, &catalog, &target).unwrap_err();
        assert!(matches!(err, Error::ConfigMissing { .. }));
    }

    #[test]
    fn clean_staging_removes_the_tree_and_tolerates_absence() {
        let dir = tempfile::tempdir().unwrap();
        let (workspace, _) = run_pipeline(dir.path());
        let staging = workspace.staging();
        assert!(staging.dir().is_dir());

        clean_staging(&staging).unwrap();
        assert!(!staging.dir().exists());
        // Second removal is a no-op.
        clean_staging(&staging).unwrap();
    }
}
