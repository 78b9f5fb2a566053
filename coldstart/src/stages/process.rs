//! `process`: render the full applicable template set into staging.

use std::path::PathBuf;

use crate::catalog::OptionsCatalog;
use crate::classify::RuleKind;
use crate::config::StagingConfig;
use crate::error::Result;
use crate::fsutil;
use crate::render::{Placeholders, Renderer};
use crate::resolve;
use crate::workspace::{Staging, TemplateLibrary, Workspace};

use super::file_name_of;

/// One rule file rendered into the staging area.
#[derive(Debug)]
pub struct StagedRule {
    /// Output file name (`"10-python.mdc"`).
    pub file_name: String,
    /// Resolution category.
    pub kind: RuleKind,
}

/// What `process` rendered.
#[derive(Debug)]
pub struct ProcessOutcome {
    /// Re-rendered plan document, when the library ships it.
    pub plan_file: Option<PathBuf>,
    /// Description document, when the library ships it.
    pub description_file: Option<PathBuf>,
    /// The staging rules directory the files were written into.
    pub rules_dir: PathBuf,
    /// Rendered rule files, in resolution order.
    pub rules: Vec<StagedRule>,
}

/// Resolves and renders every applicable template (common, language,
/// framework, platforms) into the staging rules directory and re-renders
/// the plan from the current staging config.
///
/// Deterministic for a fixed config: re-running overwrites the previous
/// pass with byte-identical output, since `GENERATION_DATE` comes from the
/// config's `createdAt` rather than the wall clock.
///
/// # Errors
///
/// [`crate::Error::ConfigMissing`] when no staging config exists, plus I/O
/// and render errors.
pub fn process(workspace: &Workspace, catalog: &OptionsCatalog) -> Result<ProcessOutcome> {
    let library = workspace.library();
    let staging = workspace.staging();
    let cfg = StagingConfig::load(&staging)?;

    let (plan_file, description_file) = stage_plans(&library, &staging, &cfg, catalog)?;

    let resolved = resolve::full_rule_set(
        &library,
        &cfg.language.id,
        &cfg.framework.id,
        &cfg.platforms,
        catalog.rule_priorities,
    )?;

    let rules_dir = staging.rules_dir();
    fsutil::create_dir_all(&rules_dir)?;
    let renderer = Renderer::new();
    let values = Placeholders::from_staging(&cfg, catalog).into_value();

    let mut rules = Vec::new();
    for rule in &resolved {
        let rendered = renderer.render_file(&rule.template_path, &values)?;
        fsutil::write(&rules_dir.join(&rule.file_name), &rendered)?;
        rules.push(StagedRule {
            file_name: rule.file_name.clone(),
            kind: rule.kind,
        });
    }

    Ok(ProcessOutcome {
        plan_file,
        description_file,
        rules_dir,
        rules,
    })
}

/// Renders the plan document and ensures the description copy exists. The
/// plan is re-rendered on every pass; the description is copied only when
/// missing. Either is skipped when the library does not ship it.
pub(crate) fn stage_plans(
    library: &TemplateLibrary,
    staging: &Staging,
    cfg: &StagingConfig,
    catalog: &OptionsCatalog,
) -> Result<(Option<PathBuf>, Option<PathBuf>)> {
    let plans_dir = staging.plans_dir();
    fsutil::create_dir_all(&plans_dir)?;

    let plan_template = library.plan_template();
    let plan_file = if plan_template.is_file() {
        let renderer = Renderer::new();
        let values = Placeholders::from_staging(cfg, catalog).into_value();
        let rendered = renderer.render_file(&plan_template, &values)?;
        let dest = plans_dir.join(file_name_of(&plan_template));
        fsutil::write(&dest, &rendered)?;
        Some(dest)
    } else {
        None
    };

    let description_template = library.description_template();
    let description_file = if description_template.is_file() {
        let dest = plans_dir.join(file_name_of(&description_template));
        if !dest.is_file() {
            fsutil::copy(&description_template, &dest)?;
        }
        Some(dest)
    } else {
        None
    };

    Ok((plan_file, description_file))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::error::Error;
    use crate::stages::fixtures::seed_library;
    use crate::stages::init::{init, InitAnswers};

    fn initialized_workspace(root: &std::path::Path) -> (Workspace, OptionsCatalog) {
        seed_library(root);
        let workspace = Workspace::at(root);
        let catalog = OptionsCatalog::load(&workspace.library()).unwrap();
        let answers = InitAnswers {
            project_name: "Demo".to_string(),
            language_id: "python".to_string(),
            framework_id: "django".to_string(),
            platform_ids: vec!["web".to_string()],
            enable_github_action: false,
            project_description: None,
        };
        init(&workspace, &catalog, &answers).unwrap();
        (workspace, catalog)
    }

    #[test]
    fn process_requires_a_staging_config() {
        let dir = tempfile::tempdir().unwrap();
        seed_library(dir.path());
        let workspace = Workspace::at(dir.path());
        let catalog = OptionsCatalog::load(&workspace.library()).unwrap();

        let err = process(&workspace, &catalog).unwrap_err();
        assert!(matches!(err, Error::ConfigMissing { .. }));
    }

    #[test]
    fn process_stages_the_full_rule_set() {
        let dir = tempfile::tempdir().unwrap();
        let (workspace, catalog) = initialized_workspace(dir.path());

        let outcome = process(&workspace, &catalog).unwrap();
        let names: Vec<&str> = outcome.rules.iter().map(|r| r.file_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["00-core.mdc", "10-python.mdc", "20-django.mdc", "30-web.mdc"]
        );
        assert_eq!(outcome.rules[0].kind, RuleKind::Common);
        assert_eq!(outcome.rules[3].kind, RuleKind::Platform);

        let python = fs::read_to_string(outcome.rules_dir.join("10-python.mdc")).unwrap();
        assert!(python.contains("Install with pip."));
        let web = fs::read_to_string(outcome.rules_dir.join("30-web.mdc")).unwrap();
        assert!(web.contains("Targets: Web"));
    }

    #[test]
    fn process_is_byte_idempotent_for_an_unchanged_config() {
        let dir = tempfile::tempdir().unwrap();
        let (workspace, catalog) = initialized_workspace(dir.path());

        let first = process(&workspace, &catalog).unwrap();
        let mut snapshots = Vec::new();
        for rule in &first.rules {
            snapshots.push(fs::read(first.rules_dir.join(&rule.file_name)).unwrap());
        }
        let plan_before = fs::read(first.plan_file.as_ref().unwrap()).unwrap();

        let second = process(&workspace, &catalog).unwrap();
        for (rule, snapshot) in second.rules.iter().zip(&snapshots) {
            let bytes = fs::read(second.rules_dir.join(&rule.file_name)).unwrap();
            assert_eq!(&bytes, snapshot, "{} changed between runs", rule.file_name);
        }
        assert_eq!(
            fs::read(second.plan_file.as_ref().unwrap()).unwrap(),
            plan_before
        );
    }
}
