//! `init`: start a fresh staging pass from collected answers.

use std::path::PathBuf;

use crate::catalog::OptionsCatalog;
use crate::config::{now_display, FrameworkChoice, LanguageChoice, StagingConfig};
use crate::error::{Error, Result};
use crate::workspace::Workspace;

/// Answers the interactive layer collects before `init` runs.
#[derive(Debug, Clone)]
pub struct InitAnswers {
    /// Project display name.
    pub project_name: String,
    /// Language id from the catalog.
    pub language_id: String,
    /// Framework id from the selected language; empty when the language
    /// offers none.
    pub framework_id: String,
    /// Selected platform ids; empty falls back to the catalog default.
    pub platform_ids: Vec<String>,
    /// Whether generated docs include the GitHub Actions section.
    pub enable_github_action: bool,
    /// Optional free-form description.
    pub project_description: Option<String>,
}

/// What `init` wrote into the staging area.
#[derive(Debug)]
pub struct InitOutcome {
    /// Root of the freshly created staging tree.
    pub staging_dir: PathBuf,
    /// The staging config file.
    pub config_file: PathBuf,
    /// Rendered plan document, when the library ships the plan template.
    pub plan_file: Option<PathBuf>,
    /// Copied description document, when the library ships it.
    pub description_file: Option<PathBuf>,
}

/// Recreates the staging area and writes the staging config, the rendered
/// plan, and the description copy.
///
/// A leftover staging tree from an earlier pass is removed first so the new
/// pass starts clean.
///
/// # Errors
///
/// [`Error::TemplateNotFound`] when `config.template.json` is missing from
/// the library, [`Error::InvalidSelection`] when an answer references an id
/// the catalog does not offer, plus I/O and render errors.
pub fn init(
    workspace: &Workspace,
    catalog: &OptionsCatalog,
    answers: &InitAnswers,
) -> Result<InitOutcome> {
    let library = workspace.library();
    let staging = workspace.staging();

    super::export::clean_staging(&staging)?;

    let mut cfg = StagingConfig::from_template(&library.config_template())?;
    cfg.project_name = answers.project_name.clone();

    let language = catalog.language(&answers.language_id).ok_or_else(|| {
        Error::InvalidSelection(format!("unknown language `{}`", answers.language_id))
    })?;
    cfg.language = LanguageChoice {
        id: language.id.clone(),
        name: language.name.clone(),
        code_language: language.code_language.clone(),
    };
    cfg.framework = if answers.framework_id.is_empty() {
        FrameworkChoice::default()
    } else {
        let framework = language.framework(&answers.framework_id).ok_or_else(|| {
            Error::InvalidSelection(format!(
                "unknown framework `{}` for language `{}`",
                answers.framework_id, language.id
            ))
        })?;
        FrameworkChoice {
            id: framework.id.clone(),
            name: framework.name.clone(),
            build_tool: framework.build_tool.clone(),
        }
    };
    cfg.platforms = if answers.platform_ids.is_empty() {
        vec![catalog.default_platform_id()]
    } else {
        answers.platform_ids.clone()
    };
    cfg.enable_github_action = answers.enable_github_action;
    cfg.project_description = answers
        .project_description
        .clone()
        .filter(|d| !d.is_empty());
    cfg.created_at = now_display();
    cfg.save(&staging)?;

    let (plan_file, description_file) =
        super::process::stage_plans(&library, &staging, &cfg, catalog)?;

    Ok(InitOutcome {
        staging_dir: staging.dir().to_path_buf(),
        config_file: staging.config_file(),
        plan_file,
        description_file,
    })
}
