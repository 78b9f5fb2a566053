//! The three-stage scaffolding pipeline: init, process, export

use std::path::PathBuf;

use anyhow::{Context, Result};
use console::{style, Emoji};
use indicatif::{ProgressBar, ProgressStyle};

use coldstart::stages::{self, InitAnswers};
use coldstart::{OptionsCatalog, TargetProject, Workspace};

use crate::prompts;

static SUCCESS: Emoji = Emoji("✓", "√");
static INFO: Emoji = Emoji("ℹ", "i");

/// Stage 1: collect the technology stack and stage the plan documents
pub struct InitCommand {
    target_dir: Option<PathBuf>,
}

impl InitCommand {
    /// Create a new command instance
    ///
    /// The target directory is only remembered for the export hint; stage 1
    /// itself never touches the target project.
    #[must_use]
    pub const fn new(target_dir: Option<PathBuf>) -> Self {
        Self { target_dir }
    }

    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error when the template library is missing or a mandatory
    /// selection is cancelled.
    pub fn execute(&self) -> Result<()> {
        let workspace = Workspace::discover()?;
        let catalog = OptionsCatalog::load(&workspace.library())
            .context("Failed to load the options catalog")?;

        println!(
            "{} {}",
            style("Stage 1:").green().bold(),
            style("collect the stack and stage the plan").bold()
        );
        println!();

        let answers = collect_answers(&catalog)?;

        let spinner = spinner()?;
        spinner.set_message("Staging plan documents...");
        let outcome = stages::init(&workspace, &catalog, &answers)
            .context("Failed to stage the init pass")?;
        spinner.finish_and_clear();

        println!(
            "{} {}",
            SUCCESS,
            style("Staging pass created").green().bold()
        );
        println!("  config: {}", style(outcome.config_file.display()).cyan());
        if let Some(plan) = &outcome.plan_file {
            println!("  plan:   {}", style(plan.display()).cyan());
        }
        if let Some(description) = &outcome.description_file {
            println!("  description: {}", style(description.display()).cyan());
        }
        println!();

        self.print_next_steps(outcome.description_file.as_deref());
        Ok(())
    }

    fn print_next_steps(&self, description: Option<&std::path::Path>) {
        let export = self.target_dir.as_ref().map_or_else(
            || "coldstart init export <project-dir>".to_string(),
            |dir| format!("coldstart init export {}", dir.display()),
        );

        println!("{}", style("Next steps:").bold());
        println!();
        let mut step = 1;
        if let Some(path) = description {
            println!("  {} Describe the project:", style(format!("{step}.")).cyan());
            println!("     {}", style(path.display()).cyan());
            println!();
            step += 1;
        }
        println!("  {} Render the rule set:", style(format!("{step}.")).cyan());
        println!(
            "     {} {}",
            style("$").dim(),
            style("coldstart init process").cyan()
        );
        println!();
        step += 1;
        println!(
            "  {} Export into the project:",
            style(format!("{step}.")).cyan()
        );
        println!("     {} {}", style("$").dim(), style(export).cyan());
    }
}

/// Stage 2: render every applicable rule template into staging
pub struct ProcessCommand;

impl ProcessCommand {
    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error when no staging pass exists (`init` has not run) or
    /// a template fails to render.
    pub fn execute() -> Result<()> {
        let workspace = Workspace::discover()?;
        let catalog = OptionsCatalog::load(&workspace.library())
            .context("Failed to load the options catalog")?;

        println!(
            "{} {}",
            style("Stage 2:").green().bold(),
            style("render the rule templates").bold()
        );
        println!();

        let spinner = spinner()?;
        spinner.set_message("Rendering rule templates...");
        let outcome =
            stages::process(&workspace, &catalog).context("Failed to render the rule set")?;
        spinner.finish_and_clear();

        println!(
            "{} {}",
            SUCCESS,
            style(format!("Rendered {} rule files", outcome.rules.len()))
                .green()
                .bold()
        );
        for rule in &outcome.rules {
            println!(
                "  {} {}",
                style(&rule.file_name).cyan(),
                style(format!("({})", rule.kind)).dim()
            );
        }
        if let Some(plan) = &outcome.plan_file {
            println!("  {} {}", style(plan.display()).cyan(), style("(plan)").dim());
        }
        println!();

        println!("{}", style("Next steps:").bold());
        println!();
        println!(
            "  {} Review the staged files under {}",
            style("1.").cyan(),
            style(outcome.rules_dir.display()).cyan()
        );
        println!();
        println!("  {} Export into the project:", style("2.").cyan());
        println!(
            "     {} {}",
            style("$").dim(),
            style("coldstart init export <project-dir>").cyan()
        );
        Ok(())
    }
}

/// Stage 3: copy the staged tree into the target project
pub struct ExportCommand {
    target_dir: PathBuf,
}

impl ExportCommand {
    /// Create a new command instance
    #[must_use]
    pub const fn new(target_dir: PathBuf) -> Self {
        Self { target_dir }
    }

    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error when no staging pass exists or the copy fails.
    pub fn execute(&self) -> Result<()> {
        let workspace = Workspace::discover()?;
        let catalog = OptionsCatalog::load(&workspace.library())
            .context("Failed to load the options catalog")?;
        let target = TargetProject::at(&self.target_dir);

        println!(
            "{} {}",
            style("Stage 3:").green().bold(),
            style(format!("export into {}", self.target_dir.display())).bold()
        );
        println!();

        let spinner = spinner()?;
        spinner.set_message("Copying staged files...");
        let outcome = stages::export(&workspace, &catalog, &target)
            .context("Failed to export the staged files")?;
        spinner.finish_and_clear();

        println!(
            "{} {}",
            SUCCESS,
            style(format!(
                "Exported {} plans and {} rules",
                outcome.plans.len(),
                outcome.rules.len()
            ))
            .green()
            .bold()
        );
        for name in outcome.plans.iter().chain(&outcome.rules) {
            println!("  {}", style(name).cyan());
        }
        println!("  config: {}", style(outcome.config_file.display()).cyan());
        println!();

        if prompts::confirm("Remove the staging area now?", true)? {
            stages::clean_staging(&workspace.staging())
                .context("Failed to remove the staging area")?;
            println!("{} staging area removed", SUCCESS);
        } else {
            println!(
                "{} staging area kept at {}",
                INFO,
                style(workspace.staging().dir().display()).cyan()
            );
        }
        println!();

        println!("{}", style("Next steps:").bold());
        println!();
        println!("  {} Open the project in your editor:", style("1.").cyan());
        println!(
            "     {} {}",
            style("$").dim(),
            style(format!("cd {}", self.target_dir.display())).cyan()
        );
        println!();
        println!("  {} Add module rules as the project grows:", style("2.").cyan());
        println!(
            "     {} {}",
            style("$").dim(),
            style(format!("coldstart inject {}", self.target_dir.display())).cyan()
        );
        Ok(())
    }
}

/// Collect the stage-1 answers, defaults taken from the catalog.
fn collect_answers(catalog: &OptionsCatalog) -> Result<InitAnswers> {
    let project_name = prompts::input_required("Project name")?;

    let language_items: Vec<String> = catalog.languages.iter().map(|l| l.name.clone()).collect();
    let language_default = catalog
        .default_language()
        .and_then(|d| catalog.languages.iter().position(|l| l.id == d.id))
        .unwrap_or(0);
    let language_idx = prompts::select("Language", &language_items, language_default)?;
    let language = &catalog.languages[language_idx];

    let framework_id = match language.frameworks.len() {
        0 => String::new(),
        1 => {
            println!(
                "{} framework: {} (only option)",
                INFO,
                style(&language.frameworks[0].name).cyan()
            );
            language.frameworks[0].id.clone()
        }
        _ => {
            let framework_items: Vec<String> =
                language.frameworks.iter().map(|f| f.name.clone()).collect();
            let framework_default = language
                .default_framework()
                .and_then(|d| language.frameworks.iter().position(|f| f.id == d.id))
                .unwrap_or(0);
            let idx = prompts::select("Framework", &framework_items, framework_default)?;
            language.frameworks[idx].id.clone()
        }
    };

    let platform_items: Vec<String> = catalog.platforms.iter().map(|p| p.name.clone()).collect();
    let platform_defaults: Vec<bool> = catalog.platforms.iter().map(|p| p.default).collect();
    let platform_ids = prompts::multi_select("Target platforms", &platform_items, &platform_defaults)?
        .into_iter()
        .map(|i| catalog.platforms[i].id.clone())
        .collect();

    let enable_github_action = prompts::confirm("Enable the GitHub Actions sections?", false)?;

    Ok(InitAnswers {
        project_name,
        language_id: language.id.clone(),
        framework_id,
        platform_ids,
        enable_github_action,
        project_description: None,
    })
}

/// Steady-tick spinner shared by the pipeline stages.
pub(crate) fn spinner() -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .context("Failed to set progress style")?,
    );
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    Ok(spinner)
}
