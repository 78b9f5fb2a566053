//! Backfill `project.json` for a project scaffolded without the pipeline

use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use console::{style, Emoji};

use coldstart::detect::{self, DetectedStack};
use coldstart::stages::{self, InitAnswers, InitConfigOutcome};
use coldstart::{OptionsCatalog, ProjectConfig, TargetProject, Workspace};

use crate::prompts;

static SUCCESS: Emoji = Emoji("✓", "√");
static INFO: Emoji = Emoji("ℹ", "i");
static WARNING: Emoji = Emoji("⚠", "!");

/// Build `project.json` for an existing project from detection plus prompts
pub struct InitConfigCommand {
    target_dir: PathBuf,
}

impl InitConfigCommand {
    /// Create a new command instance
    #[must_use]
    pub const fn new(target_dir: PathBuf) -> Self {
        Self { target_dir }
    }

    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error when the target directory does not exist or the
    /// config cannot be written.
    pub fn execute(&self) -> Result<()> {
        ensure!(
            self.target_dir.is_dir(),
            "target project directory does not exist: {}",
            self.target_dir.display()
        );
        let workspace = Workspace::discover()?;
        let catalog = OptionsCatalog::load(&workspace.library())
            .context("Failed to load the options catalog")?;
        let target = TargetProject::at(&self.target_dir);

        println!(
            "{} {}",
            style("Configuring").green().bold(),
            style(self.target_dir.display()).cyan().bold()
        );
        println!();

        // An intact existing config keeps priority; overwriting it is its
        // own explicitly confirmed decision. A config that no longer parses
        // is rebuilt instead.
        if target.config_file().is_file() {
            match ProjectConfig::load_strict(&target) {
                Ok(existing) => {
                    print_existing(&existing);
                    if !prompts::confirm("Overwrite it with a fresh configuration?", false)? {
                        println!("{} existing configuration kept", INFO);
                        return Ok(());
                    }
                }
                Err(err) => {
                    println!(
                        "{} existing configuration could not be read ({err}); rebuilding",
                        WARNING
                    );
                    println!();
                }
            }
        }

        let detected = detect::detect_project(&target)?;
        print_detected(&detected, &catalog);

        let answers = collect_answers(&catalog, &detected, &self.target_dir)?;
        let outcome = stages::init_config(&catalog, &target, &answers, true)
            .context("Failed to write the project configuration")?;

        match outcome {
            InitConfigOutcome::AlreadyInitialized { config_file, .. } => {
                // Unreachable with overwrite set; report it anyway.
                println!(
                    "{} configuration already present at {}",
                    INFO,
                    style(config_file.display()).cyan()
                );
            }
            InitConfigOutcome::Created {
                config_file,
                config,
            } => {
                println!();
                println!(
                    "{} {}",
                    SUCCESS,
                    style("Project configuration written").green().bold()
                );
                println!("  config: {}", style(config_file.display()).cyan());
                println!(
                    "  {} {} + {}, {} plans, {} rules",
                    style("recorded:").dim(),
                    config.technology.language.name,
                    config.technology.framework.name,
                    config.files.plans.len(),
                    config.files.rules.len()
                );
                println!();
                println!("{}", style("Next steps:").bold());
                println!();
                println!("  {} Regenerate the rule set:", style("1.").cyan());
                println!(
                    "     {} {}",
                    style("$").dim(),
                    style(format!("coldstart update-rules {}", self.target_dir.display())).cyan()
                );
                println!();
                println!("  {} Add module rules:", style("2.").cyan());
                println!(
                    "     {} {}",
                    style("$").dim(),
                    style(format!("coldstart inject {}", self.target_dir.display())).cyan()
                );
            }
        }
        Ok(())
    }
}

fn print_existing(existing: &ProjectConfig) {
    println!("{} project configuration already exists", INFO);
    println!("  name:      {}", existing.project.name);
    println!("  language:  {}", existing.technology.language.name);
    println!("  framework: {}", existing.technology.framework.name);
    let platforms: Vec<&str> = existing
        .technology
        .platforms
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    println!("  platforms: {}", platforms.join(", "));
    println!();
}

fn print_detected(detected: &DetectedStack, catalog: &OptionsCatalog) {
    let mut notes = Vec::new();
    if let Some(language) = &detected.language {
        notes.push(format!(
            "language {}",
            catalog
                .language(language)
                .map_or_else(|| language.clone(), |l| l.name.clone())
        ));
    }
    if let Some(framework) = &detected.framework {
        notes.push(format!("framework {framework}"));
    }
    if !detected.platforms.is_empty() {
        notes.push(format!("platforms {}", detected.platforms.join(", ")));
    }
    if notes.is_empty() {
        println!("{} nothing detected; starting from the catalog defaults", INFO);
    } else {
        println!("{} detected: {}", INFO, style(notes.join(", ")).dim());
    }
    println!();
}

/// Prompt for the project facts, detection supplying the defaults.
fn collect_answers(
    catalog: &OptionsCatalog,
    detected: &DetectedStack,
    target_dir: &std::path::Path,
) -> Result<InitAnswers> {
    let dir_name = target_dir
        .file_name()
        .map_or_else(|| "unnamed-project".to_string(), |n| n.to_string_lossy().into_owned());
    let default_name = detected.project_name.clone().unwrap_or(dir_name);
    let project_name = prompts::input_with_default("Project name", &default_name)?;
    let project_description = prompts::input_optional("Project description (optional)")?;

    let language_items: Vec<String> = catalog.languages.iter().map(|l| l.name.clone()).collect();
    let language_default = detected
        .language
        .as_ref()
        .and_then(|id| catalog.languages.iter().position(|l| &l.id == id))
        .or_else(|| {
            catalog
                .default_language()
                .and_then(|d| catalog.languages.iter().position(|l| l.id == d.id))
        })
        .unwrap_or(0);
    let language_idx = prompts::select_or_default("Language", &language_items, language_default)?;
    let language = &catalog.languages[language_idx];

    let framework_id = if language.frameworks.is_empty() {
        String::new()
    } else {
        let framework_items: Vec<String> =
            language.frameworks.iter().map(|f| f.name.clone()).collect();
        let framework_default = detected
            .framework
            .as_ref()
            .and_then(|id| language.frameworks.iter().position(|f| &f.id == id))
            .or_else(|| {
                language
                    .default_framework()
                    .and_then(|d| language.frameworks.iter().position(|f| f.id == d.id))
            })
            .unwrap_or(0);
        let idx = prompts::select_or_default("Framework", &framework_items, framework_default)?;
        language.frameworks[idx].id.clone()
    };

    let platform_items: Vec<String> = catalog.platforms.iter().map(|p| p.name.clone()).collect();
    let platform_defaults: Vec<bool> = catalog
        .platforms
        .iter()
        .map(|p| {
            if detected.platforms.is_empty() {
                p.default
            } else {
                detected.platforms.contains(&p.id)
            }
        })
        .collect();
    let platform_ids = prompts::multi_select("Platforms", &platform_items, &platform_defaults)?
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
        project_description,
    })
}
