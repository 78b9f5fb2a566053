//! Regenerate a project's technology rule set in place

use std::path::PathBuf;

use anyhow::{Context, Result};
use console::{style, Emoji};

use coldstart::stages::{self, UpdateStatus};
use coldstart::{OptionsCatalog, TargetProject, Workspace};

use crate::commands::init::spinner;

static SUCCESS: Emoji = Emoji("✓", "√");

/// Re-render the common/language/framework/platform rules from `project.json`
pub struct UpdateRulesCommand {
    target_dir: PathBuf,
}

impl UpdateRulesCommand {
    /// Create a new command instance
    #[must_use]
    pub const fn new(target_dir: PathBuf) -> Self {
        Self { target_dir }
    }

    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error when the target has no current-schema `project.json`
    /// (run `init-config` first) or a template fails to render.
    pub fn execute(&self) -> Result<()> {
        let workspace = Workspace::discover()?;
        let catalog = OptionsCatalog::load(&workspace.library())
            .context("Failed to load the options catalog")?;
        let target = TargetProject::at(&self.target_dir);

        println!(
            "{} {}",
            style("Updating rules in").green().bold(),
            style(self.target_dir.display()).cyan().bold()
        );
        println!();

        let spinner = spinner()?;
        spinner.set_message("Regenerating rule files...");
        let outcome = stages::update_rules(&workspace, &catalog, &target)
            .context("Failed to update the rule files")?;
        spinner.finish_and_clear();

        let mut created = 0;
        let mut changed = 0;
        for update in &outcome.updates {
            let status = match update.status {
                UpdateStatus::Created => {
                    created += 1;
                    style("created".to_string()).green()
                }
                UpdateStatus::Updated { added: 0, removed: 0 } => style("unchanged".to_string()).dim(),
                UpdateStatus::Updated { added, removed } => {
                    changed += 1;
                    style(format!("updated (+{added} -{removed})")).yellow()
                }
            };
            println!("  {} {}", style(&update.file_name).cyan(), status);
        }
        println!();
        println!(
            "{} {}",
            SUCCESS,
            style(format!(
                "{} rule files regenerated ({created} created, {changed} changed)",
                outcome.updates.len()
            ))
            .green()
            .bold()
        );
        println!("  config: {}", style(outcome.config_file.display()).cyan());
        Ok(())
    }
}
