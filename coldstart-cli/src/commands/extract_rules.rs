//! Harvest generalizable rules from a project back into the library

use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use console::{style, Emoji};

use coldstart::stages;
use coldstart::{TargetProject, Workspace};

use crate::prompts;

static SUCCESS: Emoji = Emoji("✓", "√");
static INFO: Emoji = Emoji("ℹ", "i");

/// Copy selected rule files into the library's extract area
pub struct ExtractRulesCommand {
    target_dir: PathBuf,
}

impl ExtractRulesCommand {
    /// Create a new command instance
    #[must_use]
    pub const fn new(target_dir: PathBuf) -> Self {
        Self { target_dir }
    }

    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error when the target is not an initialized project or the
    /// copy fails.
    pub fn execute(&self) -> Result<()> {
        ensure!(
            self.target_dir.is_dir(),
            "target project directory does not exist: {}",
            self.target_dir.display()
        );
        let workspace = Workspace::discover()?;
        let target = TargetProject::at(&self.target_dir);

        println!(
            "{} {}",
            style("Extracting rules from").green().bold(),
            style(self.target_dir.display()).cyan().bold()
        );
        println!();

        let candidates = stages::extract_candidates(&target)
            .context("Failed to scan the project's rule files")?;

        if !candidates.project_specific.is_empty() {
            println!(
                "{} kept out of the offer (project-specific content):",
                INFO
            );
            for name in &candidates.project_specific {
                println!("  {}", style(name).dim());
            }
            println!();
        }
        if candidates.extractable.is_empty() {
            println!("{} nothing generalizable to extract", INFO);
            return Ok(());
        }

        let defaults = vec![true; candidates.extractable.len()];
        let picks =
            prompts::multi_select("Rules to extract", &candidates.extractable, &defaults)?;
        if picks.is_empty() {
            println!("{} nothing selected; library unchanged", INFO);
            return Ok(());
        }
        let selection: Vec<String> = picks
            .into_iter()
            .map(|i| candidates.extractable[i].clone())
            .collect();

        let outcome = stages::extract_rules(&workspace, &target, &selection)
            .context("Failed to copy the rules into the library")?;

        println!();
        println!(
            "{} {}",
            SUCCESS,
            style(format!("Extracted {} rule files", outcome.extracted.len()))
                .green()
                .bold()
        );
        for rule in &outcome.extracted {
            println!(
                "  {} {} {}",
                style(&rule.source).cyan(),
                style("->").dim(),
                style(rule.destination.display()).cyan()
            );
        }
        if let Some(log) = &outcome.log_file {
            println!("  log: {}", style(log.display()).cyan());
        }
        println!();
        println!(
            "{} review the extracted copies before folding them into the templates",
            INFO
        );
        Ok(())
    }
}
