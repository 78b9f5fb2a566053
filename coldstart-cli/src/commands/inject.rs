//! Module rule injection into an initialized project

use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use console::{style, Emoji};
use indexmap::IndexMap;

use coldstart::module::{self, ModuleDefinition};
use coldstart::stages::{self, InjectRequest};
use coldstart::{ProjectConfig, TargetProject, Workspace};

use crate::commands::init::spinner;
use crate::prompts;

static SUCCESS: Emoji = Emoji("✓", "√");
static WARNING: Emoji = Emoji("⚠", "!");

/// Placeholders filled from the project config instead of prompting.
const AUTO_FILLED: [&str; 3] = ["PROJECT_NAME", "CODE_LANGUAGE", "CODE_LANGUAGE_EXT"];

/// Render a library module's rules into a target project
pub struct InjectCommand {
    target_dir: PathBuf,
    module_id: Option<String>,
}

impl InjectCommand {
    /// Create a new command instance
    #[must_use]
    pub const fn new(target_dir: PathBuf, module_id: Option<String>) -> Self {
        Self {
            target_dir,
            module_id,
        }
    }

    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error when the target is not an initialized project, the
    /// module does not exist, or a required parameter stays empty.
    pub fn execute(&self) -> Result<()> {
        ensure!(
            self.target_dir.is_dir(),
            "target project directory does not exist: {}",
            self.target_dir.display()
        );
        let workspace = Workspace::discover()?;
        let target = TargetProject::at(&self.target_dir);
        let project =
            ProjectConfig::load(&target).context("Failed to read the project configuration")?;

        println!(
            "{} {}",
            style("Injecting into").green().bold(),
            style(&project.project.name).cyan().bold()
        );
        println!(
            "  {} {} + {}",
            style("stack:").dim(),
            project.technology.language.name,
            project.technology.framework.name
        );
        println!();

        let modules = module::list_modules(&workspace.library())?;
        ensure!(
            !modules.is_empty(),
            "no modules installed under the library's modules directory"
        );
        let definition = self.pick_module(&modules)?;

        for warning in definition.compatibility_warnings(
            &project.technology.language.id,
            &project.technology.framework.id,
        ) {
            println!("{} {}", WARNING, style(warning).yellow());
        }

        let parameters = collect_parameters(definition, &project)?;

        let spinner = spinner()?;
        spinner.set_message(format!("Injecting {}...", definition.module_id));
        let outcome = stages::inject(
            &workspace,
            &target,
            &InjectRequest {
                module_id: definition.module_id.clone(),
                parameters,
            },
        )
        .context("Failed to inject the module")?;
        spinner.finish_and_clear();

        let verb = if outcome.reinjected {
            "re-injected"
        } else {
            "injected"
        };
        println!(
            "{} {}",
            SUCCESS,
            style(format!("Module `{}` {verb}", outcome.module_name))
                .green()
                .bold()
        );
        for name in &outcome.files {
            println!("  {}", style(name).cyan());
        }
        println!("  config: {}", style(outcome.config_file.display()).cyan());
        println!();

        println!("{}", style("Next steps:").bold());
        println!();
        println!(
            "  {} Ask the assistant to start implementing the {} module;",
            style("1.").cyan(),
            style(&outcome.module_name).cyan()
        );
        println!("     the injected rules walk it through the steps.");
        Ok(())
    }

    /// The module to inject: the one named on the command line, otherwise an
    /// interactive pick.
    fn pick_module<'a>(&self, modules: &'a [ModuleDefinition]) -> Result<&'a ModuleDefinition> {
        if let Some(id) = &self.module_id {
            return modules
                .iter()
                .find(|m| &m.module_id == id)
                .with_context(|| format!("module `{id}` is not installed; try `coldstart list modules`"));
        }
        let items: Vec<String> = modules
            .iter()
            .map(|m| {
                if m.module_description.is_empty() {
                    m.module_id.clone()
                } else {
                    format!("{} - {}", m.module_id, m.module_description)
                }
            })
            .collect();
        let idx = prompts::select("Module to inject", &items, 0)?;
        Ok(&modules[idx])
    }
}

/// Prompt for the module's declared parameters, in declaration order.
///
/// Parameters the renderer fills from the project config are skipped with a
/// note; the library applies declared defaults, so optional skips stay out
/// of the map entirely.
fn collect_parameters(
    definition: &ModuleDefinition,
    project: &ProjectConfig,
) -> Result<IndexMap<String, String>> {
    let mut parameters = IndexMap::new();
    for (name, spec) in &definition.parameters {
        if AUTO_FILLED.contains(&name.as_str()) {
            println!(
                "  {} {} {}",
                style(name).dim(),
                style("=").dim(),
                style(format!("{} (from project config)", auto_value(name, project))).dim()
            );
            continue;
        }
        let prompt = spec
            .prompt
            .clone()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| name.clone());
        let value = match &spec.default {
            Some(default) => prompts::input_with_default(&prompt, default)?,
            None if spec.required => prompts::input_required(&prompt)?,
            None => prompts::input_optional(&prompt)?.unwrap_or_default(),
        };
        if !value.is_empty() {
            parameters.insert(name.clone(), value);
        }
    }
    Ok(parameters)
}

fn auto_value(name: &str, project: &ProjectConfig) -> String {
    match name {
        "PROJECT_NAME" => project.project.name.clone(),
        "CODE_LANGUAGE" => project.technology.language.code_language.clone(),
        _ => coldstart::render::language_ext(&project.technology.language.id).to_string(),
    }
}
