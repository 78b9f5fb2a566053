//! Author a new module in the template library

use anyhow::{Context, Result};
use console::{style, Emoji};
use convert_case::{Case, Casing};
use indexmap::IndexMap;

use coldstart::module::{
    self, ModuleDefinition, ModuleDependencies, ModuleType, ParameterSpec,
};
use coldstart::Workspace;

use crate::prompts;

static SUCCESS: Emoji = Emoji("✓", "√");

/// Interactively scaffold `templates/modules/<id>/` with a manifest and a
/// starter template
pub struct AddModuleCommand;

impl AddModuleCommand {
    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error when the library cannot be found or the module
    /// files cannot be written.
    pub fn execute() -> Result<()> {
        let workspace = Workspace::discover()?;

        println!(
            "{} {}",
            style("Creating").green().bold(),
            style("a new library module").bold()
        );
        println!();

        let module_id = prompts::input_required("Module id (kebab-case, e.g. network-module)")?;
        let module_name =
            prompts::input_with_default("Display name", &module_id.to_case(Case::Title))?;
        let module_description = prompts::input_with_default(
            "Description",
            &format!("{module_name} module rules"),
        )?;

        let type_items: Vec<String> = ModuleType::all()
            .iter()
            .map(|t| t.as_str().to_string())
            .collect();
        let type_idx = prompts::select("Module type", &type_items, 0)?;
        let module_type = ModuleType::all()[type_idx];

        let priority = prompts::input_u32("Rule priority prefix", 40)?;

        let compatible_languages =
            comma_list(&prompts::input_optional("Compatible languages (comma separated, empty = any)")?);
        let compatible_frameworks =
            comma_list(&prompts::input_optional("Compatible frameworks (comma separated, empty = any)")?);

        println!();
        println!("{}", style("Parameters (empty name finishes):").bold());
        let parameters = collect_parameter_specs()?;

        let definition = ModuleDefinition {
            module_id,
            module_name,
            module_description,
            module_type,
            priority,
            dependencies: ModuleDependencies {
                required: vec!["logging".to_string()],
                optional: Vec::new(),
            },
            parameters,
            compatible_languages,
            compatible_frameworks,
        };

        let dir = module::write_module(&workspace.library(), &definition)
            .context("Failed to write the module files")?;

        println!();
        println!(
            "{} {}",
            SUCCESS,
            style(format!("Module `{}` created", definition.module_id))
                .green()
                .bold()
        );
        println!("  {}", style(dir.display()).cyan());
        println!();
        println!("{}", style("Next steps:").bold());
        println!();
        println!("  {} Flesh out the starter template:", style("1.").cyan());
        println!(
            "     {}",
            style(
                dir.join(format!("{}.mdc.template", definition.module_id))
                    .display()
            )
            .cyan()
        );
        println!();
        println!("  {} Inject it into a project:", style("2.").cyan());
        println!(
            "     {} {}",
            style("$").dim(),
            style(format!(
                "coldstart inject <project-dir> {}",
                definition.module_id
            ))
            .cyan()
        );
        Ok(())
    }
}

/// The parameter-definition loop: name, description, required flag,
/// default, prompt text.
fn collect_parameter_specs() -> Result<IndexMap<String, ParameterSpec>> {
    let mut parameters = IndexMap::new();
    loop {
        let Some(name) = prompts::input_optional("Parameter name")? else {
            break;
        };
        let description = prompts::input_optional("  description")?.unwrap_or_default();
        let required = prompts::confirm("  required?", false)?;
        let default = prompts::input_optional("  default value")?;
        let prompt = prompts::input_optional("  prompt text")?;
        parameters.insert(
            name,
            ParameterSpec {
                description,
                required,
                default,
                prompt,
            },
        );
    }
    Ok(parameters)
}

fn comma_list(raw: &Option<String>) -> Vec<String> {
    raw.as_deref()
        .map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default()
}
