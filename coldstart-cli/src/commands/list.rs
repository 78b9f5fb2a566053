//! Read-only catalog and module listings

use anyhow::{anyhow, Context, Result};
use clap::ValueEnum;
use console::{style, Emoji};

use coldstart::module::{self, ModuleDefinition};
use coldstart::{OptionsCatalog, Workspace};

static INFO: Emoji = Emoji("ℹ", "i");

/// Which section of `list` to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListKind {
    /// Languages and their code-language ids
    Languages,
    /// Frameworks grouped by language
    Frameworks,
    /// Target platforms
    Platforms,
    /// Installed library modules
    Modules,
}

impl ListKind {
    /// Parse a REPL word into a kind.
    ///
    /// # Errors
    ///
    /// Returns an error naming the accepted kinds.
    pub fn parse(raw: &str) -> Result<Self> {
        <Self as ValueEnum>::from_str(raw, true).map_err(|_| {
            anyhow!("unknown list kind `{raw}`; expected languages, frameworks, platforms, or modules")
        })
    }
}

/// Print the catalog and the module library without mutating anything
pub struct ListCommand {
    kind: Option<ListKind>,
}

impl ListCommand {
    /// Create a new command instance; `None` lists every section.
    #[must_use]
    pub const fn new(kind: Option<ListKind>) -> Self {
        Self { kind }
    }

    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error when the library or its catalog cannot be read.
    pub fn execute(&self) -> Result<()> {
        let workspace = Workspace::discover()?;
        let catalog = OptionsCatalog::load(&workspace.library())
            .context("Failed to load the options catalog")?;

        match self.kind {
            Some(ListKind::Languages) => print_languages(&catalog),
            Some(ListKind::Frameworks) => print_frameworks(&catalog),
            Some(ListKind::Platforms) => print_platforms(&catalog),
            Some(ListKind::Modules) => {
                print_modules(&module::list_modules(&workspace.library())?);
            }
            None => {
                print_languages(&catalog);
                println!();
                print_frameworks(&catalog);
                println!();
                print_platforms(&catalog);
                println!();
                print_modules(&module::list_modules(&workspace.library())?);
            }
        }
        Ok(())
    }
}

fn print_languages(catalog: &OptionsCatalog) {
    println!("{}", style("Languages:").bold());
    for language in &catalog.languages {
        println!(
            "  {} {} {}{}",
            style(&language.id).cyan(),
            style("-").dim(),
            language.name,
            default_marker(language.default)
        );
    }
}

fn print_frameworks(catalog: &OptionsCatalog) {
    println!("{}", style("Frameworks:").bold());
    for language in &catalog.languages {
        if language.frameworks.is_empty() {
            continue;
        }
        println!("  {}", style(&language.name).dim());
        for framework in &language.frameworks {
            println!(
                "    {} {} {} (build: {}){}",
                style(&framework.id).cyan(),
                style("-").dim(),
                framework.name,
                framework.build_tool,
                default_marker(framework.default)
            );
        }
    }
}

fn print_platforms(catalog: &OptionsCatalog) {
    println!("{}", style("Platforms:").bold());
    for platform in &catalog.platforms {
        println!(
            "  {} {} {}{}",
            style(&platform.id).cyan(),
            style("-").dim(),
            platform.name,
            default_marker(platform.default)
        );
    }
}

fn print_modules(modules: &[ModuleDefinition]) {
    println!("{}", style("Modules:").bold());
    if modules.is_empty() {
        println!("  {} none installed; create one with `add-module`", INFO);
        return;
    }
    for module in modules {
        println!(
            "  {} {} {} [{} {{priority {}}}]",
            style(&module.module_id).cyan(),
            style("-").dim(),
            module.module_description,
            module.module_type,
            module.priority
        );
        if !module.parameters.is_empty() {
            let names: Vec<&str> = module.parameters.keys().map(String::as_str).collect();
            println!("    {} {}", style("parameters:").dim(), names.join(", "));
        }
    }
}

fn default_marker(default: bool) -> console::StyledObject<&'static str> {
    if default {
        style(" (default)").dim()
    } else {
        style("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_parse_case_insensitively() {
        assert_eq!(ListKind::parse("languages").unwrap(), ListKind::Languages);
        assert_eq!(ListKind::parse("MODULES").unwrap(), ListKind::Modules);
        assert!(ListKind::parse("colors").is_err());
    }
}
