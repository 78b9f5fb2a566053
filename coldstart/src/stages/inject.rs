//! `inject`: add a module's rule files to an initialized project.

use std::path::PathBuf;

use indexmap::IndexMap;

use crate::config::{now_display, now_rfc3339, ModuleRecord, ProjectConfig, RuleRecord};
use crate::error::{Error, Result};
use crate::fsutil;
use crate::module;
use crate::render::{language_ext, Placeholders, Renderer};
use crate::resolve;
use crate::workspace::{TargetProject, Workspace};

/// What to inject and with which parameter values.
#[derive(Debug, Clone)]
pub struct InjectRequest {
    /// Module id, matching a directory under the library's `modules/`.
    pub module_id: String,
    /// Values for the module's declared parameters; missing optional ones
    /// fall back to their defaults.
    pub parameters: IndexMap<String, String>,
}

/// What `inject` wrote.
#[derive(Debug)]
pub struct InjectOutcome {
    /// Module id as injected.
    pub module_id: String,
    /// Display name recorded for the module.
    pub module_name: String,
    /// Rendered rule file names, in write order.
    pub files: Vec<String>,
    /// Advisory compatibility mismatches; injection proceeded regardless.
    pub warnings: Vec<String>,
    /// True when this module had been injected before and its record was
    /// replaced rather than appended.
    pub reinjected: bool,
    /// The updated `project.json`.
    pub config_file: PathBuf,
}

/// Renders a module's templates into the target's rules directory and
/// records the injection in `project.json`.
///
/// The project is loaded through the three-tier fallback, so injection
/// works on projects initialized by older tool versions. Compatibility
/// declarations are advisory: a mismatch produces warnings in the outcome,
/// never a failure.
///
/// # Errors
///
/// [`Error::TemplateNotFound`] when the module or its templates do not
/// exist, [`Error::MissingRequiredParameter`] per
/// [`module::collect_parameters`], plus load, render, and I/O errors.
pub fn inject(
    workspace: &Workspace,
    target: &TargetProject,
    request: &InjectRequest,
) -> Result<InjectOutcome> {
    let library = workspace.library();
    let mut project = ProjectConfig::load(target)?;

    let module_dir = library.module_dir(&request.module_id);
    if !module_dir.is_dir() {
        return Err(Error::TemplateNotFound { path: module_dir });
    }
    let definition = module::load_definition(&module_dir)?;
    let warnings = definition.compatibility_warnings(
        &project.technology.language.id,
        &project.technology.framework.id,
    );

    let resolved = resolve::module_rules(&module_dir, definition.priority)?;
    if resolved.is_empty() {
        return Err(Error::TemplateNotFound { path: module_dir });
    }

    let display_name = if definition.module_name.is_empty() {
        definition.module_id.clone()
    } else {
        definition.module_name.clone()
    };

    // PROJECT_NAME, CODE_LANGUAGE, and CODE_LANGUAGE_EXT come from the
    // project record, so a module may declare them required without the
    // caller supplying values.
    let mut provided = request.parameters.clone();
    for (name, value) in [
        ("PROJECT_NAME", project.project.name.clone()),
        (
            "CODE_LANGUAGE",
            project.technology.language.code_language.clone(),
        ),
        (
            "CODE_LANGUAGE_EXT",
            language_ext(&project.technology.language.id).to_string(),
        ),
    ] {
        provided.entry(name.to_string()).or_insert(value);
    }
    let parameters = module::collect_parameters(&definition, &provided)?;
    let mut placeholders = Placeholders::from_project(&project, &now_display());
    placeholders.set("MODULE_NAME", &display_name);
    placeholders.set("MODULE_DESCRIPTION", &definition.module_description);
    let values = placeholders.with_params(&parameters).into_value();

    let rules_dir = target.rules_dir();
    fsutil::create_dir_all(&rules_dir)?;
    let renderer = Renderer::new();
    let mut files = Vec::new();
    let mut records = Vec::new();
    for rule in &resolved {
        let rendered = renderer.render_file(&rule.template_path, &values)?;
        fsutil::write(&rules_dir.join(&rule.file_name), &rendered)?;
        records.push(RuleRecord::for_rule(&rule.file_name));
        files.push(rule.file_name.clone());
    }

    let reinjected = project
        .modules
        .injected
        .iter()
        .any(|m| m.id == definition.module_id);
    project.upsert_module(ModuleRecord {
        id: definition.module_id.clone(),
        name: display_name.clone(),
        kind: definition.module_type.as_str().to_string(),
        injected_at: now_rfc3339(),
        files: records.clone(),
    });
    project.merge_rule_files(records);
    project.save(target)?;

    Ok(InjectOutcome {
        module_id: definition.module_id,
        module_name: display_name,
        files,
        warnings,
        reinjected,
        config_file: target.config_file(),
    })
}
