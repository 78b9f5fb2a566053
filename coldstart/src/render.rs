//! Template rendering and placeholder values
//!
//! Thin wrapper around handlebars with HTML escaping disabled (output is
//! Markdown, not HTML) plus the builders for the placeholder value set both
//! the staging pipeline and the project-driven stages render with.

use std::path::Path;

use handlebars::Handlebars;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::catalog::OptionsCatalog;
use crate::config::{now_display, ProjectConfig, StagingConfig};
use crate::error::{Error, Result};
use crate::fsutil;

/// Matches a placeholder token that survived rendering, e.g. `{{ PROJECT_NAME }}`.
static UNRENDERED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*[A-Z][A-Z0-9_]*\s*\}\}").expect("invalid placeholder regex")
});

/// Default `MODULE_NAME` when no module is in play.
const DEFAULT_MODULE_NAME: &str = "app";

/// Default `MODULE_PATH` glob.
const DEFAULT_MODULE_PATH: &str = "**";

/// Template renderer.
pub struct Renderer {
    handlebars: Handlebars<'static>,
}

impl Renderer {
    /// Renderer with escaping disabled.
    #[must_use]
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);
        Self { handlebars }
    }

    /// Renders a template string.
    ///
    /// # Errors
    ///
    /// [`Error::Render`] tagged with `name` when the template is malformed.
    pub fn render(&self, name: &str, template: &str, values: &Value) -> Result<String> {
        self.handlebars
            .render_template(template, values)
            .map_err(|e| Error::render(name, e))
    }

    /// Reads and renders a template file.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] when the file cannot be read, [`Error::Render`] when it
    /// does not render.
    pub fn render_file(&self, path: &Path, values: &Value) -> Result<String> {
        let template = fsutil::read(path)?;
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| {
                n.to_string_lossy().into_owned()
            });
        self.render(&name, &template, values)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// The placeholder set templates render with.
#[derive(Debug, Clone)]
pub struct Placeholders {
    values: Map<String, Value>,
}

impl Placeholders {
    /// Values for the staging pipeline (`init`/`process`/`export`).
    ///
    /// `GENERATION_DATE` comes from the staging config's `created_at`, so
    /// re-running `process` on an unchanged config reproduces identical
    /// bytes.
    #[must_use]
    pub fn from_staging(cfg: &StagingConfig, catalog: &OptionsCatalog) -> Self {
        let date = if cfg.created_at.is_empty() {
            now_display()
        } else {
            cfg.created_at.clone()
        };
        let platforms: Vec<String> = cfg
            .platforms
            .iter()
            .map(|id| catalog.platform_display(id))
            .collect();
        Self::base(
            &cfg.project_name,
            cfg.project_description.as_deref().unwrap_or(""),
            &cfg.language.name,
            &cfg.language.code_language,
            &cfg.language.id,
            &cfg.framework.name,
            &cfg.framework.id,
            &cfg.framework.build_tool,
            &platforms.join(", "),
            cfg.enable_github_action,
            &date,
        )
    }

    /// Values for the project-driven stages (`inject`/`update-rules`).
    #[must_use]
    pub fn from_project(cfg: &ProjectConfig, generation_date: &str) -> Self {
        let platforms: Vec<&str> = cfg
            .technology
            .platforms
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        let mut placeholders = Self::base(
            &cfg.project.name,
            &cfg.project.description,
            &cfg.technology.language.name,
            &cfg.technology.language.code_language,
            &cfg.technology.language.id,
            &cfg.technology.framework.name,
            &cfg.technology.framework.id,
            &cfg.technology.framework.build_tool,
            &platforms.join(", "),
            cfg.config.enable_github_action,
            generation_date,
        );
        let log = &cfg.config.log_service;
        placeholders.set("LOGGER_SERVICE_CLASS", &log.class);
        placeholders.set("LOG_FILE_PATH", &log.file_path);
        placeholders.set("LOG_COLLECT_SCRIPT_PATH", &log.collect_script);
        placeholders.set("LOG_COLLECT_COMMAND", &collect_command(&log.collect_script));
        placeholders
    }

    #[allow(clippy::too_many_arguments)]
    fn base(
        project_name: &str,
        description: &str,
        language_name: &str,
        code_language: &str,
        language_id: &str,
        framework_name: &str,
        framework_id: &str,
        build_tool: &str,
        target_platforms: &str,
        enable_github_action: bool,
        generation_date: &str,
    ) -> Self {
        let mut values = Map::new();
        let (deploy_build, deploy_output, deploy_notes) = deploy_snippets(framework_id);

        let mut set = |key: &str, value: &str| {
            values.insert(key.to_string(), Value::String(value.to_string()));
        };
        set("PROJECT_NAME", project_name);
        set("PROJECT_DESCRIPTION", description);
        set("PROGRAMMING_LANGUAGE", language_name);
        set("CODE_LANGUAGE", code_language);
        set("CODE_LANGUAGE_EXT", language_ext(language_id));
        set("FRAMEWORK", framework_name);
        set("BUILD_TOOL", build_tool);
        set("TARGET_PLATFORMS", target_platforms);
        set("MODULE_NAME", DEFAULT_MODULE_NAME);
        set("MODULE_PATH", DEFAULT_MODULE_PATH);
        set("GENERATION_DATE", generation_date);
        set("LOGGER_SERVICE_CLASS", "Logger");
        set("LOG_FILE_PATH", "logs/app.log");
        set("LOG_COLLECT_SCRIPT_PATH", "scripts/collect_logs.sh");
        set("LOG_COLLECT_COMMAND", "./scripts/collect_logs.sh");
        set("ADDITIONAL_API_METHODS", api_methods(language_id));
        set("DEPLOY_BUILD_COMMAND", deploy_build);
        set("DEPLOY_OUTPUT_HINT", deploy_output);
        set("DEPLOY_NOTES", deploy_notes);
        values.insert(
            "ENABLE_GITHUB_ACTION".to_string(),
            Value::Bool(enable_github_action),
        );
        Self { values }
    }

    /// Overrides or adds one value.
    pub fn set(&mut self, key: &str, value: &str) {
        self.values
            .insert(key.to_string(), Value::String(value.to_string()));
    }

    /// Layers module parameters on top; parameters win over base values.
    #[must_use]
    pub fn with_params(mut self, params: &IndexMap<String, String>) -> Self {
        for (key, value) in params {
            self.set(key, value);
        }
        self
    }

    /// The value map handed to the renderer.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.values)
    }

    /// Read access for reporting and tests.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }
}

/// File extension rendered into `CODE_LANGUAGE_EXT`.
#[must_use]
pub fn language_ext(language_id: &str) -> &'static str {
    match language_id {
        "dart" => "dart",
        "typescript" => "ts",
        "javascript" => "js",
        "python" => "py",
        "kotlin" => "kt",
        "swift" => "swift",
        _ => "txt",
    }
}

/// True when rendered output still carries a `{{ PLACEHOLDER }}` token.
#[must_use]
pub fn has_unrendered_placeholder(content: &str) -> bool {
    UNRENDERED.is_match(content)
}

/// Extra API-surface hints for languages whose templates document them.
fn api_methods(language_id: &str) -> &'static str {
    match language_id {
        "typescript" | "javascript" => {
            "- Provide `patch` and `delete` wrappers alongside `get`/`post`."
        }
        _ => "",
    }
}

/// Deploy-section snippet trio per framework.
fn deploy_snippets(framework_id: &str) -> (&'static str, &'static str, &'static str) {
    match framework_id {
        "flutter" => (
            "flutter build apk --release",
            "build/app/outputs/flutter-apk/",
            "Sign the bundle before uploading to a store.",
        ),
        "react" => (
            "npm run build",
            "dist/",
            "Serve the build output behind a CDN.",
        ),
        "django" => (
            "python manage.py collectstatic --noinput",
            "staticfiles/",
            "Run migrations before switching traffic over.",
        ),
        _ => (
            "make build",
            "build/",
            "Document the deploy target for this stack.",
        ),
    }
}

fn collect_command(script: &str) -> String {
    if script.starts_with('/') || script.starts_with("./") {
        script.to_string()
    } else {
        format!("./{script}")
    }
}
