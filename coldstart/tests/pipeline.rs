//! Integration tests for the full scaffolding pipeline
//!
//! Each test seeds a template library under a temp dir, runs real stages
//! against it, and asserts on the files and `project.json` they leave
//! behind. Stages are exercised in the order the CLI runs them so that
//! each one consumes the previous one's real output.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use coldstart::stages::{self, InitAnswers, InjectRequest, UpdateStatus};
use coldstart::{OptionsCatalog, ProjectConfig, RuleKind, TargetProject, Workspace};

/// Init, process, and export produce the documented `.cursor/` tree and a
/// fully populated `project.json`.
#[test]
fn full_pipeline_scaffolds_a_new_project() {
    let tool = TempDir::new().unwrap();
    let target_dir = TempDir::new().unwrap();
    seed_library(tool.path());

    let workspace = Workspace::at(tool.path());
    let catalog = OptionsCatalog::load(&workspace.library()).unwrap();
    let target = TargetProject::at(target_dir.path());

    stages::init(&workspace, &catalog, &answers("Demo")).unwrap();
    let processed = stages::process(&workspace, &catalog).unwrap();
    let staged: Vec<&str> = processed.rules.iter().map(|r| r.file_name.as_str()).collect();
    assert_eq!(
        staged,
        ["00-core.mdc", "10-python.mdc", "20-django.mdc", "30-web.mdc"]
    );

    let exported = stages::export(&workspace, &catalog, &target).unwrap();
    assert_eq!(exported.plans.len(), 2);
    assert_eq!(exported.rules.len(), 4);

    for name in ["00-core.mdc", "10-python.mdc", "20-django.mdc", "30-web.mdc"] {
        assert!(target.rules_dir().join(name).is_file(), "missing rule {name}");
    }
    assert!(target.plans_dir().join("00-project-init-plan.mdc").is_file());
    assert!(target.plans_dir().join("01-project-description.md").is_file());
    assert!(target.readme_file().is_file());

    // Placeholders were rendered, not copied through.
    let python = fs::read_to_string(target.rules_dir().join("10-python.mdc")).unwrap();
    assert!(python.contains("Install with pip."));
    assert!(!python.contains("{{"));
    let plan = fs::read_to_string(target.plans_dir().join("00-project-init-plan.mdc")).unwrap();
    assert!(plan.contains("# Demo Plan"));
    assert!(plan.contains("Stack: Python + Django"));

    let config = ProjectConfig::load_strict(&target).unwrap();
    assert_eq!(config.version, "1.0.0");
    assert_eq!(config.generated_by, "coldstart");
    assert_eq!(config.project.name, "Demo");
    assert_eq!(config.technology.language.id, "python");
    assert_eq!(config.technology.language.name, "Python");
    assert_eq!(config.technology.framework.id, "django");
    assert_eq!(config.technology.framework.build_tool, "pip");
    assert_eq!(config.technology.platforms.len(), 1);
    assert_eq!(config.technology.platforms[0].id, "web");
    assert_eq!(config.technology.platforms[0].name, "Web");
    assert!(config.config.enable_github_action);
    assert_eq!(config.files.plans.len(), 2);
    assert_eq!(config.files.rules.len(), 4);
    assert_eq!(config.files.rules[0].path, ".cursor/rules/00-core.mdc");
    assert!(config.modules.injected.is_empty());
}

/// Injecting a module renders its templates with project and parameter
/// values and records the module in `project.json`.
#[test]
fn inject_extends_an_exported_project() {
    let (tool, target_dir) = scaffolded_project("Demo");
    let workspace = Workspace::at(tool.path());
    let target = TargetProject::at(target_dir.path());

    let mut request = InjectRequest {
        module_id: "network-module".to_string(),
        parameters: indexmap::IndexMap::new(),
    };
    request
        .parameters
        .insert("BASE_URL".to_string(), "https://api.example.com".to_string());

    let outcome = stages::inject(&workspace, &target, &request).unwrap();
    assert_eq!(outcome.module_name, "Network Layer");
    assert!(!outcome.reinjected);
    assert_eq!(outcome.files, vec!["40-network-module.mdc"]);

    let body = fs::read_to_string(target.rules_dir().join("40-network-module.mdc")).unwrap();
    assert!(body.contains("# Network Layer (Demo)"));
    assert!(body.contains("Base URL: https://api.example.com"));
    assert!(body.contains("Timeout: 30s"), "default parameter not applied: {body}");

    let config = ProjectConfig::load_strict(&target).unwrap();
    assert_eq!(config.modules.injected.len(), 1);
    let module = &config.modules.injected[0];
    assert_eq!(module.id, "network-module");
    assert_eq!(module.kind, "feature");
    assert_eq!(module.files.len(), 1);
    assert_eq!(module.files[0].kind, RuleKind::Module);
    // The module file also joined the flat rule list.
    assert!(config
        .files
        .rules
        .iter()
        .any(|r| r.name == "40-network-module.mdc"));
}

/// A second injection of the same module overwrites its files and replaces
/// its record instead of appending a duplicate.
#[test]
fn reinject_replaces_the_module_record() {
    let (tool, target_dir) = scaffolded_project("Demo");
    let workspace = Workspace::at(tool.path());
    let target = TargetProject::at(target_dir.path());

    let first = request_with_url("https://api.example.com");
    stages::inject(&workspace, &target, &first).unwrap();
    let second = request_with_url("https://api.internal");
    let outcome = stages::inject(&workspace, &target, &second).unwrap();
    assert!(outcome.reinjected);

    let body = fs::read_to_string(target.rules_dir().join("40-network-module.mdc")).unwrap();
    assert!(body.contains("https://api.internal"));
    assert!(!body.contains("https://api.example.com"));

    let config = ProjectConfig::load_strict(&target).unwrap();
    assert_eq!(config.modules.injected.len(), 1);
    let flat: Vec<_> = config
        .files
        .rules
        .iter()
        .filter(|r| r.name == "40-network-module.mdc")
        .collect();
    assert_eq!(flat.len(), 1, "flat rule list grew a duplicate");
}

/// `update-rules` overwrites drifted files from the library and reports
/// line-level change counts.
#[test]
fn update_rules_restores_hand_edited_files() {
    let (tool, target_dir) = scaffolded_project("Demo");
    let workspace = Workspace::at(tool.path());
    let catalog = OptionsCatalog::load(&workspace.library()).unwrap();
    let target = TargetProject::at(target_dir.path());

    let edited = target.rules_dir().join("10-python.mdc");
    fs::write(&edited, "# Python Conventions\nUse whatever you like.\n").unwrap();

    let outcome = stages::update_rules(&workspace, &catalog, &target).unwrap();
    let python = outcome
        .updates
        .iter()
        .find(|u| u.file_name == "10-python.mdc")
        .unwrap();
    assert_eq!(
        python.status,
        UpdateStatus::Updated { added: 1, removed: 1 }
    );

    let body = fs::read_to_string(&edited).unwrap();
    assert!(body.contains("Install with pip."));
    assert!(!body.contains("whatever"));
}

/// Candidate classification keeps project-specific files out of the offer,
/// and extraction copies the selection into the library's extract area and
/// logs it.
#[test]
fn extract_rules_harvests_generalizable_files() {
    let (tool, target_dir) = scaffolded_project("Demo");
    let workspace = Workspace::at(tool.path());
    let target = TargetProject::at(target_dir.path());

    let candidates = stages::extract_candidates(&target).unwrap();
    assert_eq!(candidates.project_name, "Demo");
    // 00-core carries the core-identity marker, 20-django mentions the
    // project by name; the rest generalize.
    assert!(candidates.project_specific.contains(&"00-core.mdc".to_string()));
    assert!(candidates.project_specific.contains(&"20-django.mdc".to_string()));
    assert!(candidates.extractable.contains(&"10-python.mdc".to_string()));
    assert!(candidates.extractable.contains(&"30-web.mdc".to_string()));

    let outcome =
        stages::extract_rules(&workspace, &target, &["10-python.mdc".to_string()]).unwrap();
    assert_eq!(outcome.extracted.len(), 1);
    let rule = &outcome.extracted[0];
    assert_eq!(rule.kind, RuleKind::Language);

    let dest = workspace
        .library()
        .extract_rules_dir("languages")
        .join("10-python.md");
    assert_eq!(rule.destination, dest);
    let body = fs::read_to_string(&dest).unwrap();
    assert!(body.starts_with("> Extracted from project `Demo`"));
    assert!(body.contains("Source: `.cursor/rules/10-python.mdc`"));
    assert!(body.contains("Install with pip."));

    let log = fs::read_to_string(outcome.log_file.unwrap()).unwrap();
    assert!(log.starts_with("# Rule Integration Log"));
    assert!(log.contains("`10-python.mdc` from `Demo` -> `rules/languages/10-python.md`"));
}

/// `init-config` writes `project.json` for a project that has rule files
/// but never went through staging, scanning what is already on disk.
#[test]
fn init_config_bootstraps_without_staging() {
    let target_dir = TempDir::new().unwrap();
    let target = TargetProject::at(target_dir.path());
    fs::create_dir_all(target.rules_dir()).unwrap();
    fs::write(target.rules_dir().join("00-core.mdc"), "# Old Core Project Rules\n").unwrap();
    fs::write(target.rules_dir().join("10-python.mdc"), "# Python\n").unwrap();

    let catalog = OptionsCatalog::default();
    let answers = InitAnswers {
        project_name: "Old".to_string(),
        language_id: "python".to_string(),
        framework_id: String::new(),
        platform_ids: vec!["web".to_string()],
        enable_github_action: false,
        project_description: None,
    };

    let outcome = stages::init_config(&catalog, &target, &answers, false).unwrap();
    let stages::InitConfigOutcome::Created { config_file, config } = outcome else {
        panic!("expected a fresh config");
    };
    assert!(config_file.is_file());
    assert_eq!(config.project.name, "Old");
    assert_eq!(config.files.rules.len(), 2);

    // A second run without `overwrite` leaves the file alone.
    let again = stages::init_config(&catalog, &target, &answers, false).unwrap();
    assert!(matches!(
        again,
        stages::InitConfigOutcome::AlreadyInitialized { .. }
    ));
}

fn answers(name: &str) -> InitAnswers {
    InitAnswers {
        project_name: name.to_string(),
        language_id: "python".to_string(),
        framework_id: "django".to_string(),
        platform_ids: vec!["web".to_string()],
        enable_github_action: true,
        project_description: Some("A demo project.".to_string()),
    }
}

fn request_with_url(url: &str) -> InjectRequest {
    let mut parameters = indexmap::IndexMap::new();
    parameters.insert("BASE_URL".to_string(), url.to_string());
    InjectRequest {
        module_id: "network-module".to_string(),
        parameters,
    }
}

/// Runs init, process, and export into fresh temp dirs and hands back both
/// roots so follow-up stages can keep going.
fn scaffolded_project(name: &str) -> (TempDir, TempDir) {
    let tool = TempDir::new().unwrap();
    let target_dir = TempDir::new().unwrap();
    seed_library(tool.path());

    let workspace = Workspace::at(tool.path());
    let catalog = OptionsCatalog::load(&workspace.library()).unwrap();
    let target = TargetProject::at(target_dir.path());

    stages::init(&workspace, &catalog, &answers(name)).unwrap();
    stages::process(&workspace, &catalog).unwrap();
    stages::export(&workspace, &catalog, &target).unwrap();
    (tool, target_dir)
}

/// Seeds a minimal but complete template library: catalog, plan templates,
/// one rule template per category, and one injectable module.
fn seed_library(root: &Path) {
    let lib = root.join("rules_template");
    for sub in [
        "templates/plans/common",
        "templates/rules/common",
        "templates/rules/languages",
        "templates/rules/frameworks",
        "templates/rules/platforms",
        "templates/modules/network-module",
    ] {
        fs::create_dir_all(lib.join(sub)).unwrap();
    }

    fs::write(lib.join("config.template.json"), "{}\n").unwrap();
    fs::write(
        lib.join("options.json"),
        r#"{
  "languages": [
    {"id": "python", "name": "Python", "codeLanguage": "python", "default": true,
     "frameworks": [{"id": "django", "name": "Django", "buildTool": "pip", "default": true}]}
  ],
  "platforms": [
    {"id": "web", "name": "Web", "default": true},
    {"id": "android", "name": "Android"}
  ]
}"#,
    )
    .unwrap();

    fs::write(
        lib.join("templates/plans/common/00-project-init-plan.mdc"),
        "# {{PROJECT_NAME}} Plan\nGenerated {{GENERATION_DATE}}\nStack: {{PROGRAMMING_LANGUAGE}} + {{FRAMEWORK}}\n",
    )
    .unwrap();
    fs::write(
        lib.join("templates/plans/common/01-project-description.md"),
        "Describe the project here.\n",
    )
    .unwrap();

    fs::write(
        lib.join("templates/rules/common/00-core.mdc.template"),
        "# {{PROJECT_NAME}} Core Project Rules\nLanguage: {{CODE_LANGUAGE}}\n",
    )
    .unwrap();
    fs::write(
        lib.join("templates/rules/languages/10-python.mdc.template"),
        "# Python Conventions\nInstall with {{BUILD_TOOL}}.\n",
    )
    .unwrap();
    fs::write(
        lib.join("templates/rules/frameworks/20-django.mdc.template"),
        "# Django Conventions\nProject: {{PROJECT_NAME}}\n",
    )
    .unwrap();
    fs::write(
        lib.join("templates/rules/platforms/30-web.mdc.template"),
        "# Web Platform\nTargets: {{TARGET_PLATFORMS}}\n",
    )
    .unwrap();

    fs::write(
        lib.join("templates/modules/network-module/module.config.json"),
        r#"{
  "moduleId": "network-module",
  "moduleName": "Network Layer",
  "moduleDescription": "HTTP client conventions",
  "moduleType": "feature",
  "priority": 40,
  "parameters": {
    "BASE_URL": {"description": "API origin", "required": true},
    "TIMEOUT_SECONDS": {"description": "Request timeout", "default": "30"}
  }
}"#,
    )
    .unwrap();
    fs::write(
        lib.join("templates/modules/network-module/network-module.mdc.template"),
        "# {{MODULE_NAME}} ({{PROJECT_NAME}})\nBase URL: {{BASE_URL}}\nTimeout: {{TIMEOUT_SECONDS}}s\n",
    )
    .unwrap();
}
