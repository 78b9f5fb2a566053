//! On-disk layout: tool root, template library, staging area, target project
//!
//! The tool root is the directory holding the `rules_template/` library and
//! the `.cold-start-staging/` working tree. It is resolved from
//! `$COLDSTART_HOME`, the current directory, or the executable's location,
//! in that order.

use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Directory name of the template library under the tool root.
pub const LIBRARY_DIR: &str = "rules_template";

/// Directory name of the staging area under the tool root.
pub const STAGING_DIR: &str = ".cold-start-staging";

/// Environment variable overriding tool-root discovery.
pub const HOME_ENV: &str = "COLDSTART_HOME";

/// Resolved tool root with accessors for the library and staging trees.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Uses `root` as the tool root without probing for the library.
    #[must_use]
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Locates the tool root.
    ///
    /// Order: `$COLDSTART_HOME` (must contain the library), the current
    /// directory, the executable's directory, then that directory's parent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateNotFound`] when no candidate contains a
    /// `rules_template/` directory, and [`Error::Io`] when the current
    /// directory or executable path cannot be read.
    pub fn discover() -> Result<Self> {
        if let Some(home) = env::var_os(HOME_ENV) {
            let root = PathBuf::from(home);
            if root.join(LIBRARY_DIR).is_dir() {
                return Ok(Self { root });
            }
            return Err(Error::TemplateNotFound {
                path: root.join(LIBRARY_DIR),
            });
        }

        let cwd = env::current_dir().map_err(|e| Error::io("<current dir>", e))?;
        if cwd.join(LIBRARY_DIR).is_dir() {
            return Ok(Self { root: cwd });
        }

        let exe = env::current_exe().map_err(|e| Error::io("<executable>", e))?;
        if let Some(dir) = exe.parent() {
            if dir.join(LIBRARY_DIR).is_dir() {
                return Ok(Self {
                    root: dir.to_path_buf(),
                });
            }
            if let Some(parent) = dir.parent() {
                if parent.join(LIBRARY_DIR).is_dir() {
                    return Ok(Self {
                        root: parent.to_path_buf(),
                    });
                }
            }
        }

        Err(Error::TemplateNotFound {
            path: cwd.join(LIBRARY_DIR),
        })
    }

    /// Tool root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Template library under this root.
    #[must_use]
    pub fn library(&self) -> TemplateLibrary {
        TemplateLibrary {
            root: self.root.join(LIBRARY_DIR),
        }
    }

    /// Staging area under this root.
    #[must_use]
    pub fn staging(&self) -> Staging {
        Staging {
            dir: self.root.join(STAGING_DIR),
        }
    }
}

/// Read-mostly template library tree (`rules_template/`).
#[derive(Debug, Clone)]
pub struct TemplateLibrary {
    root: PathBuf,
}

impl TemplateLibrary {
    /// Opens a library rooted at `root` (tests point this at fixtures).
    #[must_use]
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Library root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `options.json` catalog path.
    #[must_use]
    pub fn options_file(&self) -> PathBuf {
        self.root.join("options.json")
    }

    /// Blank staging config template.
    #[must_use]
    pub fn config_template(&self) -> PathBuf {
        self.root.join("config.template.json")
    }

    /// Plan template directory.
    #[must_use]
    pub fn plans_dir(&self) -> PathBuf {
        self.root.join("templates").join("plans").join("common")
    }

    /// The initialization plan template (rendered, not copied).
    #[must_use]
    pub fn plan_template(&self) -> PathBuf {
        self.plans_dir().join("00-project-init-plan.mdc")
    }

    /// The project-description document (copied verbatim).
    #[must_use]
    pub fn description_template(&self) -> PathBuf {
        self.plans_dir().join("01-project-description.md")
    }

    /// Rule template directory for one category.
    #[must_use]
    pub fn rules_dir(&self, category: &str) -> PathBuf {
        self.root.join("templates").join("rules").join(category)
    }

    /// Module library directory.
    #[must_use]
    pub fn modules_dir(&self) -> PathBuf {
        self.root.join("templates").join("modules")
    }

    /// Directory of one module.
    #[must_use]
    pub fn module_dir(&self, id: &str) -> PathBuf {
        self.modules_dir().join(id)
    }

    /// Extraction staging area for one classifier category.
    #[must_use]
    pub fn extract_rules_dir(&self, category: &str) -> PathBuf {
        self.root.join("extract").join("rules").join(category)
    }

    /// Cumulative extraction integration log.
    #[must_use]
    pub fn integration_log(&self) -> PathBuf {
        self.root
            .join("extract")
            .join("integration")
            .join("integration-log.md")
    }
}

/// Staging working tree (`.cold-start-staging/`).
#[derive(Debug, Clone)]
pub struct Staging {
    dir: PathBuf,
}

impl Staging {
    /// Opens a staging tree at `dir`.
    #[must_use]
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Staging root directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// In-progress staging config file.
    #[must_use]
    pub fn config_file(&self) -> PathBuf {
        self.dir.join("config.json")
    }

    /// Staged plan documents.
    #[must_use]
    pub fn plans_dir(&self) -> PathBuf {
        self.dir.join("plans")
    }

    /// Staged rule documents.
    #[must_use]
    pub fn rules_dir(&self) -> PathBuf {
        self.dir.join("rules")
    }
}

/// A target project directory receiving rendered output.
#[derive(Debug, Clone)]
pub struct TargetProject {
    root: PathBuf,
}

impl TargetProject {
    /// Wraps a target project directory.
    #[must_use]
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Target project root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `.cursor/plans` under the target.
    #[must_use]
    pub fn plans_dir(&self) -> PathBuf {
        self.root.join(".cursor").join("plans")
    }

    /// `.cursor/rules` under the target.
    #[must_use]
    pub fn rules_dir(&self) -> PathBuf {
        self.root.join(".cursor").join("rules")
    }

    /// `.cold-start` state directory under the target.
    #[must_use]
    pub fn state_dir(&self) -> PathBuf {
        self.root.join(".cold-start")
    }

    /// Persisted `project.json` path.
    #[must_use]
    pub fn config_file(&self) -> PathBuf {
        self.state_dir().join("project.json")
    }

    /// README written beside `project.json`.
    #[must_use]
    pub fn readme_file(&self) -> PathBuf {
        self.state_dir().join("README.md")
    }

    /// Legacy flat config file from older tool versions.
    #[must_use]
    pub fn legacy_config_file(&self) -> PathBuf {
        self.root.join(".cold-start-config.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn library_paths_follow_the_documented_layout() {
        let lib = TemplateLibrary::at("/tmp/lib");
        assert_eq!(lib.options_file(), Path::new("/tmp/lib/options.json"));
        assert_eq!(
            lib.rules_dir("languages"),
            Path::new("/tmp/lib/templates/rules/languages")
        );
        assert_eq!(
            lib.module_dir("network-module"),
            Path::new("/tmp/lib/templates/modules/network-module")
        );
        assert_eq!(
            lib.integration_log(),
            Path::new("/tmp/lib/extract/integration/integration-log.md")
        );
    }

    #[test]
    fn target_paths_follow_the_documented_layout() {
        let target = TargetProject::at("/tmp/app");
        assert_eq!(target.rules_dir(), Path::new("/tmp/app/.cursor/rules"));
        assert_eq!(
            target.config_file(),
            Path::new("/tmp/app/.cold-start/project.json")
        );
        assert_eq!(
            target.legacy_config_file(),
            Path::new("/tmp/app/.cold-start-config.json")
        );
    }

    #[test]
    fn workspace_wires_library_and_staging_under_the_root() {
        let ws = Workspace::at("/srv/coldstart");
        assert_eq!(
            ws.library().root(),
            Path::new("/srv/coldstart/rules_template")
        );
        assert_eq!(
            ws.staging().config_file(),
            Path::new("/srv/coldstart/.cold-start-staging/config.json")
        );
    }
}
