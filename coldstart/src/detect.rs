//! Best-effort project stack detection
//!
//! Feeds `init-config` defaults and the configuration store's inference
//! fallback. Two sources: keyword scanning of existing rule files (names and
//! contents) and well-known build manifests in the target tree. Callers
//! treat the results as defaults to confirm, never as facts.

use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::classify::{
    matches_keyword, FRAMEWORK_KEYWORDS, LANGUAGE_KEYWORDS, PLATFORM_KEYWORDS,
};
use crate::error::Result;
use crate::fsutil;
use crate::workspace::TargetProject;

/// Heading phrase marking a rendered core-identity rule document.
pub const CORE_RULE_MARKER: &str = "Core Project Rules";

/// Captures the project name from a `# <name> Core Project Rules` heading.
static CORE_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^#\s*(.+?)\s+Core Project Rules\s*$").expect("invalid core heading regex")
});

/// What detection managed to recover; `None` means "no signal".
#[derive(Debug, Clone, Default)]
pub struct DetectedStack {
    /// Project name recovered from a core-identity heading.
    pub project_name: Option<String>,
    /// Language id.
    pub language: Option<String>,
    /// Framework id.
    pub framework: Option<String>,
    /// Platform ids, deduplicated, in keyword order per file.
    pub platforms: Vec<String>,
}

impl DetectedStack {
    fn push_platform(&mut self, id: &str) {
        if !self.platforms.iter().any(|p| p == id) {
            self.platforms.push(id.to_string());
        }
    }
}

/// Scans `*.mdc` files in a rules directory for language/framework/platform
/// keywords and a core-identity heading. First hit per field wins; files
/// that cannot be read as UTF-8 are skipped.
///
/// # Errors
///
/// [`crate::Error::Io`] only when the directory itself cannot be listed.
pub fn scan_rules_dir(rules_dir: &Path) -> Result<DetectedStack> {
    let mut stack = DetectedStack::default();
    for path in fsutil::files_with_suffix(rules_dir, ".mdc")? {
        let name_lower = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let content = fs::read_to_string(&path).unwrap_or_default();
        let content_lower = content.to_lowercase();

        if stack.language.is_none() {
            for &kw in LANGUAGE_KEYWORDS {
                if matches_keyword(&name_lower, &[kw]) || content_lower.contains(kw) {
                    stack.language = Some(kw.to_string());
                    break;
                }
            }
        }
        if stack.framework.is_none() {
            for &kw in FRAMEWORK_KEYWORDS {
                if matches_keyword(&name_lower, &[kw]) || content_lower.contains(kw) {
                    stack.framework = Some(kw.to_string());
                    break;
                }
            }
        }
        for &kw in PLATFORM_KEYWORDS {
            if matches_keyword(&name_lower, &[kw]) {
                stack.push_platform(kw);
            }
        }
        if stack.project_name.is_none() {
            stack.project_name = CORE_HEADING
                .captures(&content)
                .map(|c| c[1].trim().to_string());
        }
    }
    Ok(stack)
}

/// Detects the stack for a target project: rule-file scan first, then build
/// manifests override it (a manifest is a stronger signal than prose).
///
/// # Errors
///
/// [`crate::Error::Io`] only when the rules directory cannot be listed;
/// manifest probing never fails the call.
pub fn detect_project(target: &TargetProject) -> Result<DetectedStack> {
    let mut stack = scan_rules_dir(&target.rules_dir())?;
    let root = target.root();

    if root.join("pubspec.yaml").is_file() {
        stack.language = Some("dart".to_string());
        stack.framework = Some("flutter".to_string());
    }

    if let Ok(raw) = fs::read_to_string(root.join("package.json")) {
        if let Ok(pkg) = serde_json::from_str::<serde_json::Value>(&raw) {
            let has_dep = |name: &str| {
                ["dependencies", "devDependencies"].iter().any(|section| {
                    pkg.get(section)
                        .and_then(|deps| deps.get(name))
                        .is_some()
                })
            };
            if has_dep("react") {
                stack.language = Some("typescript".to_string());
                stack.framework = Some("react".to_string());
            } else if has_dep("vue") {
                stack.language = Some("typescript".to_string());
                stack.framework = Some("vue".to_string());
            }
        }
    }

    let requirements = fs::read_to_string(root.join("requirements.txt"))
        .or_else(|_| fs::read_to_string(root.join("pyproject.toml")));
    if let Ok(raw) = requirements {
        stack.language = Some("python".to_string());
        let lower = raw.to_lowercase();
        if lower.contains("django") {
            stack.framework = Some("django".to_string());
        } else if lower.contains("fastapi") {
            stack.framework = Some("fastapi".to_string());
        }
    }

    if ["build.gradle", "build.gradle.kts", "android/build.gradle"]
        .iter()
        .any(|p| root.join(p).is_file())
    {
        stack.language = Some("kotlin".to_string());
        stack.push_platform("android");
    }

    if has_xcodeproj(root) || has_xcodeproj(&root.join("ios")) {
        stack.language = Some("swift".to_string());
        stack.push_platform("ios");
    }

    Ok(stack)
}

fn has_xcodeproj(dir: &Path) -> bool {
    let Ok(entries) = fs::read_dir(dir) else {
        return false;
    };
    entries
        .flatten()
        .any(|e| e.path().extension().is_some_and(|ext| ext == "xcodeproj"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_scan_recovers_stack_and_project_name() {
        let dir = tempfile::tempdir().unwrap();
        let rules = dir.path().join("rules");
        fs::create_dir_all(&rules).unwrap();
        fs::write(
            rules.join("00-core.mdc"),
            "# Demo Core Project Rules\n\nBe consistent.\n",
        )
        .unwrap();
        fs::write(rules.join("10-python.mdc"), "# Python conventions\n").unwrap();
        fs::write(rules.join("30-web.mdc"), "# Web platform\n").unwrap();

        let stack = scan_rules_dir(&rules).unwrap();
        assert_eq!(stack.project_name.as_deref(), Some("Demo"));
        assert_eq!(stack.language.as_deref(), Some("python"));
        assert_eq!(stack.platforms, vec!["web".to_string()]);
    }

    #[test]
    fn pubspec_marks_dart_flutter() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("pubspec.yaml"), "name: demo\n").unwrap();

        let stack = detect_project(&TargetProject::at(dir.path())).unwrap();
        assert_eq!(stack.language.as_deref(), Some("dart"));
        assert_eq!(stack.framework.as_deref(), Some("flutter"));
    }

    #[test]
    fn package_json_with_react_marks_typescript() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{"dependencies": {"react": "^18.0.0"}}"#,
        )
        .unwrap();

        let stack = detect_project(&TargetProject::at(dir.path())).unwrap();
        assert_eq!(stack.language.as_deref(), Some("typescript"));
        assert_eq!(stack.framework.as_deref(), Some("react"));
    }

    #[test]
    fn gradle_marks_kotlin_android() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("build.gradle"), "plugins {}\n").unwrap();

        let stack = detect_project(&TargetProject::at(dir.path())).unwrap();
        assert_eq!(stack.language.as_deref(), Some("kotlin"));
        assert_eq!(stack.platforms, vec!["android".to_string()]);
    }

    #[test]
    fn xcodeproj_marks_swift_ios() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("ios").join("Demo.xcodeproj")).unwrap();

        let stack = detect_project(&TargetProject::at(dir.path())).unwrap();
        assert_eq!(stack.language.as_deref(), Some("swift"));
        assert_eq!(stack.platforms, vec!["ios".to_string()]);
    }

    #[test]
    fn manifests_override_rule_scan() {
        let dir = tempfile::tempdir().unwrap();
        let target = TargetProject::at(dir.path());
        fs::create_dir_all(target.rules_dir()).unwrap();
        fs::write(target.rules_dir().join("10-python.mdc"), "# Python\n").unwrap();
        fs::write(dir.path().join("pubspec.yaml"), "name: demo\n").unwrap();

        let stack = detect_project(&target).unwrap();
        assert_eq!(stack.language.as_deref(), Some("dart"));
    }

    #[test]
    fn empty_target_detects_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let stack = detect_project(&TargetProject::at(dir.path())).unwrap();
        assert!(stack.language.is_none());
        assert!(stack.framework.is_none());
        assert!(stack.platforms.is_empty());
        assert!(stack.project_name.is_none());
    }
}
