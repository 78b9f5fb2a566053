//! Configuration store
//!
//! Owns the two persisted documents: the ephemeral staging config written by
//! `init` and the long-lived `project.json` in a target project. Loading is
//! tolerant of missing fields (everything has a serde default); syntactically
//! broken JSON is a typed error, never silently ignored.

mod project;
mod staging;

pub use project::{
    Files, LogService, ModuleRecord, Modules, PlanRecord, PlatformRef, ProjectConfig, ProjectInfo,
    RuleRecord, Technology, ToolConfig, GENERATED_BY, SCHEMA_VERSION, UNKNOWN,
};
pub use staging::{FrameworkChoice, LanguageChoice, StagingConfig};

use chrono::{SecondsFormat, Utc};

/// Current UTC time as the RFC 3339 second-precision string persisted in
/// `project.json` timestamps.
#[must_use]
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Current UTC time in the human-readable form rendered into documents.
#[must_use]
pub fn now_display() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
