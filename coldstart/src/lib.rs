//! coldstart: scaffolding engine for AI-assistant project configuration
//!
//! This crate is the non-interactive core behind the `coldstart` CLI. It
//! renders rule and plan templates for a chosen technology stack and keeps a
//! per-project record (`.cold-start/project.json`) consistent across
//! repeated, partially overlapping operations.
//!
//! # Pipeline
//!
//! ```text
//! init ──> process ──> export ──┬─> inject (modules)
//!  (staging area)    (target)   ├─> update-rules
//!                               ├─> extract-rules
//!                               └─> init-config (also standalone)
//! ```
//!
//! `init` collects a technology selection into a staging config, `process`
//! resolves and renders every applicable template into the staging tree, and
//! `export` copies the result into a target project's `.cursor/` directories
//! alongside the persisted `project.json`. The remaining stages operate on
//! that persisted state: `inject` adds module rule-sets, `update-rules`
//! regenerates the technology set, `extract-rules` harvests generalizable
//! rules back into the library, and `init-config` bootstraps `project.json`
//! for projects that never went through staging.
//!
//! Stages live in [`stages`] and are plain functions over the filesystem;
//! everything interactive stays in the CLI crate.

#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(clippy::cargo)]
#![allow(clippy::cognitive_complexity)]
#![allow(clippy::multiple_crate_versions)]

pub mod catalog;
pub mod classify;
pub mod config;
pub mod detect;
pub mod error;
mod fsutil;
pub mod module;
pub mod render;
pub mod resolve;
pub mod stages;
pub mod workspace;

pub use catalog::OptionsCatalog;
pub use classify::{classify, RuleKind};
pub use config::{ProjectConfig, StagingConfig};
pub use error::{Error, Result};
pub use workspace::{Staging, TargetProject, TemplateLibrary, Workspace};
