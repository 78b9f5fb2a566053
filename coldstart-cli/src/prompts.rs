//! Interactive prompt helpers
//!
//! Thin wrappers over `dialoguer` sharing one theme. Cancelling a mandatory
//! selection (`Esc`) maps to the library's `InvalidSelection` error, which
//! aborts the current operation without leaving the REPL; optional prompts
//! fall back to their documented default instead.

use anyhow::Result;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, MultiSelect, Select};

fn theme() -> ColorfulTheme {
    ColorfulTheme::default()
}

/// Free-form input that must be non-empty.
pub fn input_required(prompt: &str) -> Result<String> {
    let value: String = Input::with_theme(&theme())
        .with_prompt(prompt)
        .validate_with(|v: &String| {
            if v.trim().is_empty() {
                Err("a value is required")
            } else {
                Ok(())
            }
        })
        .interact_text()?;
    Ok(value.trim().to_string())
}

/// Free-form input; empty input means "skip".
pub fn input_optional(prompt: &str) -> Result<Option<String>> {
    let value: String = Input::with_theme(&theme())
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    let trimmed = value.trim();
    Ok(if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    })
}

/// Free-form input pre-filled with a default.
pub fn input_with_default(prompt: &str, default: &str) -> Result<String> {
    let value: String = Input::with_theme(&theme())
        .with_prompt(prompt)
        .default(default.to_string())
        .interact_text()?;
    Ok(value.trim().to_string())
}

/// Numeric input pre-filled with a default; non-numeric text re-prompts.
pub fn input_u32(prompt: &str, default: u32) -> Result<u32> {
    Ok(Input::with_theme(&theme())
        .with_prompt(prompt)
        .default(default)
        .interact_text()?)
}

/// Mandatory single choice; cancelling is `InvalidSelection`.
pub fn select(prompt: &str, items: &[String], default: usize) -> Result<usize> {
    let choice = Select::with_theme(&theme())
        .with_prompt(prompt)
        .items(items)
        .default(default)
        .interact_opt()?;
    choice.ok_or_else(|| {
        coldstart::Error::InvalidSelection(format!("`{prompt}` was cancelled")).into()
    })
}

/// Single choice where cancelling falls back to the default entry.
pub fn select_or_default(prompt: &str, items: &[String], default: usize) -> Result<usize> {
    let choice = Select::with_theme(&theme())
        .with_prompt(prompt)
        .items(items)
        .default(default)
        .interact_opt()?;
    Ok(choice.unwrap_or(default))
}

/// Multiple choice with pre-checked entries; cancelling keeps the
/// pre-checked set.
pub fn multi_select(prompt: &str, items: &[String], defaults: &[bool]) -> Result<Vec<usize>> {
    let picks = MultiSelect::with_theme(&theme())
        .with_prompt(prompt)
        .items(items)
        .defaults(defaults)
        .interact_opt()?;
    Ok(picks.unwrap_or_else(|| {
        defaults
            .iter()
            .enumerate()
            .filter_map(|(i, checked)| checked.then_some(i))
            .collect()
    }))
}

/// Yes/no question.
pub fn confirm(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::with_theme(&theme())
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}
