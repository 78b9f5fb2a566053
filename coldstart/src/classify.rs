//! Rule file classification
//!
//! Maps a rendered rule file's name back to its category. Classification is
//! purely name-based: the category rules are tried in a fixed order, each
//! accepting either its two-digit priority prefix range or a matching
//! keyword segment in the name, and the first rule that fires wins.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Language keywords recognized in rule file names and contents.
pub const LANGUAGE_KEYWORDS: &[&str] = &[
    "dart",
    "typescript",
    "python",
    "kotlin",
    "swift",
    "javascript",
    "java",
    "go",
    "rust",
];

/// Framework keywords recognized in rule file names and contents.
pub const FRAMEWORK_KEYWORDS: &[&str] = &[
    "flutter", "react", "vue", "angular", "django", "fastapi", "spring", "express",
];

/// Platform keywords recognized in rule file names.
pub const PLATFORM_KEYWORDS: &[&str] = &["android", "ios", "web", "windows", "macos", "linux"];

/// Category of a rendered rule file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    /// Shared baseline rules (`00`-`09` or "core" in the name).
    Common,
    /// Language-specific rules (`10`-`19`).
    Language,
    /// Framework-specific rules (`20`-`29`).
    Framework,
    /// Platform-specific rules (`30`-`39`).
    Platform,
    /// Injected module rules (`40`-`49`).
    Module,
    /// Anything else.
    #[default]
    Unknown,
}

impl RuleKind {
    /// Lowercase label as persisted in `project.json`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Language => "language",
            Self::Framework => "framework",
            Self::Platform => "platform",
            Self::Module => "module",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a rule file name.
///
/// The rules fire in order, each on its priority-prefix range or its
/// keyword table: `00`-`09` or "core" is common, `10`-`19` or a language
/// keyword is language, `20`-`29` or a framework keyword is framework,
/// `30`-`39` or a platform keyword is platform, `40`-`49` is module.
/// An earlier rule's keyword therefore overrides a later rule's prefix:
/// `20-core.mdc` is common and `30-python.mdc` is language.
#[must_use]
pub fn classify(file_name: &str) -> RuleKind {
    let lower = file_name.to_lowercase();
    let prefix = prefix_value(file_name);
    let in_range = |lo: u32, hi: u32| prefix.is_some_and(|p| (lo..=hi).contains(&p));

    if in_range(0, 9) || lower.contains("core") {
        return RuleKind::Common;
    }
    if in_range(10, 19) || matches_keyword(&lower, LANGUAGE_KEYWORDS) {
        return RuleKind::Language;
    }
    if in_range(20, 29) || matches_keyword(&lower, FRAMEWORK_KEYWORDS) {
        return RuleKind::Framework;
    }
    if in_range(30, 39) || matches_keyword(&lower, PLATFORM_KEYWORDS) {
        return RuleKind::Platform;
    }
    if in_range(40, 49) {
        return RuleKind::Module;
    }
    RuleKind::Unknown
}

/// Two-digit priority prefix value, for names of the form `NN-...`.
fn prefix_value(file_name: &str) -> Option<u32> {
    let bytes = file_name.as_bytes();
    if bytes.len() < 3 || !bytes[0].is_ascii_digit() || !bytes[1].is_ascii_digit() || bytes[2] != b'-'
    {
        return None;
    }
    Some(u32::from(bytes[0] - b'0') * 10 + u32::from(bytes[1] - b'0'))
}

/// True when any hyphen/underscore/dot-separated segment equals a keyword.
///
/// Segment matching keeps `django` from hitting the language keyword `go`
/// the way a raw substring test would.
pub(crate) fn matches_keyword(lower_name: &str, keywords: &[&str]) -> bool {
    lower_name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|segment| keywords.contains(&segment))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn recognized_prefixes_decide_the_category() {
        assert_eq!(classify("00-core.mdc"), RuleKind::Common);
        assert_eq!(classify("05-style.mdc"), RuleKind::Common);
        assert_eq!(classify("10-python.mdc"), RuleKind::Language);
        assert_eq!(classify("20-flutter.mdc"), RuleKind::Framework);
        assert_eq!(classify("30-android.mdc"), RuleKind::Platform);
        assert_eq!(classify("31-web.mdc"), RuleKind::Platform);
        assert_eq!(classify("41-network-module.mdc"), RuleKind::Module);
    }

    #[test]
    fn rule_order_lets_an_earlier_keyword_beat_a_later_prefix() {
        // "core" is checked before the framework prefix range.
        assert_eq!(classify("20-core.mdc"), RuleKind::Common);
        // A language keyword is checked before the platform prefix range.
        assert_eq!(classify("30-python.mdc"), RuleKind::Language);
        // A language-range prefix on a framework name stays language.
        assert_eq!(classify("12-react.mdc"), RuleKind::Language);
        // No earlier rule fires, so the prefix governs.
        assert_eq!(classify("20-django.mdc"), RuleKind::Framework);
    }

    #[test]
    fn keywords_cover_unprefixed_names() {
        assert_eq!(classify("python-style.mdc"), RuleKind::Language);
        assert_eq!(classify("django.mdc"), RuleKind::Framework);
        assert_eq!(classify("ios_conventions.mdc"), RuleKind::Platform);
        assert_eq!(classify("my-core-identity.mdc"), RuleKind::Common);
    }

    #[test]
    fn segment_matching_avoids_substring_traps() {
        // "go" must not fire inside "django"; "java" not inside "javascript".
        assert_eq!(classify("django-tips.mdc"), RuleKind::Framework);
        assert_eq!(classify("javascript.mdc"), RuleKind::Language);
        assert_eq!(classify("golang-notes.mdc"), RuleKind::Unknown);
    }

    #[test]
    fn unrecognized_names_are_unknown() {
        assert_eq!(classify("weird.mdc"), RuleKind::Unknown);
        assert_eq!(classify("99-appendix.mdc"), RuleKind::Unknown);
        assert_eq!(classify(""), RuleKind::Unknown);
    }

    proptest! {
        #[test]
        fn total_and_deterministic(name in ".{0,64}") {
            let first = classify(&name);
            let second = classify(&name);
            prop_assert_eq!(first, second);
        }
    }
}
