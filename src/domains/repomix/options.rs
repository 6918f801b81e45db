//! Packing options shared by every codebase tool.
//!
//! The boolean options are tri-state on purpose: an absent value leaves the
//! decision to Repomix, while an explicit `true` / `false` forces the
//! corresponding `--flag` / `--no-flag` spelling.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output style understood by `repomix --style`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Xml,
    Markdown,
    Plain,
}

impl OutputFormat {
    /// Value passed to `--style`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Xml => "xml",
            Self::Markdown => "markdown",
            Self::Plain => "plain",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tri-state option together with its enable / disable flag spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleFlag {
    pub value: Option<bool>,
    pub enable: &'static str,
    pub disable: &'static str,
}

impl ToggleFlag {
    /// The flag to emit for this option, if any.
    pub fn flag(&self) -> Option<&'static str> {
        match self.value {
            Some(true) => Some(self.enable),
            Some(false) => Some(self.disable),
            None => None,
        }
    }
}

/// Options forwarded to Repomix, shared by all three tools.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PackOptions {
    /// Output format.
    #[serde(default, alias = "format")]
    #[schemars(description = "Output format (xml, markdown, or plain). Repomix defaults to xml")]
    pub output_format: Option<OutputFormat>,

    #[serde(default)]
    #[schemars(description = "Include summary of each file (Repomix default: true)")]
    pub include_file_summary: Option<bool>,

    #[serde(default)]
    #[schemars(description = "Include directory structure (Repomix default: true)")]
    pub include_directory_structure: Option<bool>,

    #[serde(default)]
    #[schemars(description = "Remove comments from the code (Repomix default: false)")]
    pub remove_comments: Option<bool>,

    #[serde(default)]
    #[schemars(description = "Remove empty lines from the code (Repomix default: false)")]
    pub remove_empty_lines: Option<bool>,

    #[serde(default)]
    #[schemars(description = "Show line numbers (Repomix default: true)")]
    pub show_line_numbers: Option<bool>,

    #[serde(default)]
    #[schemars(description = "Include patterns (using glob patterns, comma-separated)")]
    pub include_patterns: Option<String>,

    #[serde(default, alias = "ignorePatterns")]
    #[schemars(description = "Exclude patterns (using glob patterns, comma-separated)")]
    pub exclude_patterns: Option<String>,
}

impl PackOptions {
    /// The five tri-state options, in the order their flags are emitted.
    pub fn toggles(&self) -> [ToggleFlag; 5] {
        [
            ToggleFlag {
                value: self.include_file_summary,
                enable: "--include-file-summary",
                disable: "--no-include-file-summary",
            },
            ToggleFlag {
                value: self.include_directory_structure,
                enable: "--include-directory-structure",
                disable: "--no-include-directory-structure",
            },
            ToggleFlag {
                value: self.remove_comments,
                enable: "--remove-comments",
                disable: "--no-remove-comments",
            },
            ToggleFlag {
                value: self.remove_empty_lines,
                enable: "--remove-empty-lines",
                disable: "--no-remove-empty-lines",
            },
            ToggleFlag {
                value: self.show_line_numbers,
                enable: "--show-line-numbers",
                disable: "--no-show-line-numbers",
            },
        ]
    }

    /// Include patterns, if any were given.
    pub fn include(&self) -> Option<&str> {
        non_empty(self.include_patterns.as_deref())
    }

    /// Exclude patterns, if any were given.
    pub fn exclude(&self) -> Option<&str> {
        non_empty(self.exclude_patterns.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_booleans_stay_absent() {
        let options: PackOptions = serde_json::from_value(json!({})).unwrap();
        assert_eq!(options, PackOptions::default());
        assert!(options.toggles().iter().all(|t| t.flag().is_none()));
    }

    #[test]
    fn test_explicit_false_is_kept() {
        let options: PackOptions =
            serde_json::from_value(json!({ "removeComments": false })).unwrap();
        assert_eq!(options.remove_comments, Some(false));
        assert_eq!(options.toggles()[2].flag(), Some("--no-remove-comments"));
    }

    #[test]
    fn test_legacy_aliases() {
        let options: PackOptions = serde_json::from_value(json!({
            "format": "markdown",
            "ignorePatterns": "dist/**"
        }))
        .unwrap();
        assert_eq!(options.output_format, Some(OutputFormat::Markdown));
        assert_eq!(options.exclude(), Some("dist/**"));
    }

    #[test]
    fn test_invalid_format_rejected() {
        let result: Result<PackOptions, _> =
            serde_json::from_value(json!({ "outputFormat": "html" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_patterns_ignored() {
        let options = PackOptions {
            include_patterns: Some("  ".to_string()),
            exclude_patterns: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(options.include(), None);
        assert_eq!(options.exclude(), None);
    }

    #[test]
    fn test_output_format_strings() {
        assert_eq!(OutputFormat::Xml.as_str(), "xml");
        assert_eq!(OutputFormat::Markdown.to_string(), "markdown");
        assert_eq!(OutputFormat::Plain.as_str(), "plain");
    }
}
