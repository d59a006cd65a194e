//! `.editorconfig` parsing
//!
//! Line-oriented INI dialect: `[glob]` section headers, `key = value` (or
//! `key: value`) options, `#`/`;` comments. Malformed lines are collected and
//! reported together once the whole file has been read.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use super::{ConfigFile, Properties, Section};
use crate::error::{BadLine, ParseError};

/// Section headers longer than this are ignored.
pub const MAX_SECTION_LENGTH: usize = 4096;
/// Option names longer than this are ignored.
pub const MAX_PROPERTY_LENGTH: usize = 50;
/// Option values longer than this are ignored.
pub const MAX_VALUE_LENGTH: usize = 255;

// `]` is allowed inside a header; `#` and `;` only when escaped.
static SECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\[((?:[^#;]|\\#|\\;)+)\]").unwrap());

static OPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([^:=\s][^:=]*)\s*[:=]\s*(.*)$").unwrap());

// `;` and `#` start a comment only after whitespace.
static INLINE_COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)[ \t][;#]").unwrap());

/// Parse the text of the `.editorconfig` at `path`.
///
/// Section patterns are anchored at the directory containing `path`.
pub fn parse_editorconfig(path: &Path, text: &str) -> Result<ConfigFile, ParseError> {
    let mut file = ConfigFile::new(path);
    let anchor_dir = file.anchor_dir().to_path_buf();
    let mut bad_lines = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = if index == 0 {
            raw.strip_prefix('\u{feff}').unwrap_or(raw)
        } else {
            raw
        };
        let lineno = index + 1;

        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }

        if let Some(caps) = SECTION_RE.captures(line) {
            let header = &caps[1];
            if header.chars().count() > MAX_SECTION_LENGTH {
                trace!(
                    path = %path.display(),
                    line = lineno,
                    "dropping oversized section header"
                );
                continue;
            }
            file.sections
                .push(Section::new(&anchor_dir, header, Properties::new()));
            continue;
        }

        let Some(caps) = OPTION_RE.captures(line) else {
            bad_lines.push(BadLine {
                line: lineno,
                text: raw.to_string(),
            });
            continue;
        };

        let name = caps[1].trim_end().to_lowercase();
        let value = parse_value(&caps[2]);

        if name.chars().count() > MAX_PROPERTY_LENGTH
            || value.chars().count() > MAX_VALUE_LENGTH
        {
            trace!(
                path = %path.display(),
                line = lineno,
                option = %name,
                "dropping oversized option"
            );
            continue;
        }

        match file.sections.last_mut() {
            Some(section) => {
                section.properties.insert(name, value);
            }
            None if name == "root" => {
                file.is_root = value.eq_ignore_ascii_case("true");
            }
            None => {}
        }
    }

    if !bad_lines.is_empty() {
        return Err(ParseError::Syntax {
            path: path.to_path_buf(),
            lines: bad_lines,
        });
    }

    Ok(file)
}

fn parse_value(raw: &str) -> String {
    let mut value = raw;
    if value.contains([';', '#']) {
        if let Some(caps) = INLINE_COMMENT_RE.captures(value) {
            value = caps.get(1).map_or(value, |m| m.as_str());
        }
    }

    match value.trim() {
        "\"\"" => String::new(),
        v => v.to_string(),
    }
}
