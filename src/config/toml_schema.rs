//! TOML schema for `.toolconfig.toml`
//!
//! ```toml
//! root = true
//!
//! ['*']
//! indent_style = "space"
//!
//! ['*.py']
//! indent_size = 4
//! ```
//!
//! Every top-level table is a section whose key is the glob. Table order is
//! declaration order (`toml` is built with `preserve_order`).

use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use super::{ConfigFile, Properties, Section};
use crate::error::ParseError;

/// Root structure for `.toolconfig.toml`
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ToolConfigToml {
    /// Stop the directory walk after this file
    #[serde(default)]
    pub root: bool,

    /// Remaining top-level entries; tables are sections
    #[serde(flatten)]
    pub sections: toml::Table,
}

/// Parse the text of the `.toolconfig.toml` at `path`.
pub fn parse_toolconfig(path: &Path, text: &str) -> Result<ConfigFile, ParseError> {
    let schema: ToolConfigToml = toml::from_str(text).map_err(|source| ParseError::Toml {
        path: path.to_path_buf(),
        source,
    })?;

    let mut file = ConfigFile::new(path);
    file.is_root = schema.root;
    let anchor_dir = file.anchor_dir().to_path_buf();

    for (header, value) in schema.sections {
        let toml::Value::Table(table) = value else {
            warn!(
                path = %path.display(),
                key = %header,
                "ignoring top-level key outside any section"
            );
            continue;
        };

        let properties = section_properties(path, &header, table)?;
        file.sections
            .push(Section::new(&anchor_dir, &header, properties));
    }

    Ok(file)
}

fn section_properties(
    path: &Path,
    header: &str,
    table: toml::Table,
) -> Result<Properties, ParseError> {
    let mut properties = Properties::new();

    for (key, value) in table {
        let value = match value {
            toml::Value::String(s) => s,
            toml::Value::Integer(i) => i.to_string(),
            toml::Value::Float(f) => f.to_string(),
            toml::Value::Boolean(b) => b.to_string(),
            toml::Value::Datetime(d) => d.to_string(),
            toml::Value::Table(_) => {
                return Err(ParseError::Schema {
                    path: path.to_path_buf(),
                    message: format!(
                        "section '{header}' contains nested table '{key}'; quote globs containing dots"
                    ),
                });
            }
            toml::Value::Array(_) => {
                return Err(ParseError::Schema {
                    path: path.to_path_buf(),
                    message: format!("section '{header}' key '{key}' holds an array"),
                });
            }
        };
        properties.insert(key.to_lowercase(), value);
    }

    Ok(properties)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<ConfigFile, ParseError> {
        parse_toolconfig(Path::new("/p/.toolconfig.toml"), text)
    }

    #[test]
    fn test_empty_file() {
        let file = parse("").unwrap();
        assert!(!file.is_root);
        assert!(file.sections.is_empty());
    }

    #[test]
    fn test_root_and_section() {
        let file = parse(
            r#"
root=true
['*']
answer = "tc"
"#,
        )
        .unwrap();

        assert!(file.is_root);
        let props = file.matched_properties(Path::new("/p/sub/some_file"));
        assert_eq!(props.get("answer").map(String::as_str), Some("tc"));
        assert_eq!(props.len(), 1);
    }

    #[test]
    fn test_declaration_order_is_kept() {
        // Declared so that alphabetical order would differ.
        let file = parse(
            r#"
root=true
['*']
key = "value1"
['*.txt']
key = "value2"
['*.a']
key = "value3"
"#,
        )
        .unwrap();

        let patterns: Vec<_> = file.sections.iter().map(|s| s.pattern()).collect();
        assert_eq!(patterns, vec!["*", "*.txt", "*.a"]);

        for _ in 0..10 {
            let props = file.matched_properties(Path::new("/p/foo.txt"));
            assert_eq!(props.get("key").map(String::as_str), Some("value2"));
        }
    }

    #[test]
    fn test_scalar_values_become_strings() {
        let file = parse(
            r#"
['*']
indent_size = 4
insert_final_newline = true
ratio = 1.5
Name = "Mixed"
"#,
        )
        .unwrap();

        let props = file.matched_properties(Path::new("/p/x"));
        assert_eq!(props["indent_size"], "4");
        assert_eq!(props["insert_final_newline"], "true");
        assert_eq!(props["ratio"], "1.5");
        assert_eq!(props["name"], "Mixed");
    }

    #[test]
    fn test_top_level_scalars_are_ignored() {
        let file = parse("version = 1\n['*']\nk = \"v\"\n").unwrap();
        assert_eq!(file.sections.len(), 1);
    }

    #[test]
    fn test_invalid_toml() {
        let result = parse("invalid toml {{{\n");
        assert!(matches!(result, Err(ParseError::Toml { .. })));
    }

    #[test]
    fn test_root_must_be_boolean() {
        let result = parse("root = \"yes\"\n");
        assert!(matches!(result, Err(ParseError::Toml { .. })));
    }

    #[test]
    fn test_nested_table_is_rejected() {
        let result = parse("[src.lib]\nk = \"v\"\n");
        assert!(matches!(result, Err(ParseError::Schema { .. })));
    }

    #[test]
    fn test_array_value_is_rejected() {
        let result = parse("['*']\nk = [1, 2]\n");
        assert!(matches!(result, Err(ParseError::Schema { .. })));
    }
}
