use crate::config::Properties;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    /// One TOML table per resolved path
    Toml,
    /// `key=value` lines for a single path, as conformance suites expect
    EditorConfig,
}

/// Render resolved paths as a TOML document, sorted by path then key.
pub fn render_toml(resolved: &BTreeMap<String, Properties>) -> Result<String, toml::ser::Error> {
    toml::to_string(resolved)
}

pub fn render_editorconfig(properties: &Properties) -> String {
    properties
        .iter()
        .map(|(key, value)| format!("{key}={value}\n"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(pairs: &[(&str, &str)]) -> Properties {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_render_editorconfig_sorted() {
        let out = render_editorconfig(&props(&[("tab_width", "4"), ("indent_size", "4")]));
        assert_eq!(out, "indent_size=4\ntab_width=4\n");
    }

    #[test]
    fn test_render_editorconfig_empty() {
        assert_eq!(render_editorconfig(&Properties::new()), "");
    }

    #[test]
    fn test_render_toml_round_trips() {
        let mut resolved = BTreeMap::new();
        resolved.insert("/p/b.rs".to_string(), props(&[("indent_size", "4")]));
        resolved.insert("/p/a.md".to_string(), props(&[("charset", "utf-8")]));

        let out = render_toml(&resolved).unwrap();
        assert!(out.find("/p/a.md").unwrap() < out.find("/p/b.rs").unwrap());

        let parsed: BTreeMap<String, Properties> = toml::from_str(&out).unwrap();
        assert_eq!(parsed, resolved);
    }
}
