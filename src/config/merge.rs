//! Cascade merging and value normalization
//!
//! Priority: nearer directory > farther directory. Within one file the later
//! matching section has already won by the time properties get here.

use super::Properties;

/// Properties whose values are case-insensitive and get lower-cased.
const CASE_FOLDED_KEYS: [&str; 6] = [
    "end_of_line",
    "indent_style",
    "indent_size",
    "insert_final_newline",
    "trim_trailing_whitespace",
    "charset",
];

/// Fold properties from a farther directory into `merged`.
///
/// Keys already present came from a nearer directory and are kept.
pub fn merge_nearer_wins(merged: &mut Properties, farther: Properties) {
    for (key, value) in farther {
        merged.entry(key).or_insert(value);
    }
}

/// Normalize well-known values and derive implied indentation settings.
///
/// Idempotent: running it twice gives the same mapping as running it once.
pub fn post_process(props: &mut Properties) {
    for key in CASE_FOLDED_KEYS {
        if let Some(value) = props.get_mut(key) {
            *value = value.to_lowercase();
        }
    }

    if props.get("indent_style").map(String::as_str) == Some("tab")
        && !props.contains_key("indent_size")
    {
        props.insert("indent_size".into(), "tab".into());
    }

    if let Some(indent_size) = props.get("indent_size") {
        if indent_size != "tab" && !props.contains_key("tab_width") {
            let indent_size = indent_size.clone();
            props.insert("tab_width".into(), indent_size);
        }
    }

    if props.get("indent_size").map(String::as_str) == Some("tab") {
        if let Some(tab_width) = props.get("tab_width") {
            let indent_size = tab_width.to_lowercase();
            props.insert("indent_size".into(), indent_size);
        }
    }
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
    fn test_merge_nearer_wins() {
        let mut merged = props(&[("key", "near")]);
        merge_nearer_wins(&mut merged, props(&[("key", "far"), ("extra", "far")]));

        assert_eq!(merged, props(&[("key", "near"), ("extra", "far")]));
    }

    #[test]
    fn test_merge_into_empty() {
        let mut merged = Properties::new();
        merge_nearer_wins(&mut merged, props(&[("a", "1")]));
        assert_eq!(merged, props(&[("a", "1")]));
    }

    #[test]
    fn test_case_folding_only_touches_known_keys() {
        let mut p = props(&[
            ("end_of_line", "CRLF"),
            ("charset", "UTF-8"),
            ("indent_style", "Space"),
            ("custom", "KeepMe"),
        ]);
        post_process(&mut p);

        assert_eq!(p["end_of_line"], "crlf");
        assert_eq!(p["charset"], "utf-8");
        assert_eq!(p["indent_style"], "space");
        assert_eq!(p["custom"], "KeepMe");
    }

    #[test]
    fn test_tab_style_implies_tab_size() {
        let mut p = props(&[("indent_style", "tab")]);
        post_process(&mut p);
        assert_eq!(p, props(&[("indent_style", "tab"), ("indent_size", "tab")]));
    }

    #[test]
    fn test_tab_size_takes_tab_width() {
        let mut p = props(&[("indent_style", "tab"), ("tab_width", "4")]);
        post_process(&mut p);
        assert_eq!(p["indent_size"], "4");
        assert_eq!(p["tab_width"], "4");
    }

    #[test]
    fn test_indent_size_implies_tab_width() {
        let mut p = props(&[("indent_size", "2")]);
        post_process(&mut p);
        assert_eq!(p["tab_width"], "2");
    }

    #[test]
    fn test_explicit_tab_width_is_kept() {
        let mut p = props(&[("indent_size", "2"), ("tab_width", "8")]);
        post_process(&mut p);
        assert_eq!(p["indent_size"], "2");
        assert_eq!(p["tab_width"], "8");
    }

    #[test]
    fn test_indent_size_tab_without_width_stays_tab() {
        let mut p = props(&[("indent_size", "TAB")]);
        post_process(&mut p);
        assert_eq!(p, props(&[("indent_size", "tab")]));
    }

    #[test]
    fn test_post_process_is_idempotent() {
        let cases = [
            props(&[("indent_style", "TAB")]),
            props(&[("indent_style", "tab"), ("tab_width", "4")]),
            props(&[("indent_size", "3")]),
            props(&[("indent_size", "tab"), ("tab_width", "2"), ("charset", "LATIN1")]),
            props(&[("indent_style", "tab"), ("tab_width", "Four")]),
            props(&[("indent_size", "TAB"), ("tab_width", "Eight")]),
            Properties::new(),
        ];

        for case in cases {
            let mut once = case.clone();
            post_process(&mut once);
            let mut twice = once.clone();
            post_process(&mut twice);
            assert_eq!(once, twice, "not idempotent for {case:?}");
        }
    }

    #[test]
    fn test_indent_size_copied_from_tab_width_is_folded() {
        let mut p = props(&[("indent_style", "Tab"), ("tab_width", "Four")]);
        post_process(&mut p);

        assert_eq!(p["indent_size"], "four");
        assert_eq!(p["tab_width"], "Four");
    }
}
