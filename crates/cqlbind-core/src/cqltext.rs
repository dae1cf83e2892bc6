//! CQL statement text helpers: bind-marker scanning and diagnostic
//! rendering.

use std::sync::OnceLock;

use regex::Regex;

use crate::fields::Fields;

fn marker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Named bind markers per the CQL grammar.
    RE.get_or_init(|| Regex::new(r":([A-Za-z_][A-Za-z0-9_]*)").expect("valid marker regex"))
}

/// Replace single-quoted string literals with blanks so marker scanning
/// never fires inside them. Doubled quotes ('') stay inside the literal.
/// Byte offsets are preserved: each blanked character is replaced by one
/// space per byte of its UTF-8 encoding.
fn blank_string_literals(cql: &str) -> String {
    let mut out = String::with_capacity(cql.len());
    let mut in_literal = false;
    for ch in cql.chars() {
        if ch == '\'' {
            in_literal = !in_literal;
            out.push('\'');
        } else if in_literal {
            for _ in 0..ch.len_utf8() {
                out.push(' ');
            }
        } else {
            out.push(ch);
        }
    }
    out
}

/// Extract the named bind markers from statement text, in order of first
/// appearance, without duplicates and skipping quoted literals.
#[must_use]
pub fn bind_markers(cql: &str) -> Vec<String> {
    let blanked = blank_string_literals(cql);
    let mut seen = Vec::new();
    for capture in marker_regex().captures_iter(&blanked) {
        let name = capture[1].to_string();
        if !seen.contains(&name) {
            seen.push(name);
        }
    }
    seen
}

/// Render statement text with each `:name` marker replaced by the CQL
/// literal of the matching field value. Markers with no matching field are
/// left in place. Diagnostic use only - executed statements always bind
/// raw values, never interpolated text.
#[must_use]
pub fn render_literals(cql: &str, fields: &Fields) -> String {
    let mut out = String::with_capacity(cql.len());
    let mut last = 0;
    let blanked = blank_string_literals(cql);
    for capture in marker_regex().captures_iter(&blanked) {
        let whole = capture.get(0).expect("match");
        out.push_str(&cql[last..whole.start()]);
        match fields.get(&capture[1]) {
            Some(value) => out.push_str(&value.to_cql_literal()),
            None => out.push_str(&cql[whole.start()..whole.end()]),
        }
        last = whole.end();
    }
    out.push_str(&cql[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CqlType;
    use crate::value::CqlValue;

    #[test]
    fn test_bind_markers_in_order() {
        let cql = "UPDATE users SET name = :name WHERE id = :id";
        assert_eq!(bind_markers(cql), ["name", "id"]);
    }

    #[test]
    fn test_bind_markers_dedup() {
        let cql = "SELECT * FROM t WHERE a = :x AND b = :x";
        assert_eq!(bind_markers(cql), ["x"]);
    }

    #[test]
    fn test_bind_markers_skip_quoted() {
        let cql = "INSERT INTO t (a, b) VALUES (':not_a_marker', :real)";
        assert_eq!(bind_markers(cql), ["real"]);
    }

    #[test]
    fn test_render_literals() {
        let mut fields = Fields::empty();
        fields.push("id", CqlType::Int, CqlValue::Int(42));
        fields.push("name", CqlType::Text, CqlValue::Text("O'Brien".to_string()));
        let cql = "UPDATE users SET name = :name WHERE id = :id";
        assert_eq!(
            render_literals(cql, &fields),
            "UPDATE users SET name = 'O''Brien' WHERE id = 42"
        );
    }

    #[test]
    fn test_render_leaves_unknown_markers() {
        let fields = Fields::empty();
        assert_eq!(
            render_literals("DELETE FROM t WHERE id = :id", &fields),
            "DELETE FROM t WHERE id = :id"
        );
    }
}
