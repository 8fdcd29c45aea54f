use serde_json::{Map, Value};

use crate::error::{join_errors, SubstituteError};

/// Resolves a single `${...}` reference body to its substituted text.
///
/// Implementations may consult workload metadata, provisioned resource
/// outputs, or any other caller-supplied context. Resolvers must be
/// deterministic given identical input (spec §4.3's determinism
/// requirement applies transitively through substitution).
pub trait Resolver {
    fn resolve(&self, reference: &str) -> Result<String, SubstituteError>;
}

impl<F> Resolver for F
where
    F: Fn(&str) -> Result<String, SubstituteError>,
{
    fn resolve(&self, reference: &str) -> Result<String, SubstituteError> {
        self(reference)
    }
}

/// Scan `src` for `${...}` placeholders and `$$` escapes, substituting each
/// via `resolver`. All placeholders are attempted even if some fail; the
/// best-effort text is always returned, alongside the accumulated error (if
/// any) per spec §4.1.
pub fn substitute_string(src: &str, resolver: &dyn Resolver) -> (String, Option<SubstituteError>) {
    substitute_string_with(src, resolver, false)
}

/// Like [`substitute_string`], but leaves a `$$` escape untouched in the
/// output instead of collapsing it to a literal `$`.
///
/// Environment values are the one place spec §4.7 carves out this
/// exception: the downstream container runtime re-escapes `$$` on its own,
/// so the generator must not unescape it first.
pub fn substitute_string_preserving_escapes(
    src: &str,
    resolver: &dyn Resolver,
) -> (String, Option<SubstituteError>) {
    substitute_string_with(src, resolver, true)
}

fn substitute_string_with(
    src: &str,
    resolver: &dyn Resolver,
    preserve_escapes: bool,
) -> (String, Option<SubstituteError>) {
    let mut out = String::with_capacity(src.len());
    let mut errors: Vec<String> = Vec::new();
    let mut chars = src.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('$') => {
                chars.next();
                if preserve_escapes {
                    out.push('$');
                    out.push('$');
                } else {
                    out.push('$');
                }
            }
            Some('{') => {
                chars.next();
                let mut inner = String::new();
                let mut closed = false;
                while let Some(&c2) = chars.peek() {
                    if c2 == '}' {
                        chars.next();
                        closed = true;
                        break;
                    }
                    inner.push(c2);
                    chars.next();
                }
                if !closed {
                    out.push('$');
                    out.push('{');
                    out.push_str(&inner);
                    continue;
                }
                match resolver.resolve(&inner) {
                    Ok(text) => out.push_str(&text),
                    Err(e) => errors.push(e.to_string()),
                }
            }
            _ => out.push('$'),
        }
    }

    (out, join_errors(errors))
}

/// Recursively apply [`substitute_string`] through nested maps/sequences,
/// returning a fresh structure. Non-string scalars pass through unchanged.
/// Errors are annotated with their path (`"<key>: "` or `"<index>: "`).
pub fn substitute(value: &Value, resolver: &dyn Resolver) -> (Value, Option<SubstituteError>) {
    match value {
        Value::String(s) => {
            let (text, err) = substitute_string(s, resolver);
            (Value::String(text), err)
        }
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            let mut errors = Vec::new();
            for (k, v) in map {
                let (nv, err) = substitute(v, resolver);
                out.insert(k.clone(), nv);
                if let Some(e) = err {
                    errors.push(format!("{k}: {e}"));
                }
            }
            (Value::Object(out), join_errors(errors))
        }
        Value::Array(arr) => {
            let mut out = Vec::with_capacity(arr.len());
            let mut errors = Vec::new();
            for (i, v) in arr.iter().enumerate() {
                let (nv, err) = substitute(v, resolver);
                out.push(nv);
                if let Some(e) = err {
                    errors.push(format!("{i}: {e}"));
                }
            }
            (Value::Array(out), join_errors(errors))
        }
        other => (other.clone(), None),
    }
}

/// Scan `src` for `${...}` placeholder bodies without substituting them.
///
/// Used by callers that need to inspect *which* references a string contains
/// (e.g. the dependency scheduler in `score-graph`) rather than resolve them.
/// `$$` escapes are skipped, matching [`substitute_string`]'s grammar.
pub fn scan_tokens(src: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = src.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            continue;
        }
        match chars.peek() {
            Some('$') => {
                chars.next();
            }
            Some('{') => {
                chars.next();
                let mut inner = String::new();
                let mut closed = false;
                while let Some(&c2) = chars.peek() {
                    if c2 == '}' {
                        chars.next();
                        closed = true;
                        break;
                    }
                    inner.push(c2);
                    chars.next();
                }
                if closed {
                    tokens.push(inner);
                }
            }
            _ => {}
        }
    }

    tokens
}

/// Split a reference body on unescaped `.`; `\.` is a literal `.` within a segment.
pub fn split_ref(inner: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = inner.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\' && chars.peek() == Some(&'.') {
            current.push('.');
            chars.next();
        } else if c == '.' {
            parts.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    parts.push(current);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok_resolver(text: &'static str) -> impl Resolver {
        move |_: &str| Ok(text.to_string())
    }

    #[test]
    fn idempotent_on_literal() {
        let r = ok_resolver("unused");
        let (out, err) = substitute_string("plain text, no dollars", &r);
        assert_eq!(out, "plain text, no dollars");
        assert!(err.is_none());
    }

    #[test]
    fn escaped_dollar_round_trips() {
        let r = ok_resolver("unused");
        let (out, _) = substitute_string("$${x}", &r);
        assert_eq!(out, "${x}");
        let (out, _) = substitute_string("abc $$ abc", &r);
        assert_eq!(out, "abc $ abc");
    }

    #[test]
    fn preserving_escapes_leaves_double_dollar_untouched() {
        let r = ok_resolver("unused");
        let (out, _) = substitute_string_preserving_escapes("$${LOGS_LEVEL}", &r);
        assert_eq!(out, "$${LOGS_LEVEL}");
        let (out, _) = substitute_string_preserving_escapes("abc $$ abc", &r);
        assert_eq!(out, "abc $$ abc");
    }

    #[test]
    fn bare_dollar_passes_through() {
        let r = ok_resolver("unused");
        let (out, err) = substitute_string("$abc", &r);
        assert_eq!(out, "$abc");
        assert!(err.is_none());
    }

    #[test]
    fn resolver_substitutes_token() {
        let r = ok_resolver("value");
        let (out, err) = substitute_string("prefix ${metadata.name} suffix", &r);
        assert_eq!(out, "prefix value suffix");
        assert!(err.is_none());
    }

    #[test]
    fn resolver_error_is_collected_but_all_tokens_attempted() {
        let r = |s: &str| -> Result<String, SubstituteError> {
            if s == "bad" {
                Err(SubstituteError::UnknownResource("bad".into()))
            } else {
                Ok("ok".into())
            }
        };
        let (out, err) = substitute_string("${good} ${bad} ${good}", &r);
        assert_eq!(out, "ok  ok");
        assert!(err.is_some());
    }

    #[test]
    fn split_ref_handles_escaped_dot() {
        let parts = split_ref(r"a\.b.c");
        assert_eq!(parts, vec!["a.b".to_string(), "c".to_string()]);
    }

    #[test]
    fn substitute_recurses_and_annotates_path() {
        let r = |s: &str| -> Result<String, SubstituteError> {
            if s == "metadata.x" {
                Err(SubstituteError::KeyNotFound("x".into()))
            } else {
                Ok("v".into())
            }
        };
        let value = serde_json::json!({
            "a": "${metadata.x}",
            "b": ["${ok}"],
        });
        let (out, err) = substitute(&value, &r);
        assert_eq!(out["b"][0], "v");
        let msg = err.unwrap().to_string();
        assert!(msg.contains("a: "), "expected path prefix in {msg}");
    }
}
