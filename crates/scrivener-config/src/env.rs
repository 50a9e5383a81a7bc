use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Failure while expanding placeholders in the raw config text
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ExpandError {
    #[error("environment variable not found: `{0}`")]
    MissingVariable(String),
    #[error("only variables scoped with 'env.' are supported: `{0}`")]
    UnsupportedScope(String),
}

fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\{\{\s*(?P<key>[a-zA-Z0-9_.]+)\s*(?:\|\s*default\("(?P<default>[^"]*)"\))?\s*\}\}"#)
            .expect("must be valid regex")
    })
}

/// Expand `{{ env.VAR }}` and `{{ env.VAR | default("x") }}` placeholders
///
/// Runs on the raw TOML text before deserialization so the config structs
/// only ever see plain values. Comment lines are left untouched.
pub fn expand_env(input: &str) -> Result<String, ExpandError> {
    let mut lines = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut failure = None;
        let expanded = placeholder().replace_all(line, |caps: &Captures<'_>| match resolve(caps) {
            Ok(value) => value,
            Err(e) => {
                failure.get_or_insert(e);
                String::new()
            }
        });

        if let Some(e) = failure {
            return Err(e);
        }

        lines.push(expanded.into_owned());
    }

    let mut output = lines.join("\n");
    if input.ends_with('\n') {
        output.push('\n');
    }

    Ok(output)
}

fn resolve(caps: &Captures<'_>) -> Result<String, ExpandError> {
    let key = &caps["key"];

    let Some(var_name) = key.strip_prefix("env.").filter(|name| !name.contains('.')) else {
        return Err(ExpandError::UnsupportedScope(key.to_string()));
    };

    match (std::env::var(var_name), caps.name("default")) {
        (Ok(value), _) => Ok(value),
        (Err(_), Some(default)) => Ok(default.as_str().to_string()),
        (Err(_), None) => Err(ExpandError::MissingVariable(var_name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_without_placeholders_is_unchanged() {
        let input = "model = \"whisper-1\"\n";
        assert_eq!(expand_env(input).unwrap(), input);
    }

    #[test]
    fn expands_variable() {
        temp_env::with_var("SCRIVENER_TEST_URL", Some("http://upstream"), || {
            let result = expand_env("base_url = \"{{ env.SCRIVENER_TEST_URL }}/v1\"").unwrap();
            assert_eq!(result, "base_url = \"http://upstream/v1\"");
        });
    }

    #[test]
    fn missing_variable_is_an_error() {
        temp_env::with_var_unset("SCRIVENER_MISSING", || {
            let err = expand_env("key = \"{{ env.SCRIVENER_MISSING }}\"").unwrap_err();
            assert_eq!(err, ExpandError::MissingVariable("SCRIVENER_MISSING".into()));
        });
    }

    #[test]
    fn default_applies_only_when_unset() {
        let input = "model = \"{{ env.SCRIVENER_MODEL | default(\"gpt-4o\") }}\"";

        temp_env::with_var_unset("SCRIVENER_MODEL", || {
            assert_eq!(expand_env(input).unwrap(), "model = \"gpt-4o\"");
        });
        temp_env::with_var("SCRIVENER_MODEL", Some("gpt-4o-mini"), || {
            assert_eq!(expand_env(input).unwrap(), "model = \"gpt-4o-mini\"");
        });
    }

    #[test]
    fn non_env_scope_is_rejected() {
        let err = expand_env("key = \"{{ vault.SECRET }}\"").unwrap_err();
        assert_eq!(err, ExpandError::UnsupportedScope("vault.SECRET".into()));
    }

    #[test]
    fn comment_lines_are_not_expanded() {
        temp_env::with_var_unset("SCRIVENER_MISSING", || {
            let input = "  # key = \"{{ env.SCRIVENER_MISSING }}\"\nlanguage = \"en\"";
            assert_eq!(expand_env(input).unwrap(), input);
        });
    }
}
