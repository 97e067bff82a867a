//! Template variable resolution
//!
//! Dashboards reference variables as `$name`, `${name}`, `${name:format}` or
//! `[[name]]`. The adapter receives a [`TemplateResolver`] instead of looking
//! variables up through a process-wide service.

use crate::model::{ScopedVar, ScopedVars};
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Resolves template variables in query text
pub trait TemplateResolver: Send + Sync {
    /// Returns `target` with every known variable substituted
    ///
    /// Variables not known to the resolver are left as written.
    fn replace(&self, target: &str, scoped_vars: &ScopedVars) -> String;
}

fn variable_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$(\w+)|\$\{(\w+)(?::[^}]*)?\}|\[\[(\w+)(?::[^\]]*)?\]\]")
            .expect("variable pattern is a valid regex")
    })
}

/// Resolver backed by request-scoped variables and instance-level globals
///
/// Request-scoped variables win over globals of the same name. Format
/// suffixes such as `${name:csv}` are accepted and ignored.
///
/// # Examples
///
/// ```
/// use brics_datasource::model::{ScopedVar, ScopedVars};
/// use brics_datasource::template::{TemplateResolver, VariableTemplateResolver};
///
/// let resolver = VariableTemplateResolver::new([("country".to_string(), "BR".to_string())].into());
/// assert_eq!(resolver.replace("$country/${missing}", &ScopedVars::new()), "BR/${missing}");
/// ```
#[derive(Debug, Clone, Default)]
pub struct VariableTemplateResolver {
    globals: BTreeMap<String, String>,
}

impl VariableTemplateResolver {
    /// Creates a resolver with instance-level variables
    pub fn new(globals: BTreeMap<String, String>) -> Self {
        Self { globals }
    }

    fn lookup(&self, name: &str, scoped_vars: &ScopedVars) -> Option<String> {
        scoped_vars
            .get(name)
            .map(ScopedVar::value_text)
            .or_else(|| self.globals.get(name).cloned())
    }
}

impl TemplateResolver for VariableTemplateResolver {
    fn replace(&self, target: &str, scoped_vars: &ScopedVars) -> String {
        variable_pattern()
            .replace_all(target, |caps: &Captures| {
                let name = caps
                    .get(1)
                    .or_else(|| caps.get(2))
                    .or_else(|| caps.get(3))
                    .map(|m| m.as_str())
                    .unwrap_or_default();
                self.lookup(name, scoped_vars)
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScopedVar;

    fn scoped(name: &str, value: &str) -> ScopedVars {
        let mut vars = ScopedVars::new();
        vars.insert(name.to_string(), ScopedVar::new(value));
        vars
    }

    #[test]
    fn test_replace_all_syntaxes() {
        let resolver = VariableTemplateResolver::default();
        let vars = scoped("brics", "BR");
        assert_eq!(
            resolver.replace("$brics ${brics} ${brics:csv} [[brics]]", &vars),
            "BR BR BR BR"
        );
    }

    #[test]
    fn test_scoped_vars_take_precedence_over_globals() {
        let resolver =
            VariableTemplateResolver::new([("brics".to_string(), "IN".to_string())].into());
        assert_eq!(resolver.replace("$brics", &scoped("brics", "CN")), "CN");
        assert_eq!(resolver.replace("$brics", &ScopedVars::new()), "IN");
    }

    #[test]
    fn test_numeric_scoped_values_are_substituted() {
        let resolver = VariableTemplateResolver::default();
        let vars: ScopedVars = serde_json::from_str(
            r#"{"__interval_ms": {"text": "1000", "value": 1000}, "empty": {"value": null}}"#,
        )
        .unwrap();
        assert_eq!(
            resolver.replace("every ${__interval_ms}ms [$empty]", &vars),
            "every 1000ms []"
        );
    }

    #[test]
    fn test_unknown_variables_are_left_untouched() {
        let resolver = VariableTemplateResolver::default();
        assert_eq!(
            resolver.replace("$brics and [[other]]", &ScopedVars::new()),
            "$brics and [[other]]"
        );
    }

    #[test]
    fn test_text_without_variables_is_unchanged() {
        let resolver = VariableTemplateResolver::default();
        assert_eq!(resolver.replace("plain text", &ScopedVars::new()), "plain text");
    }
}
