//! Input records: the flat name → raw value mapping a builder consumes.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ArgsError, ArgsResult};

/// Flat mapping from input name to raw value.
///
/// Keys are stored in kebab-case regardless of how they were supplied, so
/// `lockTimeout`, `lock_timeout` and `lock-timeout` all address the same
/// input. A `None` value means the input was explicitly null.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputRecord {
    values: BTreeMap<String, Option<String>>,
}

impl InputRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert of a present value.
    pub fn with(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.insert(name, Some(value.into()));
        self
    }

    /// Builder-style insert of an explicit null.
    pub fn with_null(mut self, name: impl AsRef<str>) -> Self {
        self.insert(name, None);
        self
    }

    /// Insert or replace a value under its canonical name.
    pub fn insert(&mut self, name: impl AsRef<str>, value: Option<String>) {
        self.values.insert(canonical_name(name.as_ref()), value);
    }

    /// Look up a value. Empty strings count as not provided.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(&canonical_name(name))
            .and_then(|v| v.as_deref())
            .filter(|v| !v.is_empty())
    }

    /// Whether the record has an entry for `name`, even a null or empty one.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(&canonical_name(name))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over canonical names and raw values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Overlay `other` on top of this record; its entries win.
    pub fn merge(&mut self, other: InputRecord) {
        self.values.extend(other.values);
    }

    /// Build a record from an environment-style lookup.
    ///
    /// Each name is read from `INPUT_<NAME>` (see [`input_env_key`]) and
    /// trimmed. Names the lookup does not know, or that are blank, are left
    /// out so they cannot shadow values from another source.
    pub fn from_lookup<'a, I, F>(names: I, lookup: F) -> Self
    where
        I: IntoIterator<Item = &'a str>,
        F: Fn(&str) -> Option<String>,
    {
        let mut record = Self::new();
        for name in names {
            let value = lookup(&input_env_key(name))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty());
            if let Some(value) = value {
                record.insert(name, Some(value));
            }
        }
        record
    }

    /// Parse a flat YAML mapping.
    pub fn from_yaml_str(content: &str) -> ArgsResult<Self> {
        let value: serde_yaml::Value = serde_yaml::from_str(content)?;
        let mapping = match value {
            serde_yaml::Value::Mapping(m) => m,
            serde_yaml::Value::Null => return Ok(Self::new()),
            _ => return Err(ArgsError::NotAMapping),
        };

        let mut record = Self::new();
        for (key, value) in mapping {
            let key = yaml_scalar(&key).ok_or(ArgsError::NotAMapping)?;
            let value = match value {
                serde_yaml::Value::Null => None,
                serde_yaml::Value::Mapping(_) | serde_yaml::Value::Sequence(_) => {
                    return Err(ArgsError::NestedValue { key });
                }
                other => yaml_scalar(&other),
            };
            record.insert(key, value);
        }
        Ok(record)
    }

    /// Parse a flat JSON object.
    pub fn from_json_str(content: &str) -> ArgsResult<Self> {
        let value: serde_json::Value = serde_json::from_str(content)?;
        let object = match value {
            serde_json::Value::Object(o) => o,
            _ => return Err(ArgsError::NotAMapping),
        };

        let mut record = Self::new();
        for (key, value) in object {
            let value = match value {
                serde_json::Value::Null => None,
                serde_json::Value::String(s) => Some(s),
                serde_json::Value::Bool(b) => Some(b.to_string()),
                serde_json::Value::Number(n) => Some(n.to_string()),
                serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                    return Err(ArgsError::NestedValue { key });
                }
            };
            record.insert(key, value);
        }
        Ok(record)
    }

    /// Load a record from a `.json`, `.yaml` or `.yml` file.
    pub fn from_file(path: &Path) -> ArgsResult<Self> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_yaml_str(&content),
        }
    }

    /// Parse `key=value` assignments. Only the first `=` splits, so values
    /// such as `var=region=us-east-1` survive intact.
    pub fn from_assignments<I, S>(assignments: I) -> ArgsResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut record = Self::new();
        for assignment in assignments {
            let assignment = assignment.as_ref();
            let (key, value) = assignment
                .split_once('=')
                .filter(|(k, _)| !k.trim().is_empty())
                .ok_or_else(|| ArgsError::InvalidAssignment(assignment.to_string()))?;
            record.insert(key.trim(), Some(value.to_string()));
        }
        Ok(record)
    }
}

impl<K, V> FromIterator<(K, V)> for InputRecord
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut record = Self::new();
        for (k, v) in iter {
            record.insert(k, Some(v.into()));
        }
        record
    }
}

/// Environment variable holding an input, following the Actions runner
/// convention: spaces become underscores, the name is upper-cased and
/// hyphens are kept (`lock-timeout` → `INPUT_LOCK-TIMEOUT`).
pub fn input_env_key(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

/// Normalize an input name to kebab-case.
///
/// Accepted spellings are kebab-case, snake_case, camelCase and
/// SHOUTING_CASE. Any other casing (`Var`, `LockTimeout`) is returned
/// unchanged and so matches no flag.
pub fn canonical_name(name: &str) -> String {
    let name = name.trim();
    let has_lower = name.chars().any(|c| c.is_ascii_lowercase());
    if has_lower && name.starts_with(|c: char| c.is_ascii_uppercase()) {
        return name.to_string();
    }
    let mut out = String::with_capacity(name.len() + 4);

    for (i, c) in name.chars().enumerate() {
        match c {
            '_' | ' ' | '-' => out.push('-'),
            c if c.is_ascii_uppercase() => {
                // camelCase boundary; SHOUTING_CASE has no lowercase letters
                if has_lower && i > 0 && !out.ends_with('-') {
                    out.push('-');
                }
                out.push(c.to_ascii_lowercase());
            }
            c => out.push(c),
        }
    }
    out
}

fn yaml_scalar(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_canonical_name_variants() {
        assert_eq!(canonical_name("lock-timeout"), "lock-timeout");
        assert_eq!(canonical_name("lockTimeout"), "lock-timeout");
        assert_eq!(canonical_name("lock_timeout"), "lock-timeout");
        assert_eq!(canonical_name("LOCK_TIMEOUT"), "lock-timeout");
        assert_eq!(canonical_name("generateConfigOut"), "generate-config-out");
        assert_eq!(canonical_name("var"), "var");
        assert_eq!(canonical_name("VAR"), "var");
    }

    #[test]
    fn test_leading_capital_is_not_folded() {
        assert_eq!(canonical_name("Var"), "Var");
        assert_eq!(canonical_name("LockTimeout"), "LockTimeout");

        let record = InputRecord::new().with("Var", "x").with("LockTimeout", "5s");
        assert_eq!(record.get("var"), None);
        assert_eq!(record.get("lock-timeout"), None);
    }

    #[test]
    fn test_empty_value_is_absent() {
        let record = InputRecord::new().with("var", "").with_null("chdir");
        assert!(record.contains("var"));
        assert_eq!(record.get("var"), None);
        assert_eq!(record.get("chdir"), None);
        assert_eq!(record.get("missing"), None);
    }

    #[test]
    fn test_camel_and_kebab_address_same_input() {
        let record = InputRecord::new()
            .with("varFile", "a.tfvars")
            .with("var-file", "b.tfvars");
        assert_eq!(record.len(), 1);
        assert_eq!(record.get("var_file"), Some("b.tfvars"));
    }

    #[test]
    fn test_input_env_key() {
        assert_eq!(input_env_key("lock-timeout"), "INPUT_LOCK-TIMEOUT");
        assert_eq!(input_env_key("working directory"), "INPUT_WORKING_DIRECTORY");
    }

    #[test]
    fn test_from_lookup_trims_and_skips_unknown() {
        let env: HashMap<&str, &str> =
            [("INPUT_VAR", "  a=1 "), ("INPUT_NO-COLOR", "true"), ("INPUT_UPGRADE", "  ")]
                .into_iter()
                .collect();

        let record = InputRecord::from_lookup(["var", "no-color", "upgrade", "chdir"], |k| {
            env.get(k).map(|v| v.to_string())
        });

        assert_eq!(record.get("var"), Some("a=1"));
        assert_eq!(record.get("no-color"), Some("true"));
        assert!(!record.contains("upgrade"));
        assert!(!record.contains("chdir"));
    }

    #[test]
    fn test_from_yaml_stringifies_scalars() {
        let record = InputRecord::from_yaml_str(
            "upgrade: true\nparallelism: 5\nchdir: ./infra\nvar: ~\n",
        )
        .unwrap();

        assert_eq!(record.get("upgrade"), Some("true"));
        assert_eq!(record.get("parallelism"), Some("5"));
        assert_eq!(record.get("chdir"), Some("./infra"));
        assert!(record.contains("var"));
        assert_eq!(record.get("var"), None);
    }

    #[test]
    fn test_from_yaml_rejects_nested_values() {
        let err = InputRecord::from_yaml_str("var:\n  - a\n  - b\n").unwrap_err();
        assert!(matches!(err, ArgsError::NestedValue { key } if key == "var"));

        let err = InputRecord::from_yaml_str("- a\n- b\n").unwrap_err();
        assert!(matches!(err, ArgsError::NotAMapping));
    }

    #[test]
    fn test_from_json() {
        let record =
            InputRecord::from_json_str(r#"{"lockTimeout": "30s", "json": true, "out": null}"#)
                .unwrap();
        assert_eq!(record.get("lock-timeout"), Some("30s"));
        assert_eq!(record.get("json"), Some("true"));
        assert_eq!(record.get("out"), None);
    }

    #[test]
    fn test_from_assignments_splits_on_first_equals() {
        let record =
            InputRecord::from_assignments(["var=region=us-east-1,env=prod", "upgrade=true"])
                .unwrap();
        assert_eq!(record.get("var"), Some("region=us-east-1,env=prod"));
        assert_eq!(record.get("upgrade"), Some("true"));

        assert!(InputRecord::from_assignments(["novalue"]).is_err());
        assert!(InputRecord::from_assignments(["=x"]).is_err());
    }

    #[test]
    fn test_merge_overrides() {
        let mut base = InputRecord::new().with("var", "a=1").with("upgrade", "true");
        base.merge(InputRecord::new().with("var", "b=2"));
        assert_eq!(base.get("var"), Some("b=2"));
        assert_eq!(base.get("upgrade"), Some("true"));
    }
}
