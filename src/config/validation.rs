//! Unknown-key detection with Levenshtein suggestions.
//!
//! Two-pass parse approach: first parse raw TOML into `toml::Value`, walk the
//! key tree, compare against known field names and emit warnings with "did
//! you mean?" suggestions. Then proceed with normal serde deserialization.
//! Warnings never break existing configs.

use std::collections::HashSet;

/// A non-fatal config warning.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Every valid dotted key path of `EutrophiaConfig`.
///
/// Kept by hand in step with the section structs.
pub fn known_config_keys() -> HashSet<&'static str> {
    [
        "engine",
        "engine.phase_depth",
        "engine.nutrients_require_both",
        "engine.clamp_inputs",
        "batch",
        "batch.parallel",
        "batch.min_parallel_rows",
        "output",
        "output.locale",
        "output.pretty",
    ]
    .into_iter()
    .collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively collect the dotted key paths of a `toml::Value` tree.
///
/// A table `{ a = { b = 1, c = 2 } }` yields `["a", "a.b", "a.c"]`.
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
            keys.push(path);
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Closest known key within edit distance 3. Ties go to the
/// lexicographically smallest key so suggestions are stable.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|k| (levenshtein(unknown, k), *k))
        .filter(|(dist, _)| *dist <= 3)
        .min()
        .map(|(_, k)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Warnings for every unknown key of a raw TOML string.
///
/// Unparseable input yields no warnings; serde reports it afterwards.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let Ok(value) = raw_toml.parse::<toml::Value>() else {
        return Vec::new();
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("locale", "locale"), 0);
        assert_eq!(levenshtein("paralel", "parallel"), 1);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
    }

    #[test]
    fn test_walk_toml_keys_nested() {
        let toml: toml::Value = "[engine]\nphase_depth = 2\n".parse().unwrap();
        let keys = walk_toml_keys(&toml, "");
        assert!(keys.contains(&"engine".to_string()));
        assert!(keys.contains(&"engine.phase_depth".to_string()));
    }

    #[test]
    fn test_typo_key_produces_warning_with_suggestion() {
        let warnings = validate_unknown_keys("[batch]\nparalel = true\n");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field, "batch.paralel");
        assert_eq!(warnings[0].suggestion.as_deref(), Some("batch.parallel"));
        assert!(warnings[0].to_string().contains("did you mean 'batch.parallel'"));
    }

    #[test]
    fn test_all_valid_keys_produce_zero_warnings() {
        let toml_str = r#"
[engine]
phase_depth = 3
nutrients_require_both = false
clamp_inputs = true

[batch]
parallel = true
min_parallel_rows = 8

[output]
locale = "es"
pretty = true
"#;
        let warnings = validate_unknown_keys(toml_str);
        assert!(warnings.is_empty(), "Expected 0 warnings, got: {warnings:?}");
    }

    #[test]
    fn test_unknown_section_without_close_match() {
        let warnings = validate_unknown_keys("[database]\nurl = \"x\"\n");
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().all(|w| w.field.starts_with("database")));
        assert!(warnings.iter().any(|w| w.suggestion.is_none()));
    }

    #[test]
    fn test_unparseable_toml_is_left_to_serde() {
        assert!(validate_unknown_keys("[engine").is_empty());
    }
}
