//! Typed environment variable access and one-shot `.env` loading.
//!
//! Centralizes the fallback logic so business code never chains `or_else`
//! on raw `env::var` calls.

use std::env;
use std::str::FromStr;

/// Load `.env` from the current directory into the process environment.
/// Runs at most once per process and never overrides variables that are
/// already set.
pub fn load_dotenv() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let path = env::current_dir()
            .map(|d| d.join(".env"))
            .unwrap_or_else(|_| std::path::PathBuf::from(".env"));
        let Ok(content) = std::fs::read_to_string(&path) else {
            return;
        };
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some(eq_pos) = line.find('=') else { continue };
            let key = line[..eq_pos].trim();
            let mut value = line[eq_pos + 1..].trim();
            // Strip inline comment (# not inside quotes)
            if let Some(hash_pos) = value.find('#') {
                let before_hash = value[..hash_pos].trim_end();
                if !before_hash.contains('"') && !before_hash.contains('\'') {
                    value = before_hash;
                }
            }
            if (value.starts_with('"') && value.ends_with('"') && value.len() >= 2)
                || (value.starts_with('\'') && value.ends_with('\'') && value.len() >= 2)
            {
                value = &value[1..value.len() - 1];
            }
            if !key.is_empty() && env::var(key).is_err() {
                env::set_var(key, value);
            }
        }
    });
}

/// Read an env var, falling back to `default` when unset or empty.
pub fn env_or<F>(key: &str, default: F) -> String
where
    F: FnOnce() -> String,
{
    env::var(key)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(default)
}

/// Read an env var; empty values count as unset.
pub fn env_optional(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|s| {
        let s = s.trim().to_string();
        if s.is_empty() {
            None
        } else {
            Some(s)
        }
    })
}

/// Read a boolean env var: `1`/`true`/`yes` (any case) are true,
/// `0`/`false`/`no` are false, anything else falls back to `default`.
pub fn env_bool(key: &str, default: bool) -> bool {
    match env_optional(key).map(|v| v.to_lowercase()) {
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes") => true,
        Some(v) if matches!(v.as_str(), "0" | "false" | "no") => false,
        _ => default,
    }
}

/// Read and parse an env var, falling back to `default` when unset or
/// unparseable.
pub fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env_optional(key)
        .and_then(|s| s.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env mutation is process-global; each test uses its own key so the
    // default parallel test runner can't race.

    #[test]
    fn test_env_or_default_on_unset() {
        assert_eq!(env_or("DEVUP_TEST_UNSET_A", || "fallback".into()), "fallback");
    }

    #[test]
    fn test_env_or_empty_counts_as_unset() {
        env::set_var("DEVUP_TEST_EMPTY_B", "  ");
        assert_eq!(env_or("DEVUP_TEST_EMPTY_B", || "fallback".into()), "fallback");
    }

    #[test]
    fn test_env_bool_variants() {
        env::set_var("DEVUP_TEST_BOOL_C", "YES");
        assert!(env_bool("DEVUP_TEST_BOOL_C", false));
        env::set_var("DEVUP_TEST_BOOL_D", "0");
        assert!(!env_bool("DEVUP_TEST_BOOL_D", true));
        assert!(env_bool("DEVUP_TEST_BOOL_UNSET_E", true));
    }

    #[test]
    fn test_env_parse_bad_value_falls_back() {
        env::set_var("DEVUP_TEST_PORT_F", "not-a-port");
        assert_eq!(env_parse::<u16>("DEVUP_TEST_PORT_F", 8000), 8000);
        env::set_var("DEVUP_TEST_PORT_G", "9001");
        assert_eq!(env_parse::<u16>("DEVUP_TEST_PORT_G", 8000), 9001);
    }
}
