//! Gradebook configuration and service factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use gradebook_core::session::SessionConfig;
use gradebook_core::statistics::TopGradeRule;
use gradebook_core::traits::RosterService;
use gradebook_core::view::SortKey;

use crate::http::{HttpRosterService, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

/// Environment variable that overrides `api_base`.
pub const API_BASE_ENV: &str = "GRADEBOOK_API_BASE";

/// Top-level gradebook configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradebookConfig {
    /// Base URL of the student-record API.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// How the dashboard picks its top grade.
    #[serde(default)]
    pub top_grade: TopGradeRule,
    /// Sort applied to a fresh view.
    #[serde(default)]
    pub default_sort: SortKey,
    /// Where exports are written.
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
}

fn default_api_base() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for GradebookConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            timeout_secs: default_timeout(),
            top_grade: TopGradeRule::default(),
            default_sort: SortKey::default(),
            export_dir: default_export_dir(),
        }
    }
}

impl GradebookConfig {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            top_grade: self.top_grade,
            initial_sort: self.default_sort,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are inserted as-is and never scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + 2 + len];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + 2 + len + 1..];
    }
    result.push_str(rest);
    result
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `gradebook.toml` in the current directory
/// 2. `~/.config/gradebook/config.toml`
///
/// `GRADEBOOK_API_BASE` overrides the configured `api_base`.
pub fn load_config_from(path: Option<&Path>) -> Result<GradebookConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("gradebook.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<GradebookConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => GradebookConfig::default(),
    };

    if let Ok(base) = std::env::var(API_BASE_ENV) {
        config.api_base = base;
    }
    config.api_base = resolve_env_vars(&config.api_base);
    anyhow::ensure!(
        config.timeout_secs > 0,
        "timeout_secs must be greater than zero"
    );

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("gradebook"))
}

/// Create the HTTP roster service described by `config`.
pub fn create_service(config: &GradebookConfig) -> Result<Arc<dyn RosterService>> {
    let service = HttpRosterService::new(&config.api_base, config.timeout_secs)
        .with_context(|| format!("failed to create service for {}", config.api_base))?;
    Ok(Arc::new(service))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_GRADEBOOK_TEST_HOST", "grades.local");
        assert_eq!(resolve_env_vars("${_GRADEBOOK_TEST_HOST}"), "grades.local");
        assert_eq!(
            resolve_env_vars("http://${_GRADEBOOK_TEST_HOST}:8080/api"),
            "http://grades.local:8080/api"
        );
        assert_eq!(resolve_env_vars("no ${closing"), "no ${closing");
        std::env::remove_var("_GRADEBOOK_TEST_HOST");
    }

    #[test]
    fn resolved_values_are_not_rescanned() {
        std::env::set_var("_GRADEBOOK_TEST_NESTED", "${_GRADEBOOK_TEST_NESTED}");
        assert_eq!(
            resolve_env_vars("a/${_GRADEBOOK_TEST_NESTED}/b"),
            "a/${_GRADEBOOK_TEST_NESTED}/b"
        );
        std::env::remove_var("_GRADEBOOK_TEST_NESTED");

        assert_eq!(resolve_env_vars("${_GRADEBOOK_TEST_UNSET}x"), "x");
    }

    #[test]
    fn default_sort_accepts_every_spelling() {
        for (raw, expected) in [
            ("unsorted", SortKey::Unsorted),
            ("none", SortKey::Unsorted),
            ("id", SortKey::StudentId),
            ("studentId", SortKey::StudentId),
            ("avg", SortKey::Average),
            ("height", SortKey::Unsorted),
        ] {
            let config: GradebookConfig =
                toml::from_str(&format!("default_sort = \"{raw}\"")).unwrap();
            assert_eq!(config.default_sort, expected, "{raw}");
        }
    }

    #[test]
    fn default_config() {
        let config = GradebookConfig::default();
        assert_eq!(config.api_base, "http://localhost:8080/api");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.top_grade, TopGradeRule::Lexicographic);
        assert_eq!(config.default_sort, SortKey::Unsorted);
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
api_base = "http://grades.example.com/api"
timeout_secs = 10
top_grade = "academic"
default_sort = "average"
export_dir = "exports"
"#;
        let config: GradebookConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.top_grade, TopGradeRule::Academic);
        assert_eq!(config.default_sort, SortKey::Average);
        assert_eq!(config.export_dir, PathBuf::from("exports"));

        let session = config.session_config();
        assert_eq!(session.top_grade, TopGradeRule::Academic);
        assert_eq!(session.initial_sort, SortKey::Average);
    }

    #[test]
    fn partial_config_uses_defaults() {
        let config: GradebookConfig = toml::from_str("timeout_secs = 5").unwrap();
        assert_eq!(config.api_base, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn unknown_top_grade_rule_is_rejected() {
        assert!(toml::from_str::<GradebookConfig>("top_grade = \"best\"").is_err());
    }

    #[test]
    fn explicit_path_must_exist() {
        let err = load_config_from(Some(Path::new("/nonexistent/gradebook.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("gradebook.toml");
        std::fs::write(&path, "top_grade = \"academic\"\ntimeout_secs = 7\n").unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.top_grade, TopGradeRule::Academic);
        assert_eq!(config.timeout_secs, 7);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("gradebook.toml");
        std::fs::write(&path, "timeout_secs = 0\n").unwrap();
        assert!(load_config_from(Some(&path)).is_err());
    }
}
