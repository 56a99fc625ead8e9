//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ScaffoldError, ScaffoldResult};

use super::env_validator::{closest, EnvVarValidator};
use super::types::{Config, ParseErrorPolicy};

/// Name of the project config file, looked up at the project root
pub const CONFIG_FILE_NAME: &str = "scaffold.toml";

const ENV_ON_PARSE_ERROR: &str = "SCAFFOLD_ON_PARSE_ERROR";
const ENV_FILE_MODE: &str = "SCAFFOLD_FILE_MODE";
const ENV_LOG: &str = "SCAFFOLD_LOG";

/// Non-fatal configuration warning surfaced to users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> ScaffoldResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path).map_err(|source| ScaffoldError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_with_warnings(&content, path)
}

/// Parse config text; `path` is only used in warnings and errors.
pub fn parse_with_warnings(
    content: &str,
    path: &Path,
) -> ScaffoldResult<(Config, Vec<ConfigWarning>)> {
    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| ScaffoldError::InvalidConfig {
        message: format!("{}: {}", path.display(), e),
    })?;

    validate(&config)?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Owner, group and other permission bits; special bits are never set.
const MAX_FILE_MODE: u32 = 0o777;

fn validate(config: &Config) -> ScaffoldResult<()> {
    // A mode written in decimal (`644`) lands above 0o777.
    if config.sync.file_mode > MAX_FILE_MODE {
        return Err(ScaffoldError::InvalidConfig {
            message: format!(
                "sync.file_mode {} is not a permission mode; write it in octal, e.g. 0o644",
                config.sync.file_mode
            ),
        });
    }
    Ok(())
}

/// Load the project config or defaults, then apply environment overrides
pub fn load_or_default(project_root: &Path) -> ScaffoldResult<(Config, Vec<ConfigWarning>)> {
    let path = project_root.join(CONFIG_FILE_NAME);
    let (config, warnings) = if path.exists() {
        load_with_warnings(&path)?
    } else {
        (Config::default(), Vec::new())
    };
    Ok((config.with_env_overrides(), warnings))
}

/// Apply environment variable overrides (SCAFFOLD_* prefix).
///
/// `lookup` resolves a variable name; invalid values are reported and ignored.
pub fn with_env_overrides(mut config: Config, lookup: impl Fn(&str) -> Option<String>) -> Config {
    if let Some(value) = lookup(ENV_ON_PARSE_ERROR) {
        config.sync.on_parse_error = EnvVarValidator::new(
            ENV_ON_PARSE_ERROR,
            ParseErrorPolicy::VALUES,
        )
        .parse(&value, ParseErrorPolicy::from_name, config.sync.on_parse_error);
    }

    if let Some(value) = lookup(ENV_FILE_MODE) {
        config.sync.file_mode = EnvVarValidator::new(ENV_FILE_MODE, &["644", "600", "664"]).parse(
            &value,
            parse_octal_mode,
            config.sync.file_mode,
        );
    }

    if let Some(filter) = lookup(ENV_LOG) {
        if !filter.trim().is_empty() {
            config.log.filter = filter;
        }
    }

    config
}

/// Parse an octal permission mode such as `644`, `0644` or `0o644`.
pub fn parse_octal_mode(value: &str) -> Option<u32> {
    let digits = value.trim();
    let digits = digits.strip_prefix("0o").unwrap_or(digits);
    u32::from_str_radix(digits, 8)
        .ok()
        .filter(|mode| *mode <= MAX_FILE_MODE)
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "sync",
        "on_parse_error",
        "file_mode",
        "skip_unchanged",
        "log",
        "filter",
    ];

    closest(unknown, CANDIDATES)
        .filter(|(_, dist)| *dist <= 2)
        .map(|(candidate, _)| candidate.to_string())
}
