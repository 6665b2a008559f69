use std::{
    collections::HashMap,
    env, fs,
    path::PathBuf,
};

use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required variable {name}. Set it in the environment or in {searched}")]
    MissingVar { name: String, searched: String },

    #[error("Unable to read env file {path}: {source}")]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Variables the gist surface needs.
pub const GIST_VARS: &[&str] = &["GITHUB_TOKEN"];

/// Variables the confluence surface needs.
pub const CONFLUENCE_VARS: &[&str] = &["CONFLUENCE_URL", "CONFLUENCE_EMAIL", "CONFLUENCE_API_TOKEN"];

/// Candidate fallback env files, in lookup order: a `.env` next to the
/// executable, then the user config directory.
pub fn env_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(exe) = env::current_exe() {
        if let Some(dir) = exe.parent() {
            candidates.push(dir.join(".env"));
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        candidates.push(config_dir.join("snipdoc").join("env"));
    }

    candidates
}

/// Parse simple `KEY=VALUE` lines. Blank lines and `#` comments are
/// skipped; a leading `export ` and surrounding quotes are stripped.
pub fn parse_env_file(content: &str) -> HashMap<String, String> {
    let mut entries = HashMap::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };

        let key = key.trim();
        if key.is_empty() {
            continue;
        }

        let value = value.trim();
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
            .unwrap_or(value);

        entries.insert(key.to_string(), value.to_string());
    }

    entries
}

/// Resolve `required` variable names to values. The process environment
/// wins; file entries only fill variables the environment lacks.
fn merge(
    required: &[&str],
    env_vars: &HashMap<String, String>,
    file_entries: &HashMap<String, String>,
    searched: &str,
) -> Result<HashMap<String, String>> {
    let mut resolved = HashMap::new();

    for name in required {
        // Filter blanks per source: a whitespace-only environment value
        // must not mask a usable file entry.
        let value = env_vars
            .get(*name)
            .filter(|v| !v.trim().is_empty())
            .or_else(|| file_entries.get(*name).filter(|v| !v.trim().is_empty()));

        match value {
            Some(v) => {
                resolved.insert((*name).to_string(), v.clone());
            }
            None => {
                return Err(ConfigError::MissingVar {
                    name: (*name).to_string(),
                    searched: searched.to_string(),
                })
            }
        }
    }

    Ok(resolved)
}

/// Resolve required variables from the environment, falling back to the
/// first fallback env file that exists. File entries for variables the
/// environment lacks are also exported into the process environment.
pub fn resolve(required: &[&str]) -> Result<HashMap<String, String>> {
    let env_vars: HashMap<String, String> = required
        .iter()
        .filter_map(|name| env::var(name).ok().map(|v| ((*name).to_string(), v)))
        .collect();

    let all_present = required
        .iter()
        .all(|name| env_vars.get(*name).is_some_and(|v| !v.trim().is_empty()));

    let candidates = env_file_candidates();
    let searched = candidates
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" or ");

    if all_present {
        return merge(required, &env_vars, &HashMap::new(), &searched);
    }

    let mut file_entries = HashMap::new();
    for path in &candidates {
        if !path.exists() {
            continue;
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "Loading fallback env file");
        file_entries = parse_env_file(&content);
        break;
    }

    for (key, value) in &file_entries {
        if env::var(key).is_err() {
            env::set_var(key, value);
        }
    }

    merge(required, &env_vars, &file_entries, &searched)
}

/// Credentials for the GitHub Gists API.
#[derive(Debug, Clone)]
pub struct GithubCredentials {
    pub token: String,
}

impl GithubCredentials {
    pub fn resolve() -> Result<Self> {
        let vars = resolve(GIST_VARS)?;
        Ok(Self {
            token: vars["GITHUB_TOKEN"].clone(),
        })
    }
}

/// Credentials for the Confluence Cloud API.
#[derive(Debug, Clone)]
pub struct ConfluenceCredentials {
    pub base_url: String,
    pub email: String,
    pub api_token: String,
}

impl ConfluenceCredentials {
    pub fn resolve() -> Result<Self> {
        let vars = resolve(CONFLUENCE_VARS)?;
        Ok(Self {
            base_url: vars["CONFLUENCE_URL"].trim_end_matches('/').to_string(),
            email: vars["CONFLUENCE_EMAIL"].clone(),
            api_token: vars["CONFLUENCE_API_TOKEN"].clone(),
        })
    }
}
