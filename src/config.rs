//! Startup configuration: validator locations and schema profiles.
//!
//! Everything here is resolved exactly once, before the batch starts, and
//! passed into the orchestrator by value. Missing files are fatal.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SetupError};

/// Locations of the Java runtime and the two validator jars.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolConfig {
    /// Java executable used to launch both validators
    pub java: PathBuf,
    /// Structural validator jar (epubcheck)
    pub epubcheck_jar: PathBuf,
    /// Schema-rule validator jar (probatron)
    pub probatron_jar: PathBuf,
}

impl ToolConfig {
    /// Load from a TOML or JSON file (decided by extension) and verify that
    /// every referenced file exists.
    pub fn load(path: &Path) -> Result<Self> {
        let config: Self = read_config_file(path)?;
        config.verify()?;
        Ok(config)
    }

    fn verify(&self) -> Result<()> {
        for file in [&self.java, &self.epubcheck_jar, &self.probatron_jar] {
            check_file_exists(file)?;
        }
        Ok(())
    }
}

/// Named schema locations for one validation profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub master: PathBuf,
    pub access: PathBuf,
    pub target: PathBuf,
}

impl Profile {
    /// Load from a TOML or JSON file and verify that all three schemas exist.
    pub fn load(path: &Path) -> Result<Self> {
        let profile: Self = read_config_file(path)?;
        for file in [&profile.master, &profile.access, &profile.target] {
            check_file_exists(file)?;
        }
        Ok(profile)
    }

    /// Schema location for a role name, if the name is one of the three roles.
    pub fn schema_for(&self, role: &str) -> Option<&Path> {
        match role {
            "master" => Some(&self.master),
            "access" => Some(&self.access),
            "target" => Some(&self.target),
            _ => None,
        }
    }
}

/// Resolve the CLI schema argument to a `file:///` reference.
///
/// The argument is either one of the profile roles (requires a profile) or a
/// direct path to a schema file. A bare role name with no profile loaded is
/// fatal; so is a schema file that does not exist.
pub fn resolve_schema_ref(schema: &str, profile: Option<&Profile>) -> Result<String> {
    let is_role = matches!(schema, "master" | "access" | "target");

    let path: PathBuf = if let Some(role_path) = profile.and_then(|p| p.schema_for(schema)) {
        role_path.to_path_buf()
    } else if is_role {
        return Err(SetupError::ProfileRequired {
            role: schema.to_string(),
        });
    } else {
        PathBuf::from(schema)
    };

    check_file_exists(&path)?;
    to_file_uri(&path)
}

/// Rewrite a path to a `file:///`-prefixed absolute reference.
///
/// Probatron rejects plain filesystem paths as malformed URLs, so every
/// schema reference handed to it must carry the file scheme.
pub fn to_file_uri(path: &Path) -> Result<String> {
    let absolute = path.canonicalize()?;
    let text = absolute.to_string_lossy();
    // Absolute Unix paths already start with a separator; Windows drive
    // paths do not.
    let trimmed = text.trim_start_matches(['/', '\\']);
    Ok(format!("file:///{}", trimmed.replace('\\', "/")))
}

fn read_config_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    check_file_exists(path)?;
    let contents = std::fs::read_to_string(path)?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => Ok(toml::from_str(&contents)?),
        Some("json") => Ok(serde_json::from_str(&contents)?),
        _ => Err(SetupError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

fn check_file_exists(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(SetupError::MissingFile {
            path: path.to_path_buf(),
        })
    }
}
