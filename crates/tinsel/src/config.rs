//! Loading of `tinsel.yml` project files into [`BuildOptions`].
//!
//! ```yaml
//! public: public          # required, wiped on every build
//! static: static          # optional
//! source: src
//! templates: templates
//! partials: templates/partials
//! permalink_collisions: warn
//! name: My Site           # anything else is template data, available as `site.name`
//! ```
use std::{
    fs,
    path::{Path, PathBuf},
};

use log::debug;
use serde_yaml::Value;

use crate::{
    BuildOptions, CollisionPolicy,
    content::{Fields, mapping_into_fields},
    errors::ConfigError,
};

pub const DEFAULT_CONFIG_FILE: &str = "tinsel.yml";

/// Exposed to templates by the generator itself, a config can't override it.
const RESERVED_KEYS: &[&str] = &["pages"];

/// Reads and parses the config file at `path`. Relative paths inside it are resolved against the directory the
/// config file is in.
pub fn load_config(path: impl AsRef<Path>) -> Result<BuildOptions, ConfigError> {
    let path = path.as_ref();

    let raw = fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;

    let base_dir = path.parent().unwrap_or(Path::new(""));
    let options = parse_config(&raw, path, base_dir)?;

    debug!(target: "build", "Loaded config from {}", path.display());

    Ok(options)
}

fn parse_config(raw: &str, path: &Path, base_dir: &Path) -> Result<BuildOptions, ConfigError> {
    let not_a_mapping = || ConfigError::NotAMapping {
        path: path.to_path_buf(),
    };

    let value: Value = serde_yaml::from_str(raw).map_err(|source| ConfigError::ParseFailed {
        path: path.to_path_buf(),
        source,
    })?;

    let fields = match value {
        Value::Mapping(mapping) => mapping_into_fields(mapping).ok_or_else(not_a_mapping)?,
        _ => return Err(not_a_mapping()),
    };

    if let Some(key) = RESERVED_KEYS.iter().find(|key| fields.contains_key(**key)) {
        return Err(ConfigError::ReservedKey {
            key: key.to_string(),
        });
    }

    let defaults = BuildOptions::default();

    let output_dir = path_field(&fields, "public", base_dir)?.ok_or(ConfigError::MissingOutputDir)?;
    let static_dir = path_field(&fields, "static", base_dir)?;
    let source_dir = path_field(&fields, "source", base_dir)?.unwrap_or_else(|| base_dir.join(&defaults.source_dir));
    let templates_dir =
        path_field(&fields, "templates", base_dir)?.unwrap_or_else(|| base_dir.join(&defaults.templates_dir));
    let partials_dir = path_field(&fields, "partials", base_dir)?.unwrap_or_else(|| templates_dir.join("partials"));

    let permalink_collisions = match fields.get("permalink_collisions") {
        None | Some(Value::Null) => CollisionPolicy::default(),
        Some(Value::String(value)) => parse_collision_policy(value)?,
        Some(other) => {
            return Err(ConfigError::InvalidCollisionPolicy {
                value: serde_yaml::to_string(other).unwrap_or_default().trim().to_string(),
            });
        }
    };

    Ok(BuildOptions {
        output_dir,
        static_dir,
        source_dir,
        templates_dir,
        partials_dir,
        permalink_collisions,
        site_data: fields,
    })
}

/// A path-valued key. Missing, null and empty values are all absent.
fn path_field(fields: &Fields, key: &str, base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) if value.is_empty() => Ok(None),
        Some(Value::String(value)) => Ok(Some(base_dir.join(value))),
        Some(_) => Err(ConfigError::InvalidPath { key: key.to_string() }),
    }
}

fn parse_collision_policy(value: &str) -> Result<CollisionPolicy, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "warn" => Ok(CollisionPolicy::Warn),
        "error" => Ok(CollisionPolicy::Error),
        _ => Err(ConfigError::InvalidCollisionPolicy {
            value: value.to_string(),
        }),
    }
}
