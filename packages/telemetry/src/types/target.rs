//! Fetch targets and the registry that holds them.
//!
//! The registry is read-only once loaded. All validation happens here so the
//! rest of the pipeline can assume well-formed addresses and known fields.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};
use url::Url;

use crate::error::{ConfigError, ConfigResult};
use crate::types::field::FieldId;

/// Element tag that carries field values on the monitoring pages.
pub const DEFAULT_TAG: &str = "span";

const BUILTIN_ADDRESSES: [&str; 3] = [
    "http://tienching.ipvita.net/InstantPower.aspx?gw6UXnBQFxQcqRQvH_s-Zw&lang=traditional_chinese&time=0",
    "http://tienching.ipvita.net/InstantPower.aspx?9SGSfISfMFauB-qNFJwe2w&lang=traditional_chinese&time=",
    "http://tienching.ipvita.net/InstantPower.aspx?Us4azBhQh_643NPCj6EZzQ&lang=traditional_chinese&time=0",
];

/// One remote source and the fields to read from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    address: String,
    fields: IndexSet<FieldId>,
}

impl Target {
    /// Create a validated target.
    ///
    /// The address must be an absolute http(s) URL and `fields` must be
    /// non-empty with no repeats.
    pub fn new(
        address: impl Into<String>,
        fields: impl IntoIterator<Item = FieldId>,
    ) -> ConfigResult<Self> {
        let address = address.into();
        validate_address(&address)?;

        let mut set = IndexSet::new();
        for field in fields {
            if !set.insert(field) {
                return Err(ConfigError::DuplicateField {
                    address,
                    field: field.to_string(),
                });
            }
        }
        if set.is_empty() {
            return Err(ConfigError::NoFields { address });
        }

        Ok(Self {
            address,
            fields: set,
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Requested fields, in configuration order.
    pub fn fields(&self) -> &IndexSet<FieldId> {
        &self.fields
    }
}

fn validate_address(address: &str) -> ConfigResult<()> {
    let url = Url::parse(address).map_err(|e| ConfigError::InvalidAddress {
        address: address.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidAddress {
            address: address.to_string(),
            reason: format!("unsupported scheme {}", other),
        }),
    }
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default = "default_tag")]
    tag: String,
    targets: Vec<TargetEntry>,
}

#[derive(Debug, Deserialize)]
struct TargetEntry {
    address: String,
    fields: Vec<String>,
}

fn default_tag() -> String {
    DEFAULT_TAG.to_string()
}

/// Ordered, immutable list of targets.
#[derive(Debug, Clone, Serialize)]
pub struct TargetRegistry {
    tag: String,
    targets: Vec<Target>,
}

impl TargetRegistry {
    /// Create a registry from already-validated targets.
    pub fn new(targets: Vec<Target>) -> ConfigResult<Self> {
        Self::with_tag(DEFAULT_TAG, targets)
    }

    /// Create a registry whose values live in `tag` elements.
    pub fn with_tag(tag: impl Into<String>, targets: Vec<Target>) -> ConfigResult<Self> {
        let tag = tag.into();
        let simple = !tag.is_empty() && tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !simple || scraper::Selector::parse(&tag).is_err() {
            return Err(ConfigError::InvalidTag(tag));
        }
        Ok(Self { tag, targets })
    }

    /// The three solar-plant monitoring stations, five fields each.
    pub fn builtin() -> Self {
        let targets = BUILTIN_ADDRESSES
            .iter()
            .map(|address| Target {
                address: address.to_string(),
                fields: FieldId::ALL.into_iter().collect(),
            })
            .collect();

        Self {
            tag: default_tag(),
            targets,
        }
    }

    /// Parse and validate a registry from JSON.
    ///
    /// ```json
    /// {"tag": "span", "targets": [{"address": "http://...", "fields": ["lbl_daily_pw"]}]}
    /// ```
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let file: RegistryFile = serde_json::from_str(json)?;

        let mut targets = Vec::with_capacity(file.targets.len());
        for entry in file.targets {
            let fields = entry
                .fields
                .iter()
                .map(|f| f.parse::<FieldId>())
                .collect::<ConfigResult<Vec<_>>>()?;
            targets.push(Target::new(entry.address, fields)?);
        }

        Self::with_tag(file.tag, targets)
    }

    /// Load a registry file from disk.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading target registry");

        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let registry = Self::from_json_str(&json)?;

        info!(
            path = %path.display(),
            targets = registry.len(),
            tag = %registry.tag,
            "Target registry loaded"
        );
        Ok(registry)
    }

    /// Load from `path` when given, otherwise use [`TargetRegistry::builtin`].
    pub fn load_or_builtin(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::builtin()),
        }
    }

    /// Tag kind that scopes element lookup.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter()
    }
}
