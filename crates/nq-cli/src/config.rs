use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use nq_connect::{ConnectivityConfig, Tagger, Tolerance};
use nq_core::AttributeFilter;
use nq_crossing::CrossingRules;
use serde::Deserialize;

/// Contents of the `--config` TOML file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QaConfig {
    pub input: InputConfig,
    /// Selects the waterway network out of the input layer.
    #[serde(default)]
    pub filter: Option<AttributeFilter>,
    /// Named connectivity checks; each writes its result under its own name.
    #[serde(default)]
    pub connectivity: BTreeMap<String, ConnectivitySection>,
    #[serde(default)]
    pub crossings: Option<CrossingsSection>,
    #[serde(default)]
    pub regions: Vec<RegionConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputConfig {
    /// Waterway line layer (GeoJSON).
    pub path: PathBuf,
    /// Road line layer, needed by the crossings check.
    #[serde(default)]
    pub roads: Option<PathBuf>,
    #[serde(default = "default_id_key")]
    pub id_key: String,
}

/// Outlet selection plus engine settings for one `[connectivity.<name>]` table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectivitySection {
    pub key: String,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CrossingsSection {
    /// Selects roads out of the road layer; all lines are used when absent.
    #[serde(default)]
    pub roads: Option<AttributeFilter>,
    #[serde(default)]
    pub bridge: Option<AttributeFilter>,
    #[serde(default)]
    pub tunnel: Option<AttributeFilter>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegionConfig {
    pub name: String,
    /// `[xmin, ymin, xmax, ymax]`
    pub bbox: [f64; 4],
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            prefix: default_prefix(),
        }
    }
}

fn default_id_key() -> String {
    "osm_id".to_string()
}

fn default_tolerance() -> f64 {
    Tolerance::default().get()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_prefix() -> String {
    "nq".to_string()
}

impl QaConfig {
    /// Reads a config file; relative paths inside it are resolved against the
    /// file's directory.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
        let mut cfg = Self::from_toml_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;

        if let Some(base) = path.parent() {
            cfg.input.path = base.join(&cfg.input.path);
            cfg.input.roads = cfg.input.roads.map(|r| base.join(r));
            cfg.output.dir = base.join(&cfg.output.dir);
        }
        Ok(cfg)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid config")
    }
}

impl ConnectivitySection {
    pub fn outlet_filter(&self) -> AttributeFilter {
        AttributeFilter::new(self.key.clone(), self.values.iter().cloned())
    }

    /// Engine settings for the section called `name`; results go to attribute `name`.
    pub fn engine_config(&self, name: &str) -> Result<ConnectivityConfig> {
        let tolerance = Tolerance::new(self.tolerance)
            .with_context(|| format!("connectivity.{name}.tolerance"))?;
        Ok(ConnectivityConfig {
            tolerance,
            tagger: Tagger {
                result_key: name.to_string(),
                ..Tagger::default()
            },
        })
    }
}

impl CrossingsSection {
    pub fn rules(&self) -> CrossingRules {
        let defaults = CrossingRules::default();
        CrossingRules {
            bridge: self.bridge.clone().unwrap_or(defaults.bridge),
            tunnel: self.tunnel.clone().unwrap_or(defaults.tunnel),
        }
    }
}
