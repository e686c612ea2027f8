use crate::cli::Overrides;
use anyhow::{bail, Context, Result};
use parcel_ast::names::{parcel_name, ParcelName};
use pcc_bind_host::HostOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG: &str = "parcelc.json5";

/// Contents of parcelc.json5
#[derive(Debug, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub sources: Vec<PathBuf>,
    /// Directories of parcels which are linked against but not generated
    #[serde(default)]
    pub includes: Vec<PathBuf>,
    /// Parcels which must be declared in the sources or includes
    #[serde(default)]
    pub prereqs: Vec<String>,
    pub dest: Option<PathBuf>,
    pub header: Option<String>,
    pub footer: Option<String>,
    pub host: Option<HostConfig>,
}

#[derive(Debug, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HostConfig {
    pub parcels: Vec<String>,
    pub module: Option<String>,
    /// Hand-written sources which include the generated glue
    #[serde(default)]
    pub ext_sources: Vec<PathBuf>,
}

/// Config file merged with the command line
#[derive(Debug, PartialEq)]
pub struct Settings {
    sources: Vec<PathBuf>,
    pub includes: Vec<PathBuf>,
    pub prereqs: Vec<ParcelName>,
    dest: Option<PathBuf>,
    pub header: String,
    pub footer: String,
    pub host: Option<HostSettings>,
}

#[derive(Debug, PartialEq)]
pub struct HostSettings {
    pub parcels: Vec<ParcelName>,
    pub module: String,
    pub ext_sources: Vec<PathBuf>,
}

impl HostSettings {
    pub fn options(&self) -> HostOptions {
        HostOptions {
            parcels: self.parcels.clone(),
            module: self.module.clone(),
        }
    }
}

/// Read the config file (if any) and apply the command line overrides
pub fn load(overrides: &Overrides) -> Result<Settings> {
    let (config, base) = match &overrides.config {
        Some(path) => (read_config(path)?, config_dir(path)),
        None => {
            let path = PathBuf::from(DEFAULT_CONFIG);
            if path.is_file() {
                (read_config(&path)?, config_dir(&path))
            } else {
                log::debug!("{} not found; using command line only", DEFAULT_CONFIG);
                (Config::default(), PathBuf::new())
            }
        }
    };
    Settings::new(config, &base, overrides)
}

fn read_config(path: &Path) -> Result<Config> {
    let contents =
        std::fs::read_to_string(path).context(format!("failed to read {}", path.display()))?;
    parse_config(&contents).context(format!("failed to parse {}", path.display()))
}

pub fn parse_config(contents: &str) -> Result<Config, json5::Error> {
    json5::from_str(contents)
}

fn config_dir(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

impl Settings {
    /// Paths in the config file are relative to `base`; the ones given on
    /// the command line are used as is.
    pub fn new(config: Config, base: &Path, overrides: &Overrides) -> Result<Settings> {
        let sources = if overrides.sources.is_empty() {
            config.sources.iter().map(|p| base.join(p)).collect()
        } else {
            overrides.sources.clone()
        };
        let includes = if overrides.includes.is_empty() {
            config.includes.iter().map(|p| base.join(p)).collect()
        } else {
            overrides.includes.clone()
        };
        let prereqs = if overrides.prereqs.is_empty() {
            &config.prereqs
        } else {
            &overrides.prereqs
        };
        let prereqs = prereqs.iter().map(parcel_name).collect();
        let dest = match &overrides.dest {
            Some(d) => Some(d.clone()),
            None => config.dest.as_ref().map(|d| base.join(d)),
        };
        let host = host_settings(config.host, base, overrides)?;
        Ok(Settings {
            sources,
            includes,
            prereqs,
            dest,
            header: config
                .header
                .unwrap_or_else(|| pcc_bind_core::DEFAULT_HEADER.to_string()),
            footer: config.footer.unwrap_or_default(),
            host,
        })
    }

    pub fn sources(&self) -> Result<&[PathBuf]> {
        if self.sources.is_empty() {
            bail!(
                "no source directory is given (use --source or `sources` in {})",
                DEFAULT_CONFIG
            );
        }
        Ok(&self.sources)
    }

    pub fn dest(&self) -> Result<&Path> {
        match &self.dest {
            Some(d) => Ok(d),
            None => bail!(
                "no output directory is given (use --dest or `dest` in {})",
                DEFAULT_CONFIG
            ),
        }
    }
}

fn host_settings(
    config: Option<HostConfig>,
    base: &Path,
    overrides: &Overrides,
) -> Result<Option<HostSettings>> {
    let mut host = match config {
        Some(h) => h,
        None if !overrides.host_parcels.is_empty() => HostConfig::default(),
        None => return Ok(None),
    };
    if !overrides.host_parcels.is_empty() {
        host.parcels = overrides.host_parcels.clone();
    }
    if overrides.host_module.is_some() {
        host.module = overrides.host_module.clone();
    }
    let Some(first) = host.parcels.first() else {
        bail!("`host.parcels` must list at least one parcel");
    };
    let module = host.module.clone().unwrap_or_else(|| default_module(first));
    // Module symbols are lowercase so that they never meet class symbols
    let valid = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_';
    if !module.starts_with(|c: char| c.is_ascii_lowercase()) || !module.chars().all(valid) {
        bail!(
            "host module name `{}` must be a lowercase identifier",
            module
        );
    }
    Ok(Some(HostSettings {
        parcels: host.parcels.iter().map(parcel_name).collect(),
        module,
        ext_sources: host.ext_sources.iter().map(|p| base.join(p)).collect(),
    }))
}

/// `Lucy.Analysis` -> `lucy_analysis`
pub fn default_module(parcel: &str) -> String {
    parcel.to_lowercase().replace('.', "_")
}
