use crate::error::{MirrorError, Result};
use clap::Parser;
use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_MIRROR_LIST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MIRROR_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_COUNT: usize = 5;
pub const DEFAULT_PINGS: usize = 5;

#[derive(Parser, Debug, Default)]
#[command(name = "mirrorlist")]
#[command(about = "Generate a pacman mirror list from the fastest responding mirrors", long_about = None)]
pub struct Args {
    /// Request timeout for the mirror list URL (e.g. 10s, 500ms, 1m30s)
    #[arg(long, value_parser = humantime::parse_duration)]
    pub mirror_list_timeout: Option<Duration>,

    /// Request timeout for each mirror probe
    #[arg(long, value_parser = humantime::parse_duration)]
    pub mirror_timeout: Option<Duration>,

    /// Use only HTTP mirrors. Can not be combined with --https-only
    #[arg(long)]
    pub http_only: bool,

    /// Use only HTTPS mirrors. Can not be combined with --http-only
    #[arg(long)]
    pub https_only: bool,

    /// Count of mirrors to generate
    #[arg(long, short)]
    pub count: Option<usize>,

    /// Pings per mirror. More pings give steadier numbers but take longer
    #[arg(long, short)]
    pub pings: Option<usize>,

    /// Write the mirror list to a file instead of stdout (truncates it)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Keep a timestamped copy of an existing output file before overwriting
    #[arg(long, requires = "output")]
    pub backup: bool,

    /// Display warnings for mirrors that fail
    #[arg(long, short, overrides_with = "no_verbose")]
    pub verbose: bool,

    /// Hide per-mirror warnings, even if the config file enables them
    #[arg(long, overrides_with = "verbose")]
    pub no_verbose: bool,

    /// Config file (defaults to <config dir>/mirrorlist/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// `--verbose` / `--no-verbose`, whichever came last; `None` if neither.
    pub fn verbose_flag(&self) -> Option<bool> {
        match (self.verbose, self.no_verbose) {
            (true, _) => Some(true),
            (false, true) => Some(false),
            (false, false) => None,
        }
    }
}

/// Which mirrors the list is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    All,
    Http,
    Https,
}

impl Protocol {
    /// Combine the two scheme flags. `None` means neither was given.
    pub fn from_flags(http_only: bool, https_only: bool) -> Result<Option<Protocol>> {
        match (http_only, https_only) {
            (true, true) => Err(MirrorError::ConflictingProtocols),
            (true, false) => Ok(Some(Protocol::Http)),
            (false, true) => Ok(Some(Protocol::Https)),
            (false, false) => Ok(None),
        }
    }
}

/// Contents of config.toml. Every key is optional; CLI flags win.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub mirror_list_timeout: Option<String>,
    pub mirror_timeout: Option<String>,
    pub protocol: Option<Protocol>,
    pub count: Option<usize>,
    pub pings: Option<usize>,
    pub verbose: Option<bool>,
}

impl FileConfig {
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load the config file.
    /// 1. An explicit path must exist and parse.
    /// 2. Otherwise the per-user default is used if present.
    /// 3. Otherwise everything falls back to the built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            let content = fs::read_to_string(path)?;
            return Self::parse(&content);
        }

        match default_config_path() {
            Some(path) if path.exists() => {
                tracing::debug!("loading config from {:?}", path);
                let content = fs::read_to_string(&path)?;
                Self::parse(&content)
            }
            _ => Ok(Self::default()),
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "mirrorlist").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Run configuration. Built once before anything touches the network and
/// only ever borrowed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub mirror_list_timeout: Duration,
    pub mirror_timeout: Duration,
    pub protocol: Protocol,
    pub count: usize,
    pub pings: usize,
    pub output: Option<PathBuf>,
    pub backup: bool,
    pub verbose: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mirror_list_timeout: DEFAULT_MIRROR_LIST_TIMEOUT,
            mirror_timeout: DEFAULT_MIRROR_TIMEOUT,
            protocol: Protocol::All,
            count: DEFAULT_COUNT,
            pings: DEFAULT_PINGS,
            output: None,
            backup: false,
            verbose: false,
        }
    }
}

impl Settings {
    pub fn resolve(args: &Args) -> Result<Self> {
        let file = FileConfig::load(args.config.as_deref())?;
        Self::merge(args, file)
    }

    /// CLI > config file > defaults, then validate.
    pub fn merge(args: &Args, file: FileConfig) -> Result<Self> {
        let defaults = Settings::default();

        let file_duration = |key: &str, value: Option<String>| -> Result<Option<Duration>> {
            value
                .map(|v| {
                    humantime::parse_duration(&v).map_err(|e| {
                        MirrorError::InvalidSetting(format!("{} = \"{}\": {}", key, v, e))
                    })
                })
                .transpose()
        };

        let settings = Settings {
            mirror_list_timeout: args
                .mirror_list_timeout
                .or(file_duration("mirror_list_timeout", file.mirror_list_timeout)?)
                .unwrap_or(defaults.mirror_list_timeout),
            mirror_timeout: args
                .mirror_timeout
                .or(file_duration("mirror_timeout", file.mirror_timeout)?)
                .unwrap_or(defaults.mirror_timeout),
            protocol: Protocol::from_flags(args.http_only, args.https_only)?
                .or(file.protocol)
                .unwrap_or(defaults.protocol),
            count: args.count.or(file.count).unwrap_or(defaults.count),
            pings: args.pings.or(file.pings).unwrap_or(defaults.pings),
            output: args.output.clone(),
            backup: args.backup,
            verbose: args
                .verbose_flag()
                .or(file.verbose)
                .unwrap_or(defaults.verbose),
        };

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(MirrorError::InvalidSetting(
                "count must be at least 1".to_string(),
            ));
        }
        if self.pings == 0 {
            return Err(MirrorError::InvalidSetting(
                "pings must be at least 1".to_string(),
            ));
        }
        if self.mirror_list_timeout.is_zero() || self.mirror_timeout.is_zero() {
            return Err(MirrorError::InvalidSetting(
                "timeouts must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
