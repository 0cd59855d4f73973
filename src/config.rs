//! Runtime configuration for the playground binary and the bridge.
//!
//! `Config` locates the compiler asset and names its entry point, with
//! defaults overridable through `VELVEX_*` environment variables. `Options`
//! holds the command line flags of the `velvex` binary.

use std::{env, path::PathBuf};

use crate::{
    console::transcript::DisplayMode,
    errors::errors::{Error, ErrorImpl},
};

pub const DEFAULT_ASSET_ROOT: &str = "/opt/velvex";
pub const DEFAULT_ASSET: &str = "velvex_compiler";
pub const DEFAULT_ENTRY_POINT: &str = "compile_velvet";
pub const DEFAULT_BANNER: &str = "Velvex Runtime v1.2.0 initialized...";

pub const ASSET_ROOT_VAR: &str = "VELVEX_ASSET_ROOT";
pub const ASSET_VAR: &str = "VELVEX_ASSET";
pub const ENTRY_POINT_VAR: &str = "VELVEX_ENTRY_POINT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Absolute directory the compiler asset is always resolved against.
    pub asset_root: PathBuf,
    /// File name of the compiler asset.
    pub asset: String,
    /// The one exported function called per compile request.
    pub entry_point: String,
    /// First transcript line of a fresh console.
    pub banner: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            asset_root: PathBuf::from(DEFAULT_ASSET_ROOT),
            asset: String::from(DEFAULT_ASSET),
            entry_point: String::from(DEFAULT_ENTRY_POINT),
            banner: String::from(DEFAULT_BANNER),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Config, Error> {
        Config::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(root) = lookup(ASSET_ROOT_VAR) {
            config.asset_root = PathBuf::from(root);
        }
        if let Some(asset) = lookup(ASSET_VAR) {
            config.asset = asset;
        }
        if let Some(entry_point) = lookup(ENTRY_POINT_VAR) {
            config.entry_point = entry_point;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !self.asset_root.is_absolute() {
            return Err(Error::new(ErrorImpl::RelativeAssetRoot {
                path: self.asset_root.to_string_lossy().into_owned(),
            }));
        }

        Ok(())
    }

    pub fn asset_path(&self) -> PathBuf {
        self.asset_root.join(&self.asset)
    }
}

/// Command line flags of the `velvex` binary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// Source file, stdin when absent.
    pub file: Option<PathBuf>,
    pub mode: DisplayMode,
    /// Print each worker message as JSON while it arrives.
    pub events: bool,
    /// Print highlight markup instead of compiling.
    pub highlight: bool,
}

impl Options {
    pub fn parse<I>(args: I) -> Result<Options, Error>
    where
        I: IntoIterator<Item = String>,
    {
        let mut options = Options::default();

        for arg in args {
            match arg.as_str() {
                "--render" => options.mode = DisplayMode::Render,
                "--raw" => options.mode = DisplayMode::Raw,
                "--events" => options.events = true,
                "--highlight" => options.highlight = true,
                flag if flag.starts_with("--") => {
                    return Err(Error::new(ErrorImpl::InvalidArgument { argument: arg.clone() }))
                }
                _ if options.file.is_some() => {
                    return Err(Error::new(ErrorImpl::InvalidArgument { argument: arg.clone() }))
                }
                _ => options.file = Some(PathBuf::from(&arg)),
            }
        }

        Ok(options)
    }
}
