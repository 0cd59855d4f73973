use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::errors::errors::Error;

/// Output callback, called once per line the module prints.
pub type OutputHook = Arc<dyn Fn(&str) + Send + Sync>;

/// Maps an asset name and the default prefix to the location to load from.
pub type LocateFileHook = Arc<dyn Fn(&str, &Path) -> PathBuf + Send + Sync>;

/// Everything a module receives at instantiation time.
#[derive(Clone)]
pub struct ModuleConfig {
    pub print: OutputHook,
    pub print_err: OutputHook,
    pub locate_file: LocateFileHook,
}

/// An instantiated compiler module.
///
/// `call` invokes one exported entry point with the sanitized source. It
/// returns nothing useful, all output goes through the `print` and
/// `print_err` hooks it was instantiated with. An `Err` means the call
/// itself failed, not that the source had errors.
pub trait CompilerModule: Send {
    fn call(&mut self, entry_point: &str, code: &str) -> Result<(), Error>;
}

/// Creates compiler modules. Called from a loader thread, at most once at a
/// time per bridge.
pub trait ModuleLoader: Send + Sync + 'static {
    fn instantiate(&self, config: ModuleConfig) -> Result<Box<dyn CompilerModule>, Error>;
}
