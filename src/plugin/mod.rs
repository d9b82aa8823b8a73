//! Run-time loading of analysis modules from shared libraries.
//!
//! A plugin is a `cdylib` named `lib<AnalysisName>.<suffix>` that exports one
//! C-linkage factory, [`FACTORY_SYMBOL`], usually generated by
//! [`export_analysis!`](crate::export_analysis). The factory hands a boxed
//! [`HadronicAnalysis`] to the host, which must be built with the same
//! toolchain as the plugin.
//!
//! [`AnalysisHandle`] owns the instance and, for plugins, the library. The
//! instance is always destroyed before the library is closed.

use libloading::Library;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::analysis::{AnalysisError, HadronicAnalysis, LifecycleState, LifecycleStep, RunContext};
use crate::kinematics::Observables;
use crate::types::ParticleKind;

pub mod registry;


pub use registry::AnalysisRegistry;

/// Name of the factory every plugin exports
pub const FACTORY_SYMBOL: &[u8] = b"create_analysis\0";

/// Directory searched after the platform's default library path
pub const DEFAULT_PLUGIN_DIR: &str = "plugins";

pub type AnalysisBox = Box<dyn HadronicAnalysis>;

/// Signature of [`FACTORY_SYMBOL`]. Ownership of the returned box passes to the caller.
pub type AnalysisFactory = unsafe extern "C" fn() -> *mut AnalysisBox;

#[derive(Debug, Error)]
pub enum PluginError {
    #[error("Analysis plugin '{name}' not found, tried: {tried}")]
    PluginNotFound { name: String, tried: String },
    #[error("Invalid analysis plugin {path}: {reason}")]
    PluginInvalid { path: PathBuf, reason: String },
    #[error("Factory of plugin {0} returned no analysis")]
    NullInstance(PathBuf),
    #[error("Failed to close plugin library: {0}")]
    Close(String),
}

/// Exports a C-linkage factory creating the given analysis.
///
/// A plugin carries its own copy of this crate, so the factory initializes
/// that copy's run logging from the environment before constructing the
/// analysis.
///
/// ```ignore
/// hadronic::export_analysis!(MyAnalysis::default());
/// ```
#[macro_export]
macro_rules! export_analysis {
    ($constructor:expr) => {
        #[no_mangle]
        #[allow(improper_ctypes_definitions)]
        pub extern "C" fn create_analysis() -> *mut $crate::plugin::AnalysisBox {
            $crate::utils::logging::init_logging();
            let analysis: $crate::plugin::AnalysisBox = Box::new($constructor);
            Box::into_raw(Box::new(analysis))
        }
    };
}

/// Finds and opens analysis plugins.
#[derive(Debug, Clone)]
pub struct PluginLoader {
    search_dirs: Vec<PathBuf>,
}

impl Default for PluginLoader {
    fn default() -> Self {
        Self::new(vec![PathBuf::from(DEFAULT_PLUGIN_DIR)])
    }
}

impl PluginLoader {
    pub fn new(search_dirs: Vec<PathBuf>) -> Self {
        Self { search_dirs }
    }

    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    /// Library paths tried for `name`: the bare file name (resolved by the
    /// platform loader), then the file name in each search directory.
    pub fn candidates(&self, name: &str) -> Vec<PathBuf> {
        let file_name: OsString = libloading::library_filename(name);
        std::iter::once(PathBuf::from(&file_name))
            .chain(self.search_dirs.iter().map(|dir| dir.join(&file_name)))
            .collect()
    }

    /// Loads the analysis plugin `name`.
    pub fn load(&self, name: &str) -> Result<AnalysisHandle, PluginError> {
        load_from_candidates(name, &self.candidates(name))
    }
}

/// Opens the first candidate that loads, then resolves and calls its factory.
pub fn load_from_candidates(name: &str, candidates: &[PathBuf]) -> Result<AnalysisHandle, PluginError> {
    let mut tried = Vec::with_capacity(candidates.len());
    for path in candidates {
        // SAFETY: plugin initializers are trusted to be free of side effects
        match unsafe { Library::new(path) } {
            Ok(library) => return instantiate(path, library),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "plugin candidate did not load");
                tried.push(path.display().to_string());
            }
        }
    }
    Err(PluginError::PluginNotFound { name: name.to_string(), tried: tried.join(", ") })
}

fn instantiate(path: &Path, library: Library) -> Result<AnalysisHandle, PluginError> {
    // SAFETY: the symbol type matches what `export_analysis!` generates
    let lookup: Result<AnalysisFactory, libloading::Error> =
        unsafe { library.get::<AnalysisFactory>(FACTORY_SYMBOL) }.map(|symbol| *symbol);
    let factory = match lookup {
        Ok(factory) => factory,
        Err(e) => {
            drop(library);
            return Err(PluginError::PluginInvalid {
                path: path.to_path_buf(),
                reason: format!("missing factory symbol 'create_analysis': {}", e),
            });
        }
    };

    // SAFETY: the factory returns a pointer from `Box::into_raw` or null
    let raw = unsafe { factory() };
    if raw.is_null() {
        drop(library);
        return Err(PluginError::NullInstance(path.to_path_buf()));
    }
    // SAFETY: non-null and produced by `Box::into_raw` in the plugin
    let instance: AnalysisBox = *unsafe { Box::from_raw(raw) };

    tracing::info!(path = %path.display(), analysis = instance.name(), "loaded analysis plugin");
    Ok(AnalysisHandle::from_library(instance, library))
}

/// Owns an analysis instance and the library its code lives in, if any.
///
/// Calls are checked against the analysis lifecycle before they are
/// forwarded, so a plugin never sees an out-of-order call.
pub struct AnalysisHandle {
    instance: Option<AnalysisBox>,
    library: Option<Library>,
    state: LifecycleState,
}

impl AnalysisHandle {
    /// Wraps an analysis compiled into the current binary.
    pub fn builtin(instance: AnalysisBox) -> Self {
        Self { instance: Some(instance), library: None, state: LifecycleState::Uninitialized }
    }

    fn from_library(instance: AnalysisBox, library: Library) -> Self {
        Self { instance: Some(instance), library: Some(library), state: LifecycleState::Uninitialized }
    }

    pub fn name(&self) -> &str {
        self.instance.as_ref().map(|i| i.name()).unwrap_or("")
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Whether the analysis code lives in a dynamically loaded library
    pub fn is_plugin(&self) -> bool {
        self.library.is_some()
    }

    pub fn initialize(&mut self, ctx: &RunContext) -> Result<(), AnalysisError> {
        let next = self.state.advance(LifecycleStep::Initialize)?;
        self.instance_mut()?.initialize(ctx)?;
        self.state = next;
        Ok(())
    }

    pub fn fill(&mut self, observables: &Observables, particle: &ParticleKind) -> Result<(), AnalysisError> {
        self.state.advance(LifecycleStep::Fill)?;
        self.instance_mut()?.fill(observables, particle);
        Ok(())
    }

    pub fn finalize(&mut self) -> Result<(), AnalysisError> {
        let next = self.state.advance(LifecycleStep::Finalize)?;
        self.instance_mut()?.finalize()?;
        self.state = next;
        Ok(())
    }

    /// Destroys the instance, then closes the library.
    pub fn unload(mut self) -> Result<(), PluginError> {
        self.release()
    }

    fn instance_mut(&mut self) -> Result<&mut AnalysisBox, AnalysisError> {
        self.instance
            .as_mut()
            .ok_or_else(|| AnalysisError::Internal("analysis already unloaded".to_string()))
    }

    fn release(&mut self) -> Result<(), PluginError> {
        if let Some(instance) = self.instance.take() {
            tracing::debug!(analysis = instance.name(), "destroying analysis instance");
            drop(instance);
        }
        if let Some(library) = self.library.take() {
            library.close().map_err(|e| PluginError::Close(e.to_string()))?;
            tracing::info!("closed analysis plugin library");
        }
        Ok(())
    }
}

impl Drop for AnalysisHandle {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            tracing::warn!(error = %e, "failed to release analysis plugin");
        }
    }
}

impl std::fmt::Debug for AnalysisHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisHandle")
            .field("name", &self.name())
            .field("state", &self.state)
            .field("plugin", &self.is_plugin())
            .finish()
    }
}
