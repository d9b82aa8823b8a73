//! Name → analysis lookup.
//! Compiled-in analyses are found first, everything else is loaded as a plugin.

use lazy_static::lazy_static;
use std::collections::HashMap;

use super::{AnalysisBox, AnalysisHandle, PluginError, PluginLoader};
use crate::analysis::{na61_2024, na61_reference, Na61Pim2024, Na61Reference};

/// Constructor of a compiled-in analysis
pub type BuiltinFactory = fn() -> AnalysisBox;

fn new_na61_2024() -> AnalysisBox {
    Box::new(Na61Pim2024::default())
}

fn new_na61_reference() -> AnalysisBox {
    Box::new(Na61Reference::default())
}

lazy_static! {
    static ref BUILTINS: HashMap<&'static str, BuiltinFactory> = {
        let mut builtins: HashMap<&'static str, BuiltinFactory> = HashMap::new();
        builtins.insert(na61_2024::NAME, new_na61_2024);
        builtins.insert(na61_reference::NAME, new_na61_reference);
        builtins
    };
}

/// Resolves analysis names to instances.
#[derive(Debug, Clone)]
pub struct AnalysisRegistry {
    builtins: HashMap<&'static str, BuiltinFactory>,
    loader: PluginLoader,
    prefer_plugins: bool,
}

impl Default for AnalysisRegistry {
    fn default() -> Self {
        Self::new(PluginLoader::default())
    }
}

impl AnalysisRegistry {
    /// Registry holding the compiled-in analyses and loading the rest with `loader`
    pub fn new(loader: PluginLoader) -> Self {
        Self { builtins: BUILTINS.clone(), loader, prefer_plugins: false }
    }

    /// Try plugins before compiled-in analyses of the same name.
    pub fn prefer_plugins(mut self, prefer: bool) -> Self {
        self.prefer_plugins = prefer;
        self
    }

    pub fn register(&mut self, name: &'static str, factory: BuiltinFactory) {
        self.builtins.insert(name, factory);
    }

    /// Names of the compiled-in analyses, sorted
    pub fn builtin_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.builtins.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn loader(&self) -> &PluginLoader {
        &self.loader
    }

    /// Instantiates the analysis `name`.
    pub fn resolve(&self, name: &str) -> Result<AnalysisHandle, PluginError> {
        let builtin = self.builtins.get(name);
        match builtin {
            Some(factory) if !self.prefer_plugins => {
                tracing::info!(analysis = name, "using compiled-in analysis");
                Ok(AnalysisHandle::builtin(factory()))
            }
            Some(factory) => self.loader.load(name).or_else(|e| {
                tracing::info!(analysis = name, error = %e, "no plugin, falling back to compiled-in analysis");
                Ok(AnalysisHandle::builtin(factory()))
            }),
            None => self.loader.load(name),
        }
    }
}
