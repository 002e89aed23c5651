//! In-memory provider over a captured process snapshot

use super::{IntrospectionProvider, Visit};
use crate::core::types::{
    Address, BridgeResult, ExportDescriptor, ImportDescriptor, PageProtection, RangeDescriptor,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One loaded module as captured in a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSnapshot {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub base_address: Address,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub imports: Vec<ImportDescriptor>,
    #[serde(default)]
    pub exports: Vec<ExportDescriptor>,
    #[serde(default)]
    pub ranges: Vec<RangeDescriptor>,
}

impl ModuleSnapshot {
    pub fn new(name: impl Into<String>, base_address: Address, size: u64) -> Self {
        ModuleSnapshot {
            name: name.into(),
            path: None,
            base_address,
            size,
            imports: Vec::new(),
            exports: Vec::new(),
            ranges: Vec::new(),
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_import(mut self, import: ImportDescriptor) -> Self {
        self.imports.push(import);
        self
    }

    pub fn with_export(mut self, export: ExportDescriptor) -> Self {
        self.exports.push(export);
        self
    }

    pub fn with_range(mut self, range: RangeDescriptor) -> Self {
        self.ranges.push(range);
        self
    }

    /// Matches the module name case-insensitively, or the full path exactly
    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
            || self.path.as_deref().is_some_and(|path| path == Path::new(name))
    }

    pub fn find_export(&self, symbol_name: &str) -> Option<&ExportDescriptor> {
        self.exports.iter().find(|export| export.name == symbol_name)
    }
}

/// The modules of one process, in load order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSnapshot {
    #[serde(default)]
    pub modules: Vec<ModuleSnapshot>,
}

impl ProcessSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_module(mut self, module: ModuleSnapshot) -> Self {
        self.modules.push(module);
        self
    }

    /// Parses a snapshot from JSON
    pub fn from_json_str(json: &str) -> BridgeResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a snapshot from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> BridgeResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn to_json_string(&self) -> BridgeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// First module matching `name`
    pub fn module(&self, name: &str) -> Option<&ModuleSnapshot> {
        self.modules.iter().find(|module| module.matches(name))
    }
}

/// [`IntrospectionProvider`] answering from a [`ProcessSnapshot`]
#[derive(Debug, Clone, Default)]
pub struct SnapshotProvider {
    snapshot: ProcessSnapshot,
}

impl SnapshotProvider {
    pub fn new(snapshot: ProcessSnapshot) -> Self {
        SnapshotProvider { snapshot }
    }

    /// Loads the snapshot file at `path`
    pub fn from_path<P: AsRef<Path>>(path: P) -> BridgeResult<Self> {
        let path = path.as_ref();
        let snapshot = ProcessSnapshot::load(path)?;
        debug!(
            path = %path.display(),
            modules = snapshot.modules.len(),
            "loaded process snapshot"
        );
        Ok(Self::new(snapshot))
    }

    pub fn snapshot(&self) -> &ProcessSnapshot {
        &self.snapshot
    }

    fn module_or_log(&self, module_name: &str) -> Option<&ModuleSnapshot> {
        let module = self.snapshot.module(module_name);
        if module.is_none() {
            debug!(module = module_name, "module not present in snapshot");
        }
        module
    }
}

/// Feeds `items` to `visitor` until it breaks
fn walk<'a, T: 'a>(
    items: impl IntoIterator<Item = &'a T>,
    visitor: &mut dyn FnMut(&T) -> Visit,
) {
    for item in items {
        if let ControlFlow::Break(()) = visitor(item) {
            break;
        }
    }
}

impl IntrospectionProvider for SnapshotProvider {
    fn enumerate_imports(&self, module_name: &str, visitor: &mut dyn FnMut(&ImportDescriptor) -> Visit) {
        if let Some(module) = self.module_or_log(module_name) {
            walk(&module.imports, visitor);
        }
    }

    fn enumerate_exports(&self, module_name: &str, visitor: &mut dyn FnMut(&ExportDescriptor) -> Visit) {
        if let Some(module) = self.module_or_log(module_name) {
            walk(&module.exports, visitor);
        }
    }

    fn enumerate_ranges(
        &self,
        module_name: &str,
        protection: PageProtection,
        visitor: &mut dyn FnMut(&RangeDescriptor) -> Visit,
    ) {
        if let Some(module) = self.module_or_log(module_name) {
            walk(
                module
                    .ranges
                    .iter()
                    .filter(|range| range.protection.contains(protection)),
                visitor,
            );
        }
    }

    fn find_base_address(&self, module_name: &str) -> Address {
        self.snapshot
            .module(module_name)
            .map_or(Address::null(), |module| module.base_address)
    }

    fn find_export_by_name(&self, module_name: Option<&str>, symbol_name: &str) -> Address {
        let found = match module_name {
            Some(name) => self
                .snapshot
                .module(name)
                .and_then(|module| module.find_export(symbol_name)),
            None => self
                .snapshot
                .modules
                .iter()
                .find_map(|module| module.find_export(symbol_name)),
        };

        found.map_or(Address::null(), |export| export.address)
    }
}
