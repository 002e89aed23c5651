//! Native descriptors produced by an introspection provider

use super::{Address, PageProtection};
use serde::{Deserialize, Serialize};

/// Kind of an imported symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportKind {
    Function,
    Variable,
    #[default]
    Unknown,
}

/// Kind of an exported symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    #[default]
    Function,
    Variable,
}

/// A symbol a module resolves from elsewhere at load time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportDescriptor {
    #[serde(default, rename = "type")]
    pub kind: ImportKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    /// Null when the provider could not resolve it
    #[serde(default, skip_serializing_if = "Address::is_null")]
    pub address: Address,
}

impl ImportDescriptor {
    /// Creates an import with only a name; kind unknown, no module, no address
    pub fn new(name: impl Into<String>) -> Self {
        ImportDescriptor {
            kind: ImportKind::Unknown,
            name: name.into(),
            module: None,
            address: Address::null(),
        }
    }

    pub fn with_kind(mut self, kind: ImportKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.address = address;
        self
    }
}

/// A symbol a module makes available to others
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportDescriptor {
    #[serde(default, rename = "type")]
    pub kind: ExportKind,
    pub name: String,
    pub address: Address,
}

impl ExportDescriptor {
    /// Creates a function export
    pub fn function(name: impl Into<String>, address: Address) -> Self {
        ExportDescriptor {
            kind: ExportKind::Function,
            name: name.into(),
            address,
        }
    }

    /// Creates a variable export
    pub fn variable(name: impl Into<String>, address: Address) -> Self {
        ExportDescriptor {
            kind: ExportKind::Variable,
            name: name.into(),
            address,
        }
    }
}

/// A contiguous span of a module's mapping with uniform protection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeDescriptor {
    pub base: Address,
    pub size: u64,
    pub protection: PageProtection,
}

impl RangeDescriptor {
    pub fn new(base: Address, size: u64, protection: PageProtection) -> Self {
        RangeDescriptor {
            base,
            size,
            protection,
        }
    }

    /// First address past the end of the range
    pub fn end_address(&self) -> Address {
        Address::new(self.base.as_u64().saturating_add(self.size))
    }

    /// Checks if an address is within this range
    pub fn contains(&self, address: Address) -> bool {
        address >= self.base && address < self.end_address()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_builder() {
        let import = ImportDescriptor::new("malloc")
            .with_kind(ImportKind::Function)
            .with_module("libc.so.6")
            .with_address(Address::new(0x7000));

        assert_eq!(import.kind, ImportKind::Function);
        assert_eq!(import.module.as_deref(), Some("libc.so.6"));
        assert_eq!(import.address, Address::new(0x7000));

        let bare = ImportDescriptor::new("environ");
        assert_eq!(bare.kind, ImportKind::Unknown);
        assert!(bare.module.is_none());
        assert!(bare.address.is_null());
    }

    #[test]
    fn test_import_deserializes_with_defaults() {
        let import: ImportDescriptor = serde_json::from_str(r#"{"name": "open"}"#).unwrap();
        assert_eq!(import, ImportDescriptor::new("open"));

        let import: ImportDescriptor = serde_json::from_str(
            r#"{"type": "variable", "name": "errno", "module": "libc.so.6", "address": 4096}"#,
        )
        .unwrap();
        assert_eq!(import.kind, ImportKind::Variable);
        assert_eq!(import.address, Address::new(0x1000));
    }

    #[test]
    fn test_range_bounds() {
        let range = RangeDescriptor::new(Address::new(0x1000), 0x1000, PageProtection::READ);
        assert_eq!(range.end_address(), Address::new(0x2000));
        assert!(range.contains(Address::new(0x1fff)));
        assert!(!range.contains(Address::new(0x2000)));
    }
}
