//! Opaque native pointer handed to script code

use super::Address;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::num::NonZeroU64;

/// How a [`NativePointer`] renders itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerFormat {
    /// `0x1000`
    #[default]
    Compact,
    /// `0x0000000000001000`
    Padded,
}

/// A script-visible wrapper around a non-zero native address.
///
/// Immutable and `Copy`: every record or resolver result gets its own value,
/// nothing is shared between the bridge and script code.
#[derive(Debug, Clone, Copy)]
pub struct NativePointer {
    address: NonZeroU64,
    format: PointerFormat,
}

impl NativePointer {
    /// Wraps `address`, or returns `None` for the null sentinel
    pub fn new(address: Address) -> Option<Self> {
        Self::with_format(address, PointerFormat::Compact)
    }

    /// Wraps `address` with an explicit display format
    pub fn with_format(address: Address, format: PointerFormat) -> Option<Self> {
        NonZeroU64::new(address.as_u64()).map(|address| NativePointer { address, format })
    }

    /// The underlying native address, never null
    pub fn address(&self) -> Address {
        Address::new(self.address.get())
    }

    pub fn format(&self) -> PointerFormat {
        self.format
    }
}

impl PartialEq for NativePointer {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl Eq for NativePointer {}

impl Hash for NativePointer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address.hash(state);
    }
}

impl fmt::Display for NativePointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.format {
            PointerFormat::Compact => write!(f, "{:#x}", self.address.get()),
            PointerFormat::Padded => write!(f, "0x{:016x}", self.address.get()),
        }
    }
}

impl Serialize for NativePointer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_is_never_wrapped() {
        assert!(NativePointer::new(Address::null()).is_none());
        assert!(NativePointer::with_format(Address::null(), PointerFormat::Padded).is_none());
    }

    #[test]
    fn test_pointer_keeps_address() {
        let ptr = NativePointer::new(Address::new(0x1000)).unwrap();
        assert_eq!(ptr.address(), Address::new(0x1000));
        assert_eq!(ptr.format(), PointerFormat::Compact);
    }

    #[test]
    fn test_pointer_display_formats() {
        let compact = NativePointer::new(Address::new(0x7f00_dead_beef)).unwrap();
        assert_eq!(compact.to_string(), "0x7f00deadbeef");

        let padded = NativePointer::with_format(Address::new(0x1000), PointerFormat::Padded).unwrap();
        assert_eq!(padded.to_string(), "0x0000000000001000");
    }

    #[test]
    fn test_equality_ignores_format() {
        let a = NativePointer::new(Address::new(0x42)).unwrap();
        let b = NativePointer::with_format(Address::new(0x42), PointerFormat::Padded).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_pointer_serializes_as_string() {
        let ptr = NativePointer::new(Address::new(0xabc)).unwrap();
        assert_eq!(serde_json::to_string(&ptr).unwrap(), "\"0xabc\"");
    }
}
