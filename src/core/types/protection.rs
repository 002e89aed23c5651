//! Page protection flags and their `rwx` mask representation

use super::error::ArgumentError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Read/write/execute protection of a memory range, also used as a range filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PageProtection {
    value: u8,
}

impl PageProtection {
    pub const NONE: PageProtection = PageProtection { value: 0 };
    pub const READ: PageProtection = PageProtection { value: 0b001 };
    pub const WRITE: PageProtection = PageProtection { value: 0b010 };
    pub const EXECUTE: PageProtection = PageProtection { value: 0b100 };

    /// Builds a protection from individual flags
    pub const fn new(read: bool, write: bool, execute: bool) -> Self {
        PageProtection {
            value: (read as u8) | ((write as u8) << 1) | ((execute as u8) << 2),
        }
    }

    /// Read-write protection
    pub const fn read_write() -> Self {
        Self::new(true, true, false)
    }

    /// Read-execute protection
    pub const fn read_execute() -> Self {
        Self::new(true, false, true)
    }

    /// Check if protection allows reading
    pub const fn is_readable(&self) -> bool {
        self.value & Self::READ.value != 0
    }

    /// Check if protection allows writing
    pub const fn is_writable(&self) -> bool {
        self.value & Self::WRITE.value != 0
    }

    /// Check if protection allows execution
    pub const fn is_executable(&self) -> bool {
        self.value & Self::EXECUTE.value != 0
    }

    /// True when every flag of `other` is also granted here
    pub const fn contains(&self, other: PageProtection) -> bool {
        self.value & other.value == other.value
    }

    /// Union of both flag sets
    pub const fn union(self, other: PageProtection) -> Self {
        PageProtection {
            value: self.value | other.value,
        }
    }

    /// Parses a mask such as `"rw-"`, `"r-x"` or `"rx"`.
    ///
    /// Characters may appear in any order; `-` grants nothing.
    pub fn parse_mask(mask: &str) -> Result<Self, char> {
        mask.chars().try_fold(Self::NONE, |prot, c| match c {
            'r' => Ok(prot.union(Self::READ)),
            'w' => Ok(prot.union(Self::WRITE)),
            'x' => Ok(prot.union(Self::EXECUTE)),
            '-' => Ok(prot),
            other => Err(other),
        })
    }

    /// Renders the fixed three-character `rwx` form
    pub fn to_mask(&self) -> [u8; 3] {
        [
            if self.is_readable() { b'r' } else { b'-' },
            if self.is_writable() { b'w' } else { b'-' },
            if self.is_executable() { b'x' } else { b'-' },
        ]
    }
}

impl fmt::Display for PageProtection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.to_mask() {
            write!(f, "{}", c as char)?;
        }
        Ok(())
    }
}

impl FromStr for PageProtection {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PageProtection::parse_mask(s).map_err(|_| ArgumentError::InvalidProtection {
            operation: "protection",
            mask: s.to_string(),
        })
    }
}

impl TryFrom<String> for PageProtection {
    type Error = ArgumentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PageProtection> for String {
    fn from(prot: PageProtection) -> Self {
        prot.to_string()
    }
}
