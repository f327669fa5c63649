//! The per-relation entry types of a module descriptor record.
//!
//! A record carries four ordered relation tables - requires, exports, opens and
//! provides - whose rows are the small value types in this module. The same types
//! back both record variants: the decoder materializes them out of payload bytes,
//! the builder accumulates them directly.
//!
//! Rows hold typed [`SymbolRef`] handles and raw `u16` flag masks. Raw mask fields
//! are public and always readable; the structured flag accessors validate against
//! the location's vocabulary and fail on unknown bits (see [`crate::metadata::flags`]).

use crate::{
    metadata::{
        flags::{
            has_flag, unknown_bits_error, AccessFlag, ExportsFlags, FlagLocation, OpensFlags,
            RequiresFlags,
        },
        symbols::{Class, Module, Package, SymbolRef, Utf8},
    },
    Result,
};

/// A single row of the requires table: a dependence on another module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiresInfo {
    /// The required module
    pub module: SymbolRef<Module>,
    /// Raw requires flags mask
    pub flags: u16,
    /// The required module version, if recorded
    pub version: Option<SymbolRef<Utf8>>,
}

impl RequiresInfo {
    /// The flags of this dependence as a typed set.
    ///
    /// # Errors
    /// Fails with [`crate::Error::InvalidFlag`] if the mask has bits outside the
    /// requires vocabulary; read [`RequiresInfo::flags`] directly to tolerate them.
    pub fn requires_flags(&self) -> Result<RequiresFlags> {
        RequiresFlags::from_bits(self.flags)
            .ok_or_else(|| unknown_bits_error(self.flags, FlagLocation::Requires))
    }

    /// Pure bit test for a named flag; never fails.
    pub fn has_flag(&self, flag: AccessFlag) -> bool {
        has_flag(self.flags, flag)
    }
}

/// A single row of the exports table: a package made accessible to other modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportsInfo {
    /// The exported package
    pub package: SymbolRef<Package>,
    /// Raw exports flags mask
    pub flags: u16,
    /// The modules the package is exported to; empty for an unqualified export
    pub to: Vec<SymbolRef<Module>>,
}

impl ExportsInfo {
    /// The flags of this export as a typed set.
    ///
    /// # Errors
    /// Fails with [`crate::Error::InvalidFlag`] if the mask has bits outside the
    /// exports vocabulary.
    pub fn exports_flags(&self) -> Result<ExportsFlags> {
        ExportsFlags::from_bits(self.flags)
            .ok_or_else(|| unknown_bits_error(self.flags, FlagLocation::Exports))
    }

    /// Pure bit test for a named flag; never fails.
    pub fn has_flag(&self, flag: AccessFlag) -> bool {
        has_flag(self.flags, flag)
    }

    /// Whether this export is restricted to specific modules.
    ///
    /// An empty `to` list means the package is exported to every module.
    pub fn is_qualified(&self) -> bool {
        !self.to.is_empty()
    }
}

/// A single row of the opens table: a package opened for deep reflection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpensInfo {
    /// The opened package
    pub package: SymbolRef<Package>,
    /// Raw opens flags mask
    pub flags: u16,
    /// The modules the package is opened to; empty for an unqualified open
    pub to: Vec<SymbolRef<Module>>,
}

impl OpensInfo {
    /// The flags of this open as a typed set.
    ///
    /// # Errors
    /// Fails with [`crate::Error::InvalidFlag`] if the mask has bits outside the
    /// opens vocabulary.
    pub fn opens_flags(&self) -> Result<OpensFlags> {
        OpensFlags::from_bits(self.flags)
            .ok_or_else(|| unknown_bits_error(self.flags, FlagLocation::Opens))
    }

    /// Pure bit test for a named flag; never fails.
    pub fn has_flag(&self, flag: AccessFlag) -> bool {
        has_flag(self.flags, flag)
    }

    /// Whether this open is restricted to specific modules.
    pub fn is_qualified(&self) -> bool {
        !self.to.is_empty()
    }
}

/// A single row of the provides table: a service and its implementation classes.
///
/// The implementations list is never empty for a well-formed row; the builder
/// rejects empty lists at append time and the decoder rejects a zero count as
/// malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvidesInfo {
    /// The provided service interface
    pub service: SymbolRef<Class>,
    /// The implementation classes provided for the service
    pub with: Vec<SymbolRef<Class>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::symbols::SymbolTable;

    #[test]
    fn requires_flags_roundtrip() {
        let symbols = SymbolTable::new();
        let info = RequiresInfo {
            module: symbols.module("java.base"),
            flags: 0x8000,
            version: None,
        };

        assert_eq!(info.requires_flags().unwrap(), RequiresFlags::MANDATED);
        assert!(info.has_flag(AccessFlag::Mandated));
        assert!(!info.has_flag(AccessFlag::Transitive));
    }

    #[test]
    fn requires_flags_rejects_unknown_bits() {
        let symbols = SymbolTable::new();
        let info = RequiresInfo {
            module: symbols.module("java.base"),
            flags: 0x0001,
            version: None,
        };

        assert!(info.requires_flags().is_err());
        // the raw mask and the bit test still work
        assert_eq!(info.flags, 0x0001);
        assert!(!info.has_flag(AccessFlag::Mandated));
    }

    #[test]
    fn unqualified_export() {
        let symbols = SymbolTable::new();
        let info = ExportsInfo {
            package: symbols.package("com/example/api"),
            flags: 0,
            to: Vec::new(),
        };

        assert!(!info.is_qualified());
    }

    #[test]
    fn qualified_export() {
        let symbols = SymbolTable::new();
        let info = ExportsInfo {
            package: symbols.package("com/example/internal"),
            flags: 0,
            to: vec![symbols.module("com.example.friend")],
        };

        assert!(info.is_qualified());
    }
}
