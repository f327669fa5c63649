//! # Module Descriptor Record
//!
//! This module provides the object model and codec for the module descriptor record
//! of a class file container: the module's name, flags and version, and its five
//! relation tables (requires, exports, opens, uses, provides). There is at most one
//! such record per container.
//!
//! The record follows a dual-variant pattern behind one public type:
//! - *Decoded*: borrows payload bytes and parses the relation tables lazily
//! - *Built*: produced by [`ModuleAttributeBuilder`], holds its tables eagerly
//!
//! Both variants are observably identical for the same logical content; consumers
//! depend only on the accessor surface of [`ModuleAttribute`] and cannot name the
//! concrete variant. The variant set is closed: construction goes through
//! [`ModuleAttribute::decode`] or the builder, and nothing outside this module can
//! add a third backing.
//!
//! ## Usage
//!
//! ```rust
//! use moddesc::{ModuleAttribute, ModuleAttributeBuilder, SymbolTable};
//!
//! let symbols = SymbolTable::new();
//! let mut builder = ModuleAttributeBuilder::new(&symbols);
//! builder
//!     .module_name("com.example.core")
//!     .requires("java.base", 0x8000, None);
//! let record = builder.build()?;
//!
//! let bytes = record.encode(&symbols)?;
//! let decoded = ModuleAttribute::decode(&bytes, &symbols)?;
//! assert_eq!(decoded.requires()?, record.requires()?);
//! # Ok::<(), moddesc::Error>(())
//! ```

mod built;
mod builder;
mod decoded;
mod info;
mod writer;

pub use builder::*;
pub use info::*;

use crate::{
    metadata::{
        flags::{has_flag, unknown_bits_error, AccessFlag, FlagLocation, ModuleFlags},
        symbols::{Class, Module, SymbolRef, SymbolTable, Utf8},
    },
    Result,
};

use built::BuiltModuleAttribute;
use decoded::DecodedModuleAttribute;

/// A module descriptor record.
///
/// One public surface over two crate-private backings: a lazily decoded view over
/// borrowed payload bytes, or an eagerly built view from
/// [`ModuleAttributeBuilder`]. The lifetime parameter is the borrow of the payload
/// bytes and the symbol table; a built record borrows only the table.
///
/// # Accessor fallibility
///
/// The head fields (`module_name`, `module_flags_mask`, `module_version`) are
/// available on any record without failure. The relation sequence accessors return
/// `Result` because a decoded record parses its tables on first access and the
/// payload may turn out malformed there; on a built record they never fail. The
/// structured [`ModuleAttribute::module_flags`] accessor fails only for masks with
/// bits outside the module vocabulary, while the raw mask accessor is total - see
/// [`crate::metadata::flags`] for why that asymmetry is deliberate.
#[derive(Debug)]
pub struct ModuleAttribute<'a> {
    repr: Repr<'a>,
}

#[derive(Debug)]
enum Repr<'a> {
    Decoded(DecodedModuleAttribute<'a>),
    Built(BuiltModuleAttribute<'a>),
}

impl<'a> ModuleAttribute<'a> {
    /// Decode a record from its payload bytes.
    ///
    /// `data` must be exactly the record payload (the container's attribute framing
    /// is the caller's concern). The fixed head - name, flags, version - is parsed
    /// and validated immediately; the relation tables are parsed in one pass on
    /// first access to any of the sequence accessors and cached thereafter. The
    /// record borrows `data` and `symbols` for its lifetime and owns neither.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the head is truncated or its symbol
    /// indices do not resolve to entries of the required kinds. Malformation inside
    /// the relation tables surfaces at the first sequence access instead.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use moddesc::{ModuleAttribute, SymbolTable};
    ///
    /// let symbols = SymbolTable::new();
    /// let name = symbols.module("com.example.core");
    ///
    /// let mut payload = vec![0u8; 16];
    /// payload[..2].copy_from_slice(&name.index().to_be_bytes());
    /// // flags, version and all five table counts stay zero
    ///
    /// let record = ModuleAttribute::decode(&payload, &symbols)?;
    /// assert_eq!(record.module_name().name(&symbols)?, "com.example.core");
    /// assert!(record.requires()?.is_empty());
    /// # Ok::<(), moddesc::Error>(())
    /// ```
    pub fn decode(data: &'a [u8], symbols: &'a SymbolTable) -> Result<Self> {
        Ok(ModuleAttribute {
            repr: Repr::Decoded(DecodedModuleAttribute::decode(data, symbols)?),
        })
    }

    pub(crate) fn from_built(built: BuiltModuleAttribute<'a>) -> Self {
        ModuleAttribute {
            repr: Repr::Built(built),
        }
    }

    /// Serialize this record into the exact payload byte layout.
    ///
    /// Every symbol reference is interned through `target` first. When `target` is
    /// the same table instance this record resolves against, the original indices
    /// are reused and a decode-encode round trip is byte-identical. With a different
    /// table, every name is resolved and freshly interned, which preserves the
    /// record's content but generally not its index values.
    ///
    /// # Errors
    /// Inherited from the record itself: a decoded record whose tables turn out
    /// malformed fails here with [`crate::Error::Malformed`]. A well-formed record
    /// always encodes.
    pub fn encode(&self, target: &SymbolTable) -> Result<Vec<u8>> {
        writer::encode(self, target)
    }

    /// The symbol table this record's references resolve against.
    pub fn symbols(&self) -> &'a SymbolTable {
        match &self.repr {
            Repr::Decoded(decoded) => decoded.symbols(),
            Repr::Built(built) => built.symbols,
        }
    }

    /// The name of the module.
    pub fn module_name(&self) -> SymbolRef<Module> {
        match &self.repr {
            Repr::Decoded(decoded) => decoded.name(),
            Repr::Built(built) => built.name,
        }
    }

    /// The module flags as a raw bit mask.
    ///
    /// Always succeeds, for any 16-bit value - including masks carrying bits this
    /// library does not define.
    pub fn module_flags_mask(&self) -> u16 {
        match &self.repr {
            Repr::Decoded(decoded) => decoded.flags(),
            Repr::Built(built) => built.flags,
        }
    }

    /// The module flags as a typed set.
    ///
    /// # Errors
    /// Fails with [`crate::Error::InvalidFlag`] iff the mask has a bit outside the
    /// module vocabulary.
    pub fn module_flags(&self) -> Result<ModuleFlags> {
        let mask = self.module_flags_mask();
        ModuleFlags::from_bits(mask).ok_or_else(|| unknown_bits_error(mask, FlagLocation::Module))
    }

    /// Pure bit test for a named flag on the module mask; never fails.
    pub fn has_flag(&self, flag: AccessFlag) -> bool {
        has_flag(self.module_flags_mask(), flag)
    }

    /// The version of the module, if recorded.
    pub fn module_version(&self) -> Option<SymbolRef<Utf8>> {
        match &self.repr {
            Repr::Decoded(decoded) => decoded.version(),
            Repr::Built(built) => built.version,
        }
    }

    /// The modules required by this module, in record order.
    ///
    /// # Errors
    /// On a decoded record, the first sequence access parses all relation tables;
    /// a malformed payload fails with [`crate::Error::Malformed`].
    pub fn requires(&self) -> Result<&[RequiresInfo]> {
        match &self.repr {
            Repr::Decoded(decoded) => Ok(&decoded.tables()?.requires),
            Repr::Built(built) => Ok(&built.requires),
        }
    }

    /// The packages exported by this module, in record order.
    ///
    /// # Errors
    /// Same as [`ModuleAttribute::requires`].
    pub fn exports(&self) -> Result<&[ExportsInfo]> {
        match &self.repr {
            Repr::Decoded(decoded) => Ok(&decoded.tables()?.exports),
            Repr::Built(built) => Ok(&built.exports),
        }
    }

    /// The packages opened by this module, in record order.
    ///
    /// # Errors
    /// Same as [`ModuleAttribute::requires`].
    pub fn opens(&self) -> Result<&[OpensInfo]> {
        match &self.repr {
            Repr::Decoded(decoded) => Ok(&decoded.tables()?.opens),
            Repr::Built(built) => Ok(&built.opens),
        }
    }

    /// The services used by this module, in record order.
    ///
    /// # Errors
    /// Same as [`ModuleAttribute::requires`].
    pub fn uses(&self) -> Result<&[SymbolRef<Class>]> {
        match &self.repr {
            Repr::Decoded(decoded) => Ok(&decoded.tables()?.uses),
            Repr::Built(built) => Ok(&built.uses),
        }
    }

    /// The service implementations provided by this module, in record order.
    ///
    /// # Errors
    /// Same as [`ModuleAttribute::requires`].
    pub fn provides(&self) -> Result<&[ProvidesInfo]> {
        match &self.repr {
            Repr::Decoded(decoded) => Ok(&decoded.tables()?.provides),
            Repr::Built(built) => Ok(&built.provides),
        }
    }
}
