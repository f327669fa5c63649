//! Interned symbol table shared between module descriptor records and their container.
//!
//! The container format stores every name exactly once, in an append-only table of
//! typed entries, and has records refer to those entries by 16-bit index. This module
//! provides the [`SymbolTable`] store together with the typed [`SymbolRef`] handles
//! that records hold instead of owned pointers.
//!
//! # Architecture
//!
//! - [`SymbolEntry`] - a single typed entry: a UTF-8 string, or a class / module /
//!   package reference naming a UTF-8 entry by index
//! - [`SymbolTable`] - append-only interning store; `&self` interning backed by a
//!   lock-free entry list and a sharded dedup index
//! - [`SymbolRef`] - a `u16` index tagged at compile time with the entry kind it
//!   must resolve to
//!
//! Indices are 1-based; index 0 is reserved to mean "no entry" (e.g. an absent
//! module version). The table is shared read-mostly across many records of the same
//! container: records never own it and never remove entries from it.
//!
//! # Usage
//!
//! ```rust
//! use moddesc::SymbolTable;
//!
//! let symbols = SymbolTable::new();
//! let module = symbols.module("java.base");
//! assert_eq!(module.name(&symbols)?, "java.base");
//!
//! // Interning deduplicates by value
//! assert_eq!(module.index(), symbols.module("java.base").index());
//! # Ok::<(), moddesc::Error>(())
//! ```

use std::{marker::PhantomData, sync::Arc};

use dashmap::DashMap;

use crate::Result;

/// A single entry in a [`SymbolTable`].
///
/// Class, module and package entries do not carry their name inline; they reference
/// a [`SymbolEntry::Utf8`] entry by index, mirroring the container's wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SymbolEntry {
    /// A UTF-8 string value.
    Utf8(Arc<str>),
    /// A class reference; the index points at the [`SymbolEntry::Utf8`] entry holding
    /// the class name.
    Class(u16),
    /// A module reference; the index points at the [`SymbolEntry::Utf8`] entry holding
    /// the module name.
    Module(u16),
    /// A package reference; the index points at the [`SymbolEntry::Utf8`] entry holding
    /// the package name.
    Package(u16),
}

impl SymbolEntry {
    /// Human readable entry kind, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            SymbolEntry::Utf8(_) => "Utf8",
            SymbolEntry::Class(_) => "Class",
            SymbolEntry::Module(_) => "Module",
            SymbolEntry::Package(_) => "Package",
        }
    }
}

mod private {
    pub trait Sealed {}

    impl Sealed for super::Utf8 {}
    impl Sealed for super::Class {}
    impl Sealed for super::Module {}
    impl Sealed for super::Package {}
}

/// Compile-time kind marker for [`SymbolRef`] handles.
///
/// Implemented only by the four marker types in this module; the trait is sealed so
/// no further kinds can be added outside the crate.
pub trait SymbolKind: private::Sealed {
    /// Entry kind name, used in diagnostics.
    const NAME: &'static str;

    /// Whether `entry` is of this kind.
    #[doc(hidden)]
    fn matches(entry: &SymbolEntry) -> bool;
}

/// Marker for references that must resolve to a [`SymbolEntry::Utf8`] entry.
#[derive(Debug, Clone, Copy)]
pub struct Utf8;

/// Marker for references that must resolve to a [`SymbolEntry::Class`] entry.
#[derive(Debug, Clone, Copy)]
pub struct Class;

/// Marker for references that must resolve to a [`SymbolEntry::Module`] entry.
#[derive(Debug, Clone, Copy)]
pub struct Module;

/// Marker for references that must resolve to a [`SymbolEntry::Package`] entry.
#[derive(Debug, Clone, Copy)]
pub struct Package;

impl SymbolKind for Utf8 {
    const NAME: &'static str = "Utf8";

    fn matches(entry: &SymbolEntry) -> bool {
        matches!(entry, SymbolEntry::Utf8(_))
    }
}

impl SymbolKind for Class {
    const NAME: &'static str = "Class";

    fn matches(entry: &SymbolEntry) -> bool {
        matches!(entry, SymbolEntry::Class(_))
    }
}

impl SymbolKind for Module {
    const NAME: &'static str = "Module";

    fn matches(entry: &SymbolEntry) -> bool {
        matches!(entry, SymbolEntry::Module(_))
    }
}

impl SymbolKind for Package {
    const NAME: &'static str = "Package";

    fn matches(entry: &SymbolEntry) -> bool {
        matches!(entry, SymbolEntry::Package(_))
    }
}

/// A typed index into a [`SymbolTable`].
///
/// A `SymbolRef` is a plain 16-bit handle: it carries no pointer into the table and
/// is resolved on demand against a caller-supplied table. The kind parameter records
/// which entry kind the handle must resolve to; resolving against an entry of a
/// different kind is a structural error ([`crate::Error::Malformed`]).
pub struct SymbolRef<K: SymbolKind> {
    index: u16,
    _kind: PhantomData<K>,
}

impl<K: SymbolKind> SymbolRef<K> {
    pub(crate) fn new(index: u16) -> Self {
        SymbolRef {
            index,
            _kind: PhantomData,
        }
    }

    /// The raw 1-based table index this handle carries.
    pub fn index(self) -> u16 {
        self.index
    }
}

impl<K: SymbolKind> Clone for SymbolRef<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: SymbolKind> Copy for SymbolRef<K> {}

impl<K: SymbolKind> PartialEq for SymbolRef<K> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<K: SymbolKind> Eq for SymbolRef<K> {}

impl<K: SymbolKind> std::hash::Hash for SymbolRef<K> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<K: SymbolKind> std::fmt::Debug for SymbolRef<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SymbolRef<{}>({})", K::NAME, self.index)
    }
}

impl SymbolRef<Utf8> {
    /// Resolve this reference to its string value.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the index is out of range or the entry
    /// behind it is not a UTF-8 entry (the handle came from a different table).
    pub fn value<'t>(self, symbols: &'t SymbolTable) -> Result<&'t str> {
        symbols.utf8_value(self.index)
    }
}

impl SymbolRef<Class> {
    /// Resolve this reference to the class name it denotes.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the index is out of range or the entry
    /// behind it is not a class entry.
    pub fn name<'t>(self, symbols: &'t SymbolTable) -> Result<&'t str> {
        match symbols.entry(self.index)? {
            SymbolEntry::Class(name) => symbols.utf8_value(*name),
            other => Err(malformed_error!(
                "symbol {} is a {} entry, expected Class",
                self.index,
                other.kind_name()
            )),
        }
    }
}

impl SymbolRef<Module> {
    /// Resolve this reference to the module name it denotes.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the index is out of range or the entry
    /// behind it is not a module entry.
    pub fn name<'t>(self, symbols: &'t SymbolTable) -> Result<&'t str> {
        match symbols.entry(self.index)? {
            SymbolEntry::Module(name) => symbols.utf8_value(*name),
            other => Err(malformed_error!(
                "symbol {} is a {} entry, expected Module",
                self.index,
                other.kind_name()
            )),
        }
    }
}

impl SymbolRef<Package> {
    /// Resolve this reference to the package name it denotes.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the index is out of range or the entry
    /// behind it is not a package entry.
    pub fn name<'t>(self, symbols: &'t SymbolTable) -> Result<&'t str> {
        match symbols.entry(self.index)? {
            SymbolEntry::Package(name) => symbols.utf8_value(*name),
            other => Err(malformed_error!(
                "symbol {} is a {} entry, expected Package",
                self.index,
                other.kind_name()
            )),
        }
    }
}

/// Append-only interning store for [`SymbolEntry`] values.
///
/// The table is externally owned: records hold borrowed back-references into it and
/// plain index handles, never ownership. Entries are interned by value, so repeated
/// interning of the same string or reference yields the same index. Interning takes
/// `&self` - the entry list is a lock-free append-only vector and the dedup index is
/// sharded, so an encoder can intern into a shared table without extra locking.
///
/// Indices are 1-based `u16` values as mandated by the wire format; index 0 is
/// reserved to mean "absent". The format therefore bounds a table at 65534 distinct
/// entries; interning beyond that is outside this codec's contract.
#[derive(Debug, Default)]
pub struct SymbolTable {
    entries: boxcar::Vec<SymbolEntry>,
    interned: DashMap<SymbolEntry, u16>,
}

impl SymbolTable {
    /// Create an empty symbol table.
    pub fn new() -> Self {
        SymbolTable {
            entries: boxcar::Vec::new(),
            interned: DashMap::new(),
        }
    }

    /// Number of entries in the table.
    pub fn len(&self) -> usize {
        self.entries.count()
    }

    /// Whether the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.count() == 0
    }

    /// Intern a UTF-8 string value, returning a typed handle to its entry.
    pub fn utf8(&self, value: &str) -> SymbolRef<Utf8> {
        SymbolRef::new(self.intern(SymbolEntry::Utf8(Arc::from(value))))
    }

    /// Intern a class reference by name, returning a typed handle to its entry.
    ///
    /// The name string is interned first; the class entry references it by index.
    pub fn class(&self, name: &str) -> SymbolRef<Class> {
        let name_index = self.utf8(name).index();
        SymbolRef::new(self.intern(SymbolEntry::Class(name_index)))
    }

    /// Intern a module reference by name, returning a typed handle to its entry.
    pub fn module(&self, name: &str) -> SymbolRef<Module> {
        let name_index = self.utf8(name).index();
        SymbolRef::new(self.intern(SymbolEntry::Module(name_index)))
    }

    /// Intern a package reference by name, returning a typed handle to its entry.
    pub fn package(&self, name: &str) -> SymbolRef<Package> {
        let name_index = self.utf8(name).index();
        SymbolRef::new(self.intern(SymbolEntry::Package(name_index)))
    }

    /// Look up the entry at a 1-based index.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for index 0 (reserved for absent
    /// references) and for indices past the end of the table.
    pub fn entry(&self, index: u16) -> Result<&SymbolEntry> {
        if index == 0 {
            return Err(malformed_error!(
                "symbol index 0 is reserved for absent references"
            ));
        }

        self.entries
            .get(usize::from(index) - 1)
            .ok_or_else(|| malformed_error!("symbol index {} is out of range", index))
    }

    /// Check that `index` resolves to an entry of kind `K` and return the typed handle.
    ///
    /// This is the kind-checked admission path the decoder uses for every index it
    /// reads out of a record payload.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the index is out of range or the entry
    /// is of a different kind.
    pub fn check_ref<K: SymbolKind>(&self, index: u16) -> Result<SymbolRef<K>> {
        let entry = self.entry(index)?;
        if K::matches(entry) {
            Ok(SymbolRef::new(index))
        } else {
            Err(malformed_error!(
                "symbol {} is a {} entry, expected {}",
                index,
                entry.kind_name(),
                K::NAME
            ))
        }
    }

    fn utf8_value(&self, index: u16) -> Result<&str> {
        match self.entry(index)? {
            SymbolEntry::Utf8(value) => Ok(value),
            other => Err(malformed_error!(
                "symbol {} is a {} entry, expected Utf8",
                index,
                other.kind_name()
            )),
        }
    }

    fn intern(&self, entry: SymbolEntry) -> u16 {
        #[allow(clippy::cast_possible_truncation)]
        let index = *self
            .interned
            .entry(entry.clone())
            .or_insert_with(|| (self.entries.push(entry) + 1) as u16);
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_deduplicates() {
        let symbols = SymbolTable::new();

        let a = symbols.module("java.base");
        let b = symbols.module("java.base");
        assert_eq!(a, b);

        // one Utf8 entry plus one Module entry
        assert_eq!(symbols.len(), 2);
    }

    #[test]
    fn distinct_kinds_distinct_entries() {
        let symbols = SymbolTable::new();

        let module = symbols.module("shared.name");
        let package = symbols.package("shared.name");
        assert_ne!(module.index(), package.index());

        // the Utf8 entry backing both names is shared
        assert_eq!(symbols.len(), 3);
    }

    #[test]
    fn resolve_names() {
        let symbols = SymbolTable::new();

        let class = symbols.class("com/example/Widget");
        let module = symbols.module("com.example");
        let package = symbols.package("com/example");

        assert_eq!(class.name(&symbols).unwrap(), "com/example/Widget");
        assert_eq!(module.name(&symbols).unwrap(), "com.example");
        assert_eq!(package.name(&symbols).unwrap(), "com/example");
    }

    #[test]
    fn index_zero_is_reserved() {
        let symbols = SymbolTable::new();
        symbols.utf8("value");

        assert!(symbols.entry(0).is_err());
        assert!(symbols.entry(1).is_ok());
        assert!(symbols.entry(2).is_err());
    }

    #[test]
    fn kind_checked_admission() {
        let symbols = SymbolTable::new();
        let module = symbols.module("java.base");

        assert!(symbols.check_ref::<Module>(module.index()).is_ok());
        assert!(symbols.check_ref::<Class>(module.index()).is_err());
        assert!(symbols.check_ref::<Utf8>(module.index()).is_err());
    }

    #[test]
    fn concurrent_interning_is_consistent() {
        let symbols = SymbolTable::new();

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for i in 0..64 {
                        symbols.module(&format!("module.{}", i % 8));
                    }
                });
            }
        });

        // 8 distinct names -> 8 Utf8 entries + 8 Module entries
        assert_eq!(symbols.len(), 16);
    }
}
