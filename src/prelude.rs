//! # moddesc Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and
//! traits from the moddesc library. Import this module to get quick access to the
//! essential types for working with module descriptor records.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all moddesc operations
pub use crate::Error;

/// The result type used throughout moddesc
pub use crate::Result;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// The module descriptor record and its builder
pub use crate::metadata::module::{ModuleAttribute, ModuleAttributeBuilder};

// ================================================================================================
// Relation Records
// ================================================================================================

/// The per-relation entry types of a record
pub use crate::metadata::module::{ExportsInfo, OpensInfo, ProvidesInfo, RequiresInfo};

// ================================================================================================
// Symbol Table
// ================================================================================================

/// The shared interned symbol table and its typed handles
pub use crate::metadata::symbols::{
    Class, Module, Package, SymbolEntry, SymbolKind, SymbolRef, SymbolTable, Utf8,
};

// ================================================================================================
// Flags
// ================================================================================================

/// Typed flag vocabularies, one per location
pub use crate::metadata::flags::{ExportsFlags, ModuleFlags, OpensFlags, RequiresFlags};

/// The named-flag layer and its operations
pub use crate::metadata::flags::{
    flags_mask, has_flag, named_flags, AccessFlag, FlagLocation,
};
