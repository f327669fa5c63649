//! Eagerly built backing for a module descriptor record.
//!
//! The built variant owns its relation lists outright - they were accumulated by
//! the builder and snapshotted on finalize - so every accessor is a direct read
//! with no parsing and no caching. Only the symbol table is borrowed, like in the
//! decoded variant: names live in the container's table, records hold handles.
//!
//! Instances are constructed exclusively by
//! [`crate::ModuleAttributeBuilder::build`]; the type is immutable from then on.

use crate::metadata::{
    module::info::{ExportsInfo, OpensInfo, ProvidesInfo, RequiresInfo},
    symbols::{Class, Module, SymbolRef, SymbolTable, Utf8},
};

/// Record backing that holds all relation tables in memory.
#[derive(Debug)]
pub(crate) struct BuiltModuleAttribute<'a> {
    pub(crate) symbols: &'a SymbolTable,
    pub(crate) name: SymbolRef<Module>,
    pub(crate) flags: u16,
    pub(crate) version: Option<SymbolRef<Utf8>>,
    pub(crate) requires: Vec<RequiresInfo>,
    pub(crate) exports: Vec<ExportsInfo>,
    pub(crate) opens: Vec<OpensInfo>,
    pub(crate) uses: Vec<SymbolRef<Class>>,
    pub(crate) provides: Vec<ProvidesInfo>,
}
