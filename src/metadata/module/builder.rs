//! # Module Attribute Builder
//!
//! Provides a mutable accumulator for constructing module descriptor records from
//! scratch. The builder borrows the container's symbol table and interns every name
//! passed to it; `build` snapshots the accumulated state into an immutable record.
//!
//! ## Overview
//!
//! The `ModuleAttributeBuilder` enables creation of records with:
//! - Name, flags and version setters with last-write-wins semantics
//! - Append-one-entry-at-a-time relation table accumulation
//! - Named-flag overloads validated against the location's vocabulary
//! - Reference-type validation for services and implementations at append time
//!
//! ## Usage
//!
//! ```rust
//! use moddesc::{ModuleAttributeBuilder, SymbolTable};
//!
//! let symbols = SymbolTable::new();
//! let mut builder = ModuleAttributeBuilder::new(&symbols);
//! builder
//!     .module_name("com.example.app")
//!     .module_version(Some("1.4.2"))
//!     .requires("java.base", 0x8000, None)
//!     .exports("com/example/app/api", 0, &[]);
//! builder.provides("com/example/spi/Codec", &["com/example/app/JsonCodec"])?;
//!
//! let record = builder.build()?;
//! assert_eq!(record.exports()?.len(), 1);
//! # Ok::<(), moddesc::Error>(())
//! ```
//!
//! ## Design
//!
//! Mutators take `&mut self`, so a rejected call returns an error without consuming
//! the builder: everything appended before the failed call stays valid and
//! inspectable. `build` takes `self` by value - after finalization the accumulator
//! is gone and the type system rules out further mutation, with no runtime
//! "finalized" flag to trip.

use crate::{
    metadata::{
        flags::{flags_mask, AccessFlag, FlagLocation},
        module::{
            built::BuiltModuleAttribute,
            info::{ExportsInfo, OpensInfo, ProvidesInfo, RequiresInfo},
            ModuleAttribute,
        },
        symbols::{Class, Module, SymbolRef, SymbolTable, Utf8},
    },
    Error, Result,
};

/// Mutable accumulator for a module descriptor record.
///
/// Obtain one with [`ModuleAttributeBuilder::new`], accumulate state through the
/// mutators, finish with [`ModuleAttributeBuilder::build`]. A rejected mutator
/// call leaves the builder intact; `build` consumes it.
#[derive(Debug)]
pub struct ModuleAttributeBuilder<'a> {
    symbols: &'a SymbolTable,
    name: Option<SymbolRef<Module>>,
    flags: u16,
    version: Option<SymbolRef<Utf8>>,
    requires: Vec<RequiresInfo>,
    exports: Vec<ExportsInfo>,
    opens: Vec<OpensInfo>,
    uses: Vec<SymbolRef<Class>>,
    provides: Vec<ProvidesInfo>,
}

impl<'a> ModuleAttributeBuilder<'a> {
    /// Creates a new builder that interns names into `symbols`.
    ///
    /// The builder starts with no name, a zero flags mask, no version and empty
    /// relation tables.
    #[must_use]
    pub fn new(symbols: &'a SymbolTable) -> Self {
        ModuleAttributeBuilder {
            symbols,
            name: None,
            flags: 0,
            version: None,
            requires: Vec::new(),
            exports: Vec::new(),
            opens: Vec::new(),
            uses: Vec::new(),
            provides: Vec::new(),
        }
    }

    /// Sets the module name, replacing any previously set name.
    pub fn module_name(&mut self, name: &str) -> &mut Self {
        self.name = Some(self.symbols.module(name));
        self
    }

    /// Sets the module flags from a raw mask, replacing any previously set mask.
    ///
    /// Accepts any 16-bit value, including masks with bits this library does not
    /// define; use [`ModuleAttributeBuilder::module_named_flags`] for validated
    /// symbolic input.
    pub fn module_flags(&mut self, mask: u16) -> &mut Self {
        self.flags = mask;
        self
    }

    /// Sets the module flags from named flags.
    ///
    /// # Errors
    /// Fails with [`crate::Error::InvalidFlag`] if any flag is not defined at the
    /// module location; the builder is left unchanged.
    pub fn module_named_flags(&mut self, flags: &[AccessFlag]) -> Result<&mut Self> {
        self.flags = flags_mask(flags, FlagLocation::Module)?;
        Ok(self)
    }

    /// Sets or clears the module version, replacing any previously set version.
    pub fn module_version(&mut self, version: Option<&str>) -> &mut Self {
        self.version = version.map(|v| self.symbols.utf8(v));
        self
    }

    /// Appends a requires entry for `module` with a raw flags mask.
    pub fn requires(&mut self, module: &str, flags_mask: u16, version: Option<&str>) -> &mut Self {
        let module = self.symbols.module(module);
        let version = version.map(|v| self.symbols.utf8(v));
        self.requires.push(RequiresInfo {
            module,
            flags: flags_mask,
            version,
        });
        self
    }

    /// Appends a requires entry with named flags.
    ///
    /// # Errors
    /// Fails with [`crate::Error::InvalidFlag`] if any flag is not defined at the
    /// requires location; previously appended entries are unaffected.
    pub fn requires_named(
        &mut self,
        module: &str,
        flags: &[AccessFlag],
        version: Option<&str>,
    ) -> Result<&mut Self> {
        let mask = flags_mask(flags, FlagLocation::Requires)?;
        Ok(self.requires(module, mask, version))
    }

    /// Appends a pre-built requires entry.
    pub fn requires_info(&mut self, info: RequiresInfo) -> &mut Self {
        self.requires.push(info);
        self
    }

    /// Appends an exports entry for `package` with a raw flags mask.
    ///
    /// An empty `to` list makes the export unqualified (visible to every module).
    pub fn exports(&mut self, package: &str, flags_mask: u16, to: &[&str]) -> &mut Self {
        let package = self.symbols.package(package);
        let to = to.iter().map(|name| self.symbols.module(name)).collect();
        self.exports.push(ExportsInfo {
            package,
            flags: flags_mask,
            to,
        });
        self
    }

    /// Appends an exports entry with named flags.
    ///
    /// # Errors
    /// Fails with [`crate::Error::InvalidFlag`] if any flag is not defined at the
    /// exports location; previously appended entries are unaffected.
    pub fn exports_named(
        &mut self,
        package: &str,
        flags: &[AccessFlag],
        to: &[&str],
    ) -> Result<&mut Self> {
        let mask = flags_mask(flags, FlagLocation::Exports)?;
        Ok(self.exports(package, mask, to))
    }

    /// Appends a pre-built exports entry.
    pub fn exports_info(&mut self, info: ExportsInfo) -> &mut Self {
        self.exports.push(info);
        self
    }

    /// Appends an opens entry for `package` with a raw flags mask.
    ///
    /// An empty `to` list makes the open unqualified.
    pub fn opens(&mut self, package: &str, flags_mask: u16, to: &[&str]) -> &mut Self {
        let package = self.symbols.package(package);
        let to = to.iter().map(|name| self.symbols.module(name)).collect();
        self.opens.push(OpensInfo {
            package,
            flags: flags_mask,
            to,
        });
        self
    }

    /// Appends an opens entry with named flags.
    ///
    /// # Errors
    /// Fails with [`crate::Error::InvalidFlag`] if any flag is not defined at the
    /// opens location; previously appended entries are unaffected.
    pub fn opens_named(
        &mut self,
        package: &str,
        flags: &[AccessFlag],
        to: &[&str],
    ) -> Result<&mut Self> {
        let mask = flags_mask(flags, FlagLocation::Opens)?;
        Ok(self.opens(package, mask, to))
    }

    /// Appends a pre-built opens entry.
    pub fn opens_info(&mut self, info: OpensInfo) -> &mut Self {
        self.opens.push(info);
        self
    }

    /// Appends a uses entry for a service interface.
    ///
    /// # Errors
    /// Fails with [`crate::Error::InvalidArgument`] if `service` is empty or names
    /// a primitive type; the builder is left unchanged.
    pub fn uses(&mut self, service: &str) -> Result<&mut Self> {
        require_reference_type("service", service)?;
        let service = self.symbols.class(service);
        self.uses.push(service);
        Ok(self)
    }

    /// Appends a uses entry from an existing class reference.
    pub fn uses_ref(&mut self, service: SymbolRef<Class>) -> &mut Self {
        self.uses.push(service);
        self
    }

    /// Appends a provides entry: a service and its implementation classes.
    ///
    /// # Errors
    /// Fails with [`crate::Error::InvalidArgument`] if `with` is empty, or if
    /// `service` or any implementation is empty or names a primitive type. The
    /// check happens before anything is interned or appended, so a rejected call
    /// leaves the builder exactly as it was.
    pub fn provides(&mut self, service: &str, with: &[&str]) -> Result<&mut Self> {
        require_reference_type("service", service)?;
        if with.is_empty() {
            return Err(Error::InvalidArgument(
                "provides requires at least one implementation class".to_string(),
            ));
        }
        for implementation in with {
            require_reference_type("implementation", implementation)?;
        }

        let service = self.symbols.class(service);
        let with = with.iter().map(|name| self.symbols.class(name)).collect();
        self.provides.push(ProvidesInfo { service, with });
        Ok(self)
    }

    /// Appends a pre-built provides entry.
    ///
    /// # Errors
    /// Fails with [`crate::Error::InvalidArgument`] if the entry's implementation
    /// list is empty.
    pub fn provides_info(&mut self, info: ProvidesInfo) -> Result<&mut Self> {
        if info.with.is_empty() {
            return Err(Error::InvalidArgument(
                "provides requires at least one implementation class".to_string(),
            ));
        }
        self.provides.push(info);
        Ok(self)
    }

    /// Finalizes the builder into an immutable record.
    ///
    /// Consumes the builder; the record snapshots the accumulated lists, and no
    /// further mutation is possible through any path.
    ///
    /// # Errors
    /// Fails with [`crate::Error::InvalidArgument`] if no module name was set.
    pub fn build(self) -> Result<ModuleAttribute<'a>> {
        let Some(name) = self.name else {
            return Err(Error::InvalidArgument(
                "module name is required to build a module attribute".to_string(),
            ));
        };

        Ok(ModuleAttribute::from_built(BuiltModuleAttribute {
            symbols: self.symbols,
            name,
            flags: self.flags,
            version: self.version,
            requires: self.requires,
            exports: self.exports,
            opens: self.opens,
            uses: self.uses,
            provides: self.provides,
        }))
    }
}

/// Reject names that cannot denote a reference type.
///
/// Services and their implementations must be class types; the single-letter
/// primitive descriptors are the only names a descriptor-shaped string can carry
/// that denote something else.
fn require_reference_type(what: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidArgument(format!(
            "{what} class name cannot be empty"
        )));
    }
    if matches!(name, "B" | "C" | "D" | "F" | "I" | "J" | "S" | "V" | "Z") {
        return Err(Error::InvalidArgument(format!(
            "{what} must be a reference type, not the primitive '{name}'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_requires_name() {
        let symbols = SymbolTable::new();
        let builder = ModuleAttributeBuilder::new(&symbols);

        let result = builder.build();
        assert!(result.is_err());
        let message = result.unwrap_err().to_string();
        assert!(message.contains("module name is required"));
    }

    #[test]
    fn setters_are_last_write_wins() {
        let symbols = SymbolTable::new();
        let mut builder = ModuleAttributeBuilder::new(&symbols);
        builder
            .module_name("first.name")
            .module_name("second.name")
            .module_flags(0x0020)
            .module_flags(0x1000)
            .module_version(Some("9"))
            .module_version(None);

        let record = builder.build().unwrap();
        assert_eq!(record.module_name().name(&symbols).unwrap(), "second.name");
        assert_eq!(record.module_flags_mask(), 0x1000);
        assert!(record.module_version().is_none());
    }

    #[test]
    fn provides_rejects_empty_implementations() {
        let symbols = SymbolTable::new();
        let mut builder = ModuleAttributeBuilder::new(&symbols);
        builder.module_name("com.example");
        builder
            .provides("com/example/spi/Codec", &["com/example/Impl"])
            .unwrap();

        let result = builder.provides("com/example/spi/Other", &[]);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));

        // the earlier entry survived the rejected call
        let record = builder.build().unwrap();
        let provides = record.provides().unwrap();
        assert_eq!(provides.len(), 1);
        assert_eq!(
            provides[0].service.name(&symbols).unwrap(),
            "com/example/spi/Codec"
        );
    }

    #[test]
    fn provides_rejects_primitive_service() {
        let symbols = SymbolTable::new();
        let mut builder = ModuleAttributeBuilder::new(&symbols);
        builder.module_name("com.example");

        assert!(matches!(
            builder.provides("I", &["com/example/Impl"]),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            builder.provides("com/example/spi/Codec", &["J"]),
            Err(Error::InvalidArgument(_))
        ));
        assert!(builder.build().unwrap().provides().unwrap().is_empty());
    }

    #[test]
    fn uses_rejects_primitive_service() {
        let symbols = SymbolTable::new();
        let mut builder = ModuleAttributeBuilder::new(&symbols);
        builder.module_name("com.example");

        assert!(matches!(builder.uses("Z"), Err(Error::InvalidArgument(_))));
        assert!(builder.uses("com/example/spi/Codec").is_ok());
    }

    #[test]
    fn named_flag_overloads_validate_location() {
        let symbols = SymbolTable::new();
        let mut builder = ModuleAttributeBuilder::new(&symbols);
        builder.module_name("com.example");

        // Transitive is a requires-only flag
        assert!(builder.module_named_flags(&[AccessFlag::Transitive]).is_err());
        assert!(builder
            .requires_named("java.base", &[AccessFlag::Transitive], None)
            .is_ok());

        let record = builder.build().unwrap();
        assert_eq!(record.module_flags_mask(), 0);
        assert_eq!(record.requires().unwrap()[0].flags, 0x0020);
    }

    #[test]
    fn duplicate_entries_are_preserved_in_order() {
        let symbols = SymbolTable::new();
        let mut builder = ModuleAttributeBuilder::new(&symbols);
        builder
            .module_name("com.example")
            .exports("pkg/a", 0, &[])
            .exports("pkg/b", 0, &[])
            .exports("pkg/a", 0, &[]);

        let record = builder.build().unwrap();
        let exports = record.exports().unwrap();
        let names: Vec<_> = exports
            .iter()
            .map(|e| e.package.name(&symbols).unwrap())
            .collect();
        assert_eq!(names, vec!["pkg/a", "pkg/b", "pkg/a"]);
    }
}
