//! Lazily decoded backing for a module descriptor record.
//!
//! The decoded variant borrows the payload bytes and the container's symbol table;
//! it owns neither. The fixed head of the payload (name, flags, version) is parsed
//! when the record is decoded. The five relation tables are parsed in a single pass
//! on first access to any of them and cached - their counts are interleaved, so no
//! table can be located without walking the ones before it, and per-table laziness
//! would buy nothing.
//!
//! The cache is a [`OnceLock`] publish of the fully parsed tables: concurrent first
//! access from multiple threads is safe, the parse is pure over immutable inputs,
//! and a racing parse result is simply discarded.

use std::sync::OnceLock;

use crate::{
    io::read_be_at,
    metadata::{
        module::info::{ExportsInfo, OpensInfo, ProvidesInfo, RequiresInfo},
        symbols::{Class, Module, SymbolRef, SymbolTable, Utf8},
    },
    Result,
};

/// All five relation tables of a record, produced by one full parse.
pub(crate) struct RelationTables {
    pub(crate) requires: Vec<RequiresInfo>,
    pub(crate) exports: Vec<ExportsInfo>,
    pub(crate) opens: Vec<OpensInfo>,
    pub(crate) uses: Vec<SymbolRef<Class>>,
    pub(crate) provides: Vec<ProvidesInfo>,
}

/// Record backing that decodes its relation tables out of borrowed payload bytes
/// on demand.
#[derive(Debug)]
pub(crate) struct DecodedModuleAttribute<'a> {
    data: &'a [u8],
    symbols: &'a SymbolTable,
    name: SymbolRef<Module>,
    flags: u16,
    version: Option<SymbolRef<Utf8>>,
    tables: OnceLock<RelationTables>,
}

impl<'a> DecodedModuleAttribute<'a> {
    /// Parse the fixed head of a record payload and defer the relation tables.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the head is truncated, the name index
    /// does not denote a module entry, or a non-zero version index does not denote
    /// a UTF-8 entry.
    pub(crate) fn decode(data: &'a [u8], symbols: &'a SymbolTable) -> Result<Self> {
        let mut offset = 0;

        let name_index = u2(data, &mut offset, "module_name_index")?;
        let flags = u2(data, &mut offset, "module_flags")?;
        let version_index = u2(data, &mut offset, "module_version_index")?;

        let name = symbols.check_ref::<Module>(name_index)?;
        let version = match version_index {
            0 => None,
            index => Some(symbols.check_ref::<Utf8>(index)?),
        };

        Ok(DecodedModuleAttribute {
            data,
            symbols,
            name,
            flags,
            version,
            tables: OnceLock::new(),
        })
    }

    pub(crate) fn symbols(&self) -> &'a SymbolTable {
        self.symbols
    }

    pub(crate) fn name(&self) -> SymbolRef<Module> {
        self.name
    }

    pub(crate) fn flags(&self) -> u16 {
        self.flags
    }

    pub(crate) fn version(&self) -> Option<SymbolRef<Utf8>> {
        self.version
    }

    pub(crate) fn tables(&self) -> Result<&RelationTables> {
        if let Some(tables) = self.tables.get() {
            return Ok(tables);
        }

        // Not cached yet. Parse outside the cell, then publish; if another thread
        // won the race in the meantime, our result is dropped in its favor.
        let parsed = parse_tables(self.data, self.symbols)?;
        Ok(self.tables.get_or_init(|| parsed))
    }
}

impl std::fmt::Debug for RelationTables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelationTables")
            .field("requires", &self.requires.len())
            .field("exports", &self.exports.len())
            .field("opens", &self.opens.len())
            .field("uses", &self.uses.len())
            .field("provides", &self.provides.len())
            .finish()
    }
}

/// Read one big-endian `u16`, turning a truncation into a contextful malformed error.
fn u2(data: &[u8], offset: &mut usize, what: &str) -> Result<u16> {
    read_be_at::<u16>(data, offset)
        .map_err(|_| malformed_error!("record truncated while reading {}", what))
}

/// Check that a table's count can be satisfied by the remaining bytes, with
/// `row_size` being the minimum size of one row.
fn check_count(count: u16, row_size: usize, data: &[u8], offset: usize, table: &str) -> Result<()> {
    let remaining = data.len() - offset;
    let needed = usize::from(count) * row_size;
    if needed > remaining {
        return Err(malformed_error!(
            "{} table claims {} entries ({} bytes), but only {} bytes remain",
            table,
            count,
            needed,
            remaining
        ));
    }
    Ok(())
}

/// One full parse of the five relation tables, starting after the 6-byte head.
fn parse_tables(data: &[u8], symbols: &SymbolTable) -> Result<RelationTables> {
    let mut offset = 6;

    let requires_count = u2(data, &mut offset, "requires_count")?;
    check_count(requires_count, 6, data, offset, "requires")?;
    let mut requires = Vec::with_capacity(usize::from(requires_count));
    for _ in 0..requires_count {
        let module = symbols.check_ref::<Module>(u2(data, &mut offset, "requires_index")?)?;
        let flags = u2(data, &mut offset, "requires_flags")?;
        let version = match u2(data, &mut offset, "requires_version_index")? {
            0 => None,
            index => Some(symbols.check_ref::<Utf8>(index)?),
        };
        requires.push(RequiresInfo {
            module,
            flags,
            version,
        });
    }

    let exports_count = u2(data, &mut offset, "exports_count")?;
    check_count(exports_count, 6, data, offset, "exports")?;
    let mut exports = Vec::with_capacity(usize::from(exports_count));
    for _ in 0..exports_count {
        let package = symbols.check_ref(u2(data, &mut offset, "exports_index")?)?;
        let flags = u2(data, &mut offset, "exports_flags")?;
        let to = parse_to_list(data, &mut offset, symbols, "exports_to")?;
        exports.push(ExportsInfo { package, flags, to });
    }

    let opens_count = u2(data, &mut offset, "opens_count")?;
    check_count(opens_count, 6, data, offset, "opens")?;
    let mut opens = Vec::with_capacity(usize::from(opens_count));
    for _ in 0..opens_count {
        let package = symbols.check_ref(u2(data, &mut offset, "opens_index")?)?;
        let flags = u2(data, &mut offset, "opens_flags")?;
        let to = parse_to_list(data, &mut offset, symbols, "opens_to")?;
        opens.push(OpensInfo { package, flags, to });
    }

    let uses_count = u2(data, &mut offset, "uses_count")?;
    check_count(uses_count, 2, data, offset, "uses")?;
    let mut uses = Vec::with_capacity(usize::from(uses_count));
    for _ in 0..uses_count {
        uses.push(symbols.check_ref::<Class>(u2(data, &mut offset, "uses_index")?)?);
    }

    let provides_count = u2(data, &mut offset, "provides_count")?;
    check_count(provides_count, 4, data, offset, "provides")?;
    let mut provides = Vec::with_capacity(usize::from(provides_count));
    for _ in 0..provides_count {
        let service = symbols.check_ref::<Class>(u2(data, &mut offset, "provides_index")?)?;
        let with_count = u2(data, &mut offset, "provides_with_count")?;
        if with_count == 0 {
            return Err(malformed_error!(
                "provides entry for symbol {} has no implementations",
                service.index()
            ));
        }
        check_count(with_count, 2, data, offset, "provides_with")?;
        let mut with = Vec::with_capacity(usize::from(with_count));
        for _ in 0..with_count {
            with.push(symbols.check_ref::<Class>(u2(data, &mut offset, "provides_with_index")?)?);
        }
        provides.push(ProvidesInfo { service, with });
    }

    if offset != data.len() {
        return Err(malformed_error!(
            "{} trailing bytes after the provides table",
            data.len() - offset
        ));
    }

    Ok(RelationTables {
        requires,
        exports,
        opens,
        uses,
        provides,
    })
}

/// Parse a length-prefixed list of module indices (the `to` list of an exports or
/// opens row).
fn parse_to_list(
    data: &[u8],
    offset: &mut usize,
    symbols: &SymbolTable,
    what: &str,
) -> Result<Vec<SymbolRef<Module>>> {
    let count = u2(data, offset, what)?;
    check_count(count, 2, data, *offset, what)?;
    let mut to = Vec::with_capacity(usize::from(count));
    for _ in 0..count {
        to.push(symbols.check_ref::<Module>(u2(data, offset, what)?)?);
    }
    Ok(to)
}
