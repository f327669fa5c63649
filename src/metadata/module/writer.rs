//! Serialization of module descriptor records into the exact payload byte layout.
//!
//! The writer is variant-agnostic: it reads a record purely through the accessor
//! surface, so decoded and built records serialize identically for identical
//! content. The layout is the decoder's input format - a 6-byte head followed by
//! the five length-prefixed relation tables in order, all fields big-endian `u16`.
//!
//! Symbol references are interned through the target table before being written.
//! When the target is the very table the record resolves against, indices are
//! reused as-is and a decode-encode round trip reproduces the input bytes. Any
//! other target gets each name resolved and freshly interned, preserving content
//! but not index values.

use crate::{
    io::write_be_at,
    metadata::{
        module::ModuleAttribute,
        symbols::{Class, Module, Package, SymbolRef, SymbolTable, Utf8},
    },
    Error, Result,
};

pub(crate) fn encode(attr: &ModuleAttribute<'_>, target: &SymbolTable) -> Result<Vec<u8>> {
    let source = attr.symbols();
    let same_table = std::ptr::eq(source, target);

    // Forces the full parse on a decoded record; everything after this is
    // infallible except for cross-table resolution of individual references.
    let requires = attr.requires()?;
    let exports = attr.exports()?;
    let opens = attr.opens()?;
    let uses = attr.uses()?;
    let provides = attr.provides()?;

    let size = 6
        + 2
        + requires.len() * 6
        + 2
        + exports.iter().map(|e| 6 + e.to.len() * 2).sum::<usize>()
        + 2
        + opens.iter().map(|o| 6 + o.to.len() * 2).sum::<usize>()
        + 2
        + uses.len() * 2
        + 2
        + provides.iter().map(|p| 4 + p.with.len() * 2).sum::<usize>();

    let mut buffer = vec![0u8; size];
    let mut offset = 0;

    write_be_at(
        &mut buffer,
        &mut offset,
        module_index(attr.module_name(), source, target, same_table)?,
    )?;
    write_be_at(&mut buffer, &mut offset, attr.module_flags_mask())?;
    let version_index = match attr.module_version() {
        Some(version) => utf8_index(version, source, target, same_table)?,
        None => 0,
    };
    write_be_at(&mut buffer, &mut offset, version_index)?;

    write_be_at(&mut buffer, &mut offset, table_count(requires.len(), "requires")?)?;
    for entry in requires {
        write_be_at(
            &mut buffer,
            &mut offset,
            module_index(entry.module, source, target, same_table)?,
        )?;
        write_be_at(&mut buffer, &mut offset, entry.flags)?;
        let version_index = match entry.version {
            Some(version) => utf8_index(version, source, target, same_table)?,
            None => 0,
        };
        write_be_at(&mut buffer, &mut offset, version_index)?;
    }

    write_be_at(&mut buffer, &mut offset, table_count(exports.len(), "exports")?)?;
    for entry in exports {
        write_be_at(
            &mut buffer,
            &mut offset,
            package_index(entry.package, source, target, same_table)?,
        )?;
        write_be_at(&mut buffer, &mut offset, entry.flags)?;
        write_be_at(&mut buffer, &mut offset, table_count(entry.to.len(), "exports_to")?)?;
        for &module in &entry.to {
            write_be_at(
                &mut buffer,
                &mut offset,
                module_index(module, source, target, same_table)?,
            )?;
        }
    }

    write_be_at(&mut buffer, &mut offset, table_count(opens.len(), "opens")?)?;
    for entry in opens {
        write_be_at(
            &mut buffer,
            &mut offset,
            package_index(entry.package, source, target, same_table)?,
        )?;
        write_be_at(&mut buffer, &mut offset, entry.flags)?;
        write_be_at(&mut buffer, &mut offset, table_count(entry.to.len(), "opens_to")?)?;
        for &module in &entry.to {
            write_be_at(
                &mut buffer,
                &mut offset,
                module_index(module, source, target, same_table)?,
            )?;
        }
    }

    write_be_at(&mut buffer, &mut offset, table_count(uses.len(), "uses")?)?;
    for &service in uses {
        write_be_at(
            &mut buffer,
            &mut offset,
            class_index(service, source, target, same_table)?,
        )?;
    }

    write_be_at(&mut buffer, &mut offset, table_count(provides.len(), "provides")?)?;
    for entry in provides {
        write_be_at(
            &mut buffer,
            &mut offset,
            class_index(entry.service, source, target, same_table)?,
        )?;
        write_be_at(&mut buffer, &mut offset, table_count(entry.with.len(), "provides_with")?)?;
        for &implementation in &entry.with {
            write_be_at(
                &mut buffer,
                &mut offset,
                class_index(implementation, source, target, same_table)?,
            )?;
        }
    }

    Ok(buffer)
}

fn table_count(len: usize, table: &str) -> Result<u16> {
    u16::try_from(len).map_err(|_| {
        Error::InvalidArgument(format!(
            "{table} table has {len} entries, exceeding the 16-bit count field"
        ))
    })
}

fn module_index(
    reference: SymbolRef<Module>,
    source: &SymbolTable,
    target: &SymbolTable,
    same_table: bool,
) -> Result<u16> {
    if same_table {
        return Ok(reference.index());
    }
    Ok(target.module(reference.name(source)?).index())
}

fn package_index(
    reference: SymbolRef<Package>,
    source: &SymbolTable,
    target: &SymbolTable,
    same_table: bool,
) -> Result<u16> {
    if same_table {
        return Ok(reference.index());
    }
    Ok(target.package(reference.name(source)?).index())
}

fn class_index(
    reference: SymbolRef<Class>,
    source: &SymbolTable,
    target: &SymbolTable,
    same_table: bool,
) -> Result<u16> {
    if same_table {
        return Ok(reference.index());
    }
    Ok(target.class(reference.name(source)?).index())
}

fn utf8_index(
    reference: SymbolRef<Utf8>,
    source: &SymbolTable,
    target: &SymbolTable,
    same_table: bool,
) -> Result<u16> {
    if same_table {
        return Ok(reference.index());
    }
    Ok(target.utf8(reference.value(source)?).index())
}
