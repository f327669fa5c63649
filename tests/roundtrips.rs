//! Round-trip and variant-equivalence tests for the module descriptor codec.
//!
//! A record built through the builder must re-read identically after encode and
//! decode, a decoded record must re-encode to the exact input bytes when the
//! symbol table is shared, and the decoded and built backings must be observably
//! interchangeable for the same logical content.

use moddesc::prelude::*;

/// Flatten a list of u16 values into big-endian payload bytes.
fn payload(values: &[u16]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_be_bytes()).collect()
}

fn sample_record<'a>(symbols: &'a SymbolTable) -> ModuleAttribute<'a> {
    let mut builder = ModuleAttributeBuilder::new(symbols);
    builder
        .module_name("com.example.app")
        .module_flags(0x0020)
        .module_version(Some("2.1.0"))
        .requires("java.base", 0x8000, None)
        .requires("java.sql", 0x0040, Some("21"))
        .exports("com/example/app/api", 0, &[])
        .exports("com/example/app/internal", 0, &["com.example.friend"])
        .opens("com/example/app/impl", 0, &["com.example.plugin"]);
    builder.uses("com/example/app/spi/Codec").unwrap();
    builder
        .provides(
            "com/example/app/spi/Codec",
            &["com/example/app/JsonCodec", "com/example/app/XmlCodec"],
        )
        .unwrap();
    builder.build().unwrap()
}

#[test]
fn built_encode_decode_roundtrip() {
    let symbols = SymbolTable::new();
    let built = sample_record(&symbols);

    let bytes = built.encode(&symbols).unwrap();
    let decoded = ModuleAttribute::decode(&bytes, &symbols).unwrap();

    assert_eq!(decoded.module_name(), built.module_name());
    assert_eq!(decoded.module_flags_mask(), built.module_flags_mask());
    assert_eq!(decoded.module_version(), built.module_version());
    assert_eq!(decoded.requires().unwrap(), built.requires().unwrap());
    assert_eq!(decoded.exports().unwrap(), built.exports().unwrap());
    assert_eq!(decoded.opens().unwrap(), built.opens().unwrap());
    assert_eq!(decoded.uses().unwrap(), built.uses().unwrap());
    assert_eq!(decoded.provides().unwrap(), built.provides().unwrap());
}

#[test]
fn decode_encode_is_byte_identical_over_shared_table() {
    let symbols = SymbolTable::new();
    let bytes = sample_record(&symbols).encode(&symbols).unwrap();

    let decoded = ModuleAttribute::decode(&bytes, &symbols).unwrap();
    let rewritten = decoded.encode(&symbols).unwrap();

    assert_eq!(rewritten, bytes);
}

#[test]
fn cross_table_encode_preserves_content() {
    let source = SymbolTable::new();
    let record = sample_record(&source);

    // fresh target table: indices will differ, names must not
    let target = SymbolTable::new();
    target.utf8("occupy an index so the numbering diverges");
    let bytes = record.encode(&target).unwrap();

    let decoded = ModuleAttribute::decode(&bytes, &target).unwrap();
    assert_eq!(
        decoded.module_name().name(&target).unwrap(),
        "com.example.app"
    );
    assert_eq!(
        decoded.module_version().unwrap().value(&target).unwrap(),
        "2.1.0"
    );

    let requires = decoded.requires().unwrap();
    assert_eq!(requires.len(), 2);
    assert_eq!(requires[0].module.name(&target).unwrap(), "java.base");
    assert_eq!(requires[1].module.name(&target).unwrap(), "java.sql");
    assert_eq!(
        requires[1].version.unwrap().value(&target).unwrap(),
        "21"
    );

    let provides = decoded.provides().unwrap();
    assert_eq!(
        provides[0].service.name(&target).unwrap(),
        "com/example/app/spi/Codec"
    );
    assert_eq!(provides[0].with.len(), 2);
}

#[test]
fn decoded_and_built_views_are_equivalent() {
    let symbols = SymbolTable::new();

    // hand-crafted payload: name, flags, no version, one requires entry,
    // one unqualified exports entry, no opens, one uses, no provides
    let name = symbols.module("com.example.lib");
    let dep = symbols.module("java.base");
    let pkg = symbols.package("com/example/lib/api");
    let service = symbols.class("com/example/lib/spi/Loader");
    let bytes = payload(&[
        name.index(),
        0x0020,
        0,
        1, // requires_count
        dep.index(),
        0x8000,
        0,
        1, // exports_count
        pkg.index(),
        0,
        0, // exports_to_count
        0, // opens_count
        1, // uses_count
        service.index(),
        0, // provides_count
    ]);
    let decoded = ModuleAttribute::decode(&bytes, &symbols).unwrap();

    let mut builder = ModuleAttributeBuilder::new(&symbols);
    builder
        .module_name("com.example.lib")
        .module_flags(0x0020)
        .requires("java.base", 0x8000, None)
        .exports("com/example/lib/api", 0, &[]);
    builder.uses("com/example/lib/spi/Loader").unwrap();
    let built = builder.build().unwrap();

    assert_eq!(decoded.module_name(), built.module_name());
    assert_eq!(decoded.module_flags_mask(), built.module_flags_mask());
    assert_eq!(decoded.module_version(), built.module_version());
    assert_eq!(decoded.requires().unwrap(), built.requires().unwrap());
    assert_eq!(decoded.exports().unwrap(), built.exports().unwrap());
    assert_eq!(decoded.opens().unwrap(), built.opens().unwrap());
    assert_eq!(decoded.uses().unwrap(), built.uses().unwrap());
    assert_eq!(decoded.provides().unwrap(), built.provides().unwrap());
}

#[test]
fn duplicate_exports_keep_record_order() {
    let symbols = SymbolTable::new();
    let name = symbols.module("com.example");
    let pkg_a = symbols.package("pkg/a");
    let pkg_b = symbols.package("pkg/b");

    // exports [a, b, a]: duplicates are legal and order is meaningful
    let bytes = payload(&[
        name.index(),
        0,
        0,
        0, // requires_count
        3, // exports_count
        pkg_a.index(),
        0,
        0,
        pkg_b.index(),
        0,
        0,
        pkg_a.index(),
        0,
        0,
        0, // opens_count
        0, // uses_count
        0, // provides_count
    ]);

    let decoded = ModuleAttribute::decode(&bytes, &symbols).unwrap();
    let packages: Vec<_> = decoded
        .exports()
        .unwrap()
        .iter()
        .map(|e| e.package.name(&symbols).unwrap())
        .collect();
    assert_eq!(packages, vec!["pkg/a", "pkg/b", "pkg/a"]);

    // and the duplicates survive re-serialization
    assert_eq!(decoded.encode(&symbols).unwrap(), bytes);
}

#[test]
fn unqualified_export_is_distinguishable() {
    let symbols = SymbolTable::new();
    let built = sample_record(&symbols);
    let bytes = built.encode(&symbols).unwrap();
    let decoded = ModuleAttribute::decode(&bytes, &symbols).unwrap();

    let exports = decoded.exports().unwrap();
    assert!(!exports[0].is_qualified());
    assert!(exports[0].to.is_empty());
    assert!(exports[1].is_qualified());
    assert_eq!(exports[1].to.len(), 1);
}

#[test]
fn concurrent_first_access_is_consistent() {
    let symbols = SymbolTable::new();
    let bytes = sample_record(&symbols).encode(&symbols).unwrap();
    let decoded = ModuleAttribute::decode(&bytes, &symbols).unwrap();

    std::thread::scope(|scope| {
        let mut handles = Vec::new();
        for _ in 0..8 {
            handles.push(scope.spawn(|| {
                let requires = decoded.requires().unwrap();
                let provides = decoded.provides().unwrap();
                (requires.len(), provides[0].with.len())
            }));
        }
        for handle in handles {
            assert_eq!(handle.join().unwrap(), (2, 2));
        }
    });
}
