// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![allow(dead_code)]

//! # moddesc
//!
//! A codec and object model for the module descriptor record embedded in class file
//! containers: the module's name, flags and version, plus its five relation tables
//! (requires, exports, opens, uses, provides). Built in pure Rust, `moddesc` gives
//! you both directions of the problem - lazy decoding of existing records out of
//! immutable payload bytes, and eager construction of new records through a
//! validating builder - behind a single record type.
//!
//! ## Features
//!
//! - **📦 Lazy decoding** - the relation tables are parsed once, on first access,
//!   and cached; safe under concurrent first access
//! - **🔧 Validating builder** - accumulate a record entry by entry, with
//!   vocabulary-checked named flags and reference-type validation at append time
//! - **🔁 Exact re-serialization** - either record variant writes the exact payload
//!   layout; decode-encode over a shared symbol table is byte-identical
//! - **🧩 Shared symbol table** - records hold typed 16-bit handles into an
//!   externally-owned interning store, never owned pointers
//! - **🛡️ Forward compatible** - raw flag masks are always readable, even with
//!   bits newer than this library; only named interpretation validates
//!
//! ## Quick Start
//!
//! Add `moddesc` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! moddesc = "0.1"
//! ```
//!
//! ### Using the Prelude
//!
//! For convenient access to the most commonly used types, import the prelude:
//!
//! ```rust
//! use moddesc::prelude::*;
//!
//! let symbols = SymbolTable::new();
//! let mut builder = ModuleAttributeBuilder::new(&symbols);
//! builder
//!     .module_name("com.example.core")
//!     .module_version(Some("1.0.0"))
//!     .requires("java.base", 0x8000, None)
//!     .exports("com/example/core/api", 0, &[]);
//! builder.uses("com/example/core/spi/Codec")?;
//!
//! let record = builder.build()?;
//! let bytes = record.encode(&symbols)?;
//!
//! let decoded = ModuleAttribute::decode(&bytes, &symbols)?;
//! assert_eq!(decoded.module_name().name(&symbols)?, "com.example.core");
//! assert_eq!(decoded.requires()?.len(), 1);
//! # Ok::<(), moddesc::Error>(())
//! ```
//!
//! ### Reading Flags
//!
//! ```rust
//! use moddesc::prelude::*;
//!
//! let symbols = SymbolTable::new();
//! let mut builder = ModuleAttributeBuilder::new(&symbols);
//! builder.module_name("com.example.core").module_flags(0x0020);
//! let record = builder.build()?;
//!
//! // the raw mask is always available; the typed set validates
//! assert_eq!(record.module_flags_mask(), 0x0020);
//! assert_eq!(record.module_flags()?, ModuleFlags::OPEN);
//! assert!(record.has_flag(AccessFlag::Open));
//! # Ok::<(), moddesc::Error>(())
//! ```
//!
//! ## Architecture
//!
//! `moddesc` is organized into a small set of modules:
//!
//! - [`prelude`] - Convenient re-exports of commonly used types and traits
//! - [`metadata`] - The record object model: symbol table, flags, record variants,
//!   builder and writer
//! - [`io`] - Bounds-checked big-endian byte IO underneath the codec
//!
//! The container's outer structure - attribute framing, the symbol table's own wire
//! format, version headers - is out of scope. A consumer hands this crate a record
//! payload plus a populated [`SymbolTable`] and gets the object model; or builds a
//! record and gets payload bytes to embed.
//!
//! ### Testing
//!
//! ```bash
//! cargo test
//! cargo bench   # criterion benchmarks for the codec hot paths
//! ```

#[macro_use]
pub(crate) mod error;

pub mod io;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use moddesc::prelude::*;
///
/// let symbols = SymbolTable::new();
/// let module = symbols.module("java.base");
/// assert_eq!(module.name(&symbols)?, "java.base");
/// # Ok::<(), moddesc::Error>(())
/// ```
pub mod prelude;

/// Metadata object model: symbol table, flag vocabularies and the module
/// descriptor record with its builder and writer.
pub mod metadata;

/// `moddesc` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always
/// [`Error`]. This is used consistently throughout the crate for all fallible
/// operations.
pub type Result<T> = std::result::Result<T, Error>;

/// `moddesc` Error type
///
/// The main error type for all operations in this crate. Provides detailed error
/// information for record decoding, flag interpretation and builder validation.
///
/// # Examples
///
/// ```rust
/// use moddesc::{Error, ModuleAttribute, SymbolTable};
///
/// let symbols = SymbolTable::new();
/// match ModuleAttribute::decode(&[0xFF], &symbols) {
///     Ok(_) => unreachable!("one byte is not a record"),
///     Err(Error::Malformed { message, .. }) => println!("Malformed: {}", message),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
pub use error::Error;

/// The module descriptor record, decoded or built, behind one accessor contract.
///
/// See [`metadata::module::ModuleAttribute`] for the full API.
pub use metadata::module::ModuleAttribute;

/// Builder for constructing module descriptor records from scratch.
///
/// See [`metadata::module::ModuleAttributeBuilder`] for the full API.
pub use metadata::module::ModuleAttributeBuilder;

/// The shared interned symbol table records resolve their references against.
///
/// See [`metadata::symbols::SymbolTable`] for the full API.
pub use metadata::symbols::SymbolTable;
