//! Flag vocabularies for module descriptor records.
//!
//! A record carries four independent 16-bit flag masks: one on the module itself and
//! one per requires / exports / opens entry. Each position has its own closed
//! vocabulary of defined bits, captured here as a [`bitflags`] type per location.
//!
//! On top of the typed masks sits a named-flag layer ([`AccessFlag`] /
//! [`FlagLocation`]) used where flags enter or leave the system symbolically, e.g.
//! the builder's named-flag overloads.
//!
//! # Raw vs named access
//!
//! Raw mask access never fails: a record whose mask carries bits this library does
//! not know about can still be read, copied and re-encoded unchanged. Only the named
//! paths - [`named_flags`], [`flags_mask`] and the `from_bits` conversions into the
//! typed masks - validate against the vocabulary and reject unknown or misplaced
//! flags with [`crate::Error::InvalidFlag`]. Collapsing the two paths into uniform
//! validation would break round-tripping of records from future format versions;
//! the asymmetry is contract, not accident.

use bitflags::bitflags;
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::{Error, Result};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// All possible flags for the module itself
    pub struct ModuleFlags: u16 {
        /// The module is open: all its packages are reflectively accessible
        const OPEN = 0x0020;
        /// The module was not explicitly declared in source
        const SYNTHETIC = 0x1000;
        /// The module was implicitly declared
        const MANDATED = 0x8000;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// All possible flags for a requires entry
    pub struct RequiresFlags: u16 {
        /// Readability of the required module is granted transitively to dependents
        const TRANSITIVE = 0x0020;
        /// The dependence is mandatory at compile time only
        const STATIC_PHASE = 0x0040;
        /// The dependence was not explicitly declared in source
        const SYNTHETIC = 0x1000;
        /// The dependence was implicitly declared
        const MANDATED = 0x8000;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// All possible flags for an exports entry
    pub struct ExportsFlags: u16 {
        /// The export was not explicitly declared in source
        const SYNTHETIC = 0x1000;
        /// The export was implicitly declared
        const MANDATED = 0x8000;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// All possible flags for an opens entry
    pub struct OpensFlags: u16 {
        /// The open was not explicitly declared in source
        const SYNTHETIC = 0x1000;
        /// The open was implicitly declared
        const MANDATED = 0x8000;
    }
}

/// A flag by name, independent of its bit position and location.
///
/// The same bit value can mean different things at different locations (0x0020 is
/// [`AccessFlag::Open`] on a module but [`AccessFlag::Transitive`] on a requires
/// entry), so a named flag is only meaningful together with a [`FlagLocation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum AccessFlag {
    /// Module is open for deep reflection
    Open,
    /// Requires entry grants readability transitively
    Transitive,
    /// Requires entry is mandatory at compile time only
    StaticPhase,
    /// Not explicitly declared in source
    Synthetic,
    /// Implicitly declared
    Mandated,
}

/// The position within a record that a flags mask belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
#[strum(serialize_all = "lowercase")]
pub enum FlagLocation {
    /// The record's own flags mask
    Module,
    /// The mask of a requires entry
    Requires,
    /// The mask of an exports entry
    Exports,
    /// The mask of an opens entry
    Opens,
}

impl AccessFlag {
    /// The bit this flag occupies in a mask.
    pub fn mask(self) -> u16 {
        match self {
            AccessFlag::Open => 0x0020,
            AccessFlag::Transitive => 0x0020,
            AccessFlag::StaticPhase => 0x0040,
            AccessFlag::Synthetic => 0x1000,
            AccessFlag::Mandated => 0x8000,
        }
    }

    /// The locations at which this flag is defined.
    pub fn locations(self) -> &'static [FlagLocation] {
        match self {
            AccessFlag::Open => &[FlagLocation::Module],
            AccessFlag::Transitive | AccessFlag::StaticPhase => &[FlagLocation::Requires],
            AccessFlag::Synthetic | AccessFlag::Mandated => &[
                FlagLocation::Module,
                FlagLocation::Requires,
                FlagLocation::Exports,
                FlagLocation::Opens,
            ],
        }
    }

    /// Whether this flag is part of `location`'s vocabulary.
    pub fn is_legal_at(self, location: FlagLocation) -> bool {
        self.locations().contains(&location)
    }
}

impl FlagLocation {
    /// The union of all bits defined at this location.
    pub fn known_mask(self) -> u16 {
        match self {
            FlagLocation::Module => ModuleFlags::all().bits(),
            FlagLocation::Requires => RequiresFlags::all().bits(),
            FlagLocation::Exports => ExportsFlags::all().bits(),
            FlagLocation::Opens => OpensFlags::all().bits(),
        }
    }
}

/// Interpret a raw mask as named flags for a location.
///
/// # Errors
/// Fails with [`crate::Error::InvalidFlag`] if any bit outside the location's
/// vocabulary is set. Use [`has_flag`] for a bit test that tolerates unknown bits.
pub fn named_flags(mask: u16, location: FlagLocation) -> Result<Vec<AccessFlag>> {
    let unknown = mask & !location.known_mask();
    if unknown != 0 {
        return Err(unknown_bits_error(mask, location));
    }

    Ok(AccessFlag::iter()
        .filter(|flag| flag.is_legal_at(location) && mask & flag.mask() != 0)
        .collect())
}

/// Combine named flags into a raw mask for a location.
///
/// # Errors
/// Fails with [`crate::Error::InvalidFlag`] if any flag is not defined at the
/// location (e.g. [`AccessFlag::Transitive`] at [`FlagLocation::Module`]).
pub fn flags_mask(flags: &[AccessFlag], location: FlagLocation) -> Result<u16> {
    let mut mask = 0;
    for &flag in flags {
        if !flag.is_legal_at(location) {
            return Err(Error::InvalidFlag(format!(
                "{flag} flag is not defined at the {location} location"
            )));
        }
        mask |= flag.mask();
    }

    Ok(mask)
}

/// Test whether a flag's bit is set in a mask.
///
/// This is a pure bit test: it ignores the vocabulary entirely and never fails,
/// regardless of what other bits the mask carries.
pub fn has_flag(mask: u16, flag: AccessFlag) -> bool {
    mask & flag.mask() != 0
}

pub(crate) fn unknown_bits_error(mask: u16, location: FlagLocation) -> Error {
    Error::InvalidFlag(format!(
        "flags mask 0x{:04x} has bits undefined at the {} location",
        mask, location
    ))
}
