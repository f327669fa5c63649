use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// This enum covers all possible error conditions that can occur while decoding, building and
/// re-encoding module descriptor records. Each variant provides specific context about the
/// failure mode to enable appropriate error handling.
///
/// # Error Categories
///
/// ## Record Structure Errors
/// - [`Error::Malformed`] - Corrupted or inconsistent record data
/// - [`Error::OutOfBounds`] - Attempted to read or write beyond buffer boundaries
///
/// ## Validation Errors
/// - [`Error::InvalidFlag`] - Flag bits or named flags outside a location's vocabulary
/// - [`Error::InvalidArgument`] - Invalid input to a builder operation
///
/// # Examples
///
/// ```rust
/// use moddesc::{Error, ModuleAttribute, SymbolTable};
///
/// let symbols = SymbolTable::new();
/// match ModuleAttribute::decode(&[0x00, 0x01], &symbols) {
///     Ok(_) => println!("decoded"),
///     Err(Error::Malformed { message, file, line }) => {
///         eprintln!("Malformed record: {} ({}:{})", message, file, line);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
///
/// All failures are reported synchronously to the immediate caller. Nothing in this crate
/// retries or recovers on its own.
#[derive(Error, Debug)]
pub enum Error {
    /// The record data is damaged and could not be parsed.
    ///
    /// This error indicates that the record bytes are truncated or structurally
    /// inconsistent: a table count claims more entries than the remaining bytes can
    /// hold, a symbol index points at the wrong kind of entry or out of the table,
    /// or bytes remain after the last table. The error includes the source location
    /// where the malformation was detected for debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while reading or writing a buffer.
    ///
    /// This error occurs in the low-level byte IO layer when a read or write would
    /// go past the end of the buffer. Record parsing always converts it into a
    /// contextful [`Error::Malformed`] before surfacing it to a caller.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// A flags mask or named flag is not part of a location's vocabulary.
    ///
    /// Raised only by the named-flag paths: converting a mask with undefined bits
    /// into named flags, or converting a named flag that is not legal at the
    /// requested location into a mask. Raw mask accessors never produce this error,
    /// so records carrying unknown future flag bits can still be copied and
    /// re-encoded unchanged.
    #[error("{0}")]
    InvalidFlag(String),

    /// Invalid input was passed to a builder operation.
    ///
    /// Raised at the offending call, not deferred to `build()`: a `provides` entry
    /// without implementations, or a primitive type where a reference type is
    /// required. The builder's previously accumulated state remains valid after a
    /// rejected call.
    #[error("{0}")]
    InvalidArgument(String),
}
