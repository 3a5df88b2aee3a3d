//! The single error type threaded through lexing, parsing and codegen.
//!
//! Mirrors the three error taxonomies of the compiler: a `SyntaxError` comes
//! out of the parser on a token mismatch, a `DevError` comes out of the IR
//! generator on an unresolved name or malformed node, and a `HostError`
//! comes out of the backend bridge or the driver (target lookup, file I/O,
//! object emission).

use std::fmt;

/// An error raised anywhere in the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorType {
    /// A token mismatch or malformed grammar production.
    SyntaxError { message: String },
    /// A codegen-time failure: unknown name, arity mismatch, bad assignment target.
    DevError { message: String },
    /// A backend or I/O failure: target lookup, file open, object emission.
    HostError { message: String },
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorType::SyntaxError { message } => write!(f, "syntax error: {message}"),
            ErrorType::DevError { message } => write!(f, "codegen error: {message}"),
            ErrorType::HostError { message } => write!(f, "host error: {message}"),
        }
    }
}

impl std::error::Error for ErrorType {}
