// SPDX-License-Identifier: GPL-3.0-only

//! Error types for nvenc-caps
//!
//! Two layers matter here. [`QueryError`] is the outcome of a single
//! capability read and is mostly recovered locally by the prober.
//! [`BackendError`] and [`AppError`] cover everything that ends the run.

use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Outcome of a failed capability query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The device/driver has no value for this (codec, capability) pair.
    /// Expected and recovered by skipping the entry or codec.
    NotApplicable,
    /// Transport or driver failure that must not be mistaken for a
    /// missing capability
    Fatal(String),
}

impl QueryError {
    /// Whether this is the recoverable "no value for this pair" signal
    pub fn is_not_applicable(&self) -> bool {
        matches!(self, QueryError::NotApplicable)
    }
}

/// Errors raised while opening or talking to a capability backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// CUDA driver library could not be loaded
    CudaUnavailable(String),
    /// A CUDA driver call returned an error code
    Cuda { call: &'static str, code: i32 },
    /// NVENC library could not be loaded
    LibraryNotFound(String),
    /// A required entry point is missing from a loaded library
    SymbolNotFound(String),
    /// Driver supports an older NVENC API than the one compiled in
    VersionMismatch { required: u32, supported: u32 },
    /// An NVENC call returned a non-success status
    Nvenc {
        call: &'static str,
        status: i32,
        message: String,
    },
    /// The GPU has no NVENC engine
    NoEncodeDevice,
    /// Fixture file could not be read or understood
    Fixture(String),
}

impl BackendError {
    /// Process exit code for this failure
    ///
    /// 1 when the device itself could not be brought up, 2 for encoder
    /// (NVENC) failures.
    pub fn exit_code(&self) -> u8 {
        match self {
            BackendError::CudaUnavailable(_) | BackendError::Cuda { .. } => 1,
            BackendError::Fixture(_) => 1,
            _ => 2,
        }
    }
}

/// Top-level application error
#[derive(Debug, Clone)]
pub enum AppError {
    /// Backend could not be opened
    Backend(BackendError),
    /// A query failed fatally during probing
    Query(QueryError),
    /// Configuration errors
    Config(String),
    /// I/O errors
    Io(String),
    /// JSON (de)serialization errors
    Json(String),
}

impl AppError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Backend(e) => e.exit_code(),
            AppError::Query(_) => 2,
            AppError::Config(_) | AppError::Io(_) | AppError::Json(_) => 1,
        }
    }

    /// Extra line of advice printed after the error, if any
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            AppError::Backend(BackendError::NoEncodeDevice) => {
                Some("No NVENC engine available on this GPU/driver.")
            }
            AppError::Backend(BackendError::CudaUnavailable(_))
            | AppError::Backend(BackendError::LibraryNotFound(_)) => {
                Some("Is the NVIDIA driver installed? Use --fixture to read a capability dump instead.")
            }
            _ => None,
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::NotApplicable => write!(f, "Capability not applicable to this codec"),
            QueryError::Fatal(msg) => write!(f, "Capability query failed: {}", msg),
        }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::CudaUnavailable(msg) => write!(f, "CUDA driver not available: {}", msg),
            BackendError::Cuda { call, code } => write!(f, "{} failed (CUresult {})", call, code),
            BackendError::LibraryNotFound(msg) => write!(f, "NVENC library not found: {}", msg),
            BackendError::SymbolNotFound(msg) => write!(f, "Required symbol not found: {}", msg),
            BackendError::VersionMismatch {
                required,
                supported,
            } => write!(
                f,
                "NVENC API version mismatch: need {}.{}, driver supports {}.{}",
                required >> 4,
                required & 0xF,
                supported >> 4,
                supported & 0xF
            ),
            BackendError::Nvenc {
                call,
                status,
                message,
            } => {
                if message.is_empty() {
                    write!(f, "NVENC Error: {} failed ({})", call, status)
                } else {
                    write!(f, "NVENC Error: {} failed ({}): {}", call, status, message)
                }
            }
            BackendError::NoEncodeDevice => write!(f, "NVENC Error: no encode device"),
            BackendError::Fixture(msg) => write!(f, "Fixture error: {}", msg),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Backend(e) => write!(f, "{}", e),
            AppError::Query(e) => write!(f, "{}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Io(msg) => write!(f, "I/O error: {}", msg),
            AppError::Json(msg) => write!(f, "JSON error: {}", msg),
        }
    }
}

impl std::error::Error for QueryError {}
impl std::error::Error for BackendError {}
impl std::error::Error for AppError {}

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        AppError::Backend(err)
    }
}

impl From<QueryError> for AppError {
    fn from(err: QueryError) -> Self {
        AppError::Query(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Json(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_applicable_is_distinct_from_fatal() {
        assert!(QueryError::NotApplicable.is_not_applicable());
        assert!(!QueryError::Fatal("device lost".into()).is_not_applicable());
    }

    #[test]
    fn test_exit_codes_follow_failure_stage() {
        let cuda = AppError::from(BackendError::Cuda {
            call: "cuInit",
            code: 100,
        });
        assert_eq!(cuda.exit_code(), 1);

        let nvenc = AppError::from(BackendError::NoEncodeDevice);
        assert_eq!(nvenc.exit_code(), 2);

        let query = AppError::from(QueryError::Fatal("gone".into()));
        assert_eq!(query.exit_code(), 2);
    }

    #[test]
    fn test_no_encode_device_hint() {
        let err = AppError::from(BackendError::NoEncodeDevice);
        assert_eq!(
            err.hint(),
            Some("No NVENC engine available on this GPU/driver.")
        );
        assert!(AppError::Config("x".into()).hint().is_none());
    }

    #[test]
    fn test_version_mismatch_display() {
        let err = BackendError::VersionMismatch {
            required: (12 << 4) | 1,
            supported: (11 << 4),
        };
        let msg = err.to_string();
        assert!(msg.contains("12.1"));
        assert!(msg.contains("11.0"));
    }
}
