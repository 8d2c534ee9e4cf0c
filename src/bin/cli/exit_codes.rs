//! Exit codes for the CLI tool.

use csvsplice::Error;

/// Exit code constants
pub const SUCCESS: i32 = 0;
/// Fatal error occurred
pub const FATAL_ERROR: i32 = 2;
/// The file could not be scanned as a table
pub const BAD_TABLE: i32 = 3;
/// Row or column outside the permitted range
pub const OUT_OF_RANGE: i32 = 4;
/// I/O error
pub const IO_ERROR: i32 = 5;
/// Invalid command line arguments
pub const BAD_ARGS: i32 = 255;

/// Exit code enum for structured handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success,
    FatalError,
    BadTable,
    OutOfRange,
    IoError,
    BadArgs,
}

impl ExitCode {
    /// Returns the numeric exit code
    pub fn code(self) -> i32 {
        match self {
            Self::Success => SUCCESS,
            Self::FatalError => FATAL_ERROR,
            Self::BadTable => BAD_TABLE,
            Self::OutOfRange => OUT_OF_RANGE,
            Self::IoError => IO_ERROR,
            Self::BadArgs => BAD_ARGS,
        }
    }
}

/// Converts a csvsplice error to an exit code
pub fn error_to_exit_code(error: &Error) -> ExitCode {
    match error {
        Error::Io(_) | Error::Store { .. } => ExitCode::IoError,
        Error::NotOpen | Error::IsDirectory | Error::NoStream => ExitCode::IoError,
        Error::SeekFailed { .. } | Error::ShortRead { .. } => ExitCode::BadTable,
        Error::RowOutOfRange { .. } | Error::ColumnOutOfRange { .. } => ExitCode::OutOfRange,
        Error::InvalidText { .. } | Error::EmptyColumnData => ExitCode::BadArgs,
        // Future error variants - required by #[non_exhaustive]
        _ => ExitCode::FatalError,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping() {
        let range = Error::RowOutOfRange { row: 0, max: 1000 };
        assert_eq!(error_to_exit_code(&range).code(), OUT_OF_RANGE);
        assert_eq!(error_to_exit_code(&Error::EmptyColumnData), ExitCode::BadArgs);
        assert_eq!(error_to_exit_code(&Error::IsDirectory), ExitCode::IoError);
    }
}
