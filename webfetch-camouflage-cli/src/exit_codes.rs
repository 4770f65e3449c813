//! Process exit codes

/// Command completed successfully
pub const EXIT_SUCCESS: i32 = 0;

/// Command ran but finished with a recoverable problem, such as a server
/// whose transport failed after it had started
pub const EXIT_WARNING: i32 = 1;

/// Command could not run: bad configuration or a server that failed to start
pub const EXIT_ERROR: i32 = 2;
