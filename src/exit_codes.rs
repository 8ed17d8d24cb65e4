//! Process exit codes used by the command-line tool

/// All inputs were processed
pub const SUCCESS: i32 = 0;

/// An input could not be read or written, or the configuration was invalid
pub const TOOL_ERROR: i32 = 2;

pub mod exit {
    use super::{SUCCESS, TOOL_ERROR};

    pub fn success() -> ! {
        std::process::exit(SUCCESS)
    }

    pub fn tool_error() -> ! {
        std::process::exit(TOOL_ERROR)
    }
}
