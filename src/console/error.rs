//! Console error types

/// User-facing command failure, reported as output text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliError {
    /// E01: No registered command has this name
    NotRecognised,
    /// E02: Parameter count differs from the declared arity
    IncorrectParameters,
}

impl CliError {
    /// Get error code string (used in logs)
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotRecognised => "E01",
            Self::IncorrectParameters => "E02",
        }
    }

    /// Get the text sent back to the terminal
    pub fn message(&self) -> &'static str {
        match self {
            Self::NotRecognised => {
                "Command not recognised.  Enter 'help' to view a list of available commands.\r\n\r\n"
            }
            Self::IncorrectParameters => {
                "Incorrect command parameter(s).  Enter \"help\" to view a list of available commands.\r\n\r\n"
            }
        }
    }
}

impl core::fmt::Display for CliError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}
