use std::{
    fmt::{self, Display},
    io,
};

/// Main error type for the `piocheck` tools.
///
/// Every variant maps to a distinct failure category a runner can hit,
/// so the diagnostic printed for the build log names what actually went
/// wrong (sidecar trouble vs. a missing analysis tool vs. plain I/O).
#[derive(Debug)]
pub enum Error {
    /// The command line is missing a required argument
    Usage(String),
    /// The `env_vars.json` sidecar is missing, unreadable or not valid JSON
    Sidecar(String),
    /// A required key is absent from the sidecar
    KeyNotFound(String),
    /// An external analysis tool could not be located or launched
    ToolNotFound(String),
    /// File I/O failed
    File(io::Error),
    /// Serialization or deserialization failed
    Serialize(String),
    /// Something else happened
    Unknown(String),
}

impl Error {
    /// The command line is missing a required argument
    #[must_use]
    pub fn usage<S>(arg: S) -> Self
    where
        S: Into<String>,
    {
        Error::Usage(arg.into())
    }

    /// The sidecar file is missing, unreadable or not valid JSON
    #[must_use]
    pub fn sidecar<S>(arg: S) -> Self
    where
        S: Into<String>,
    {
        Error::Sidecar(arg.into())
    }

    /// A required key is absent from the sidecar
    #[must_use]
    pub fn key_not_found<S>(arg: S) -> Self
    where
        S: Into<String>,
    {
        Error::KeyNotFound(arg.into())
    }

    /// An external analysis tool could not be located or launched
    #[must_use]
    pub fn tool_not_found<S>(arg: S) -> Self
    where
        S: Into<String>,
    {
        Error::ToolNotFound(arg.into())
    }

    /// File I/O failed
    #[must_use]
    pub fn file(arg: io::Error) -> Self {
        Error::File(arg)
    }

    /// Serialization or deserialization failed
    #[must_use]
    pub fn serialize<S>(arg: S) -> Self
    where
        S: Into<String>,
    {
        Error::Serialize(arg.into())
    }

    /// Something else happened
    #[must_use]
    pub fn unknown<S>(arg: S) -> Self
    where
        S: Into<String>,
    {
        Error::Unknown(arg.into())
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Usage(s) => write!(f, "Usage error: {s}"),
            Self::Sidecar(s) => write!(f, "Error loading environment data: {s}"),
            Self::KeyNotFound(s) => write!(f, "Key `{s}` not in environment data"),
            Self::ToolNotFound(s) => write!(f, "Tool not found: {s}"),
            Self::File(err) => write!(f, "File IO failed: {err}"),
            Self::Serialize(s) => write!(f, "Error in serialization: {s}"),
            Self::Unknown(s) => write!(f, "Unknown error: {s}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::File(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialize(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::Error;

    #[test]
    fn io_errors_convert_to_file_variant() {
        let err: Error = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
        assert!(matches!(err, Error::File(_)));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn display_names_the_category() {
        assert!(Error::tool_not_found("'valgrind' missing")
            .to_string()
            .starts_with("Tool not found"));
        assert!(Error::sidecar("no env_vars.json")
            .to_string()
            .contains("environment data"));
    }
}
