//! Per-session reader configuration.
//!
//! Nothing here is global: each [`crate::reader::StreamReader`] owns its own
//! [`ReaderConfig`], so readers for different serializer versions can run
//! side by side.

/// Version string written by the base serializer.
pub const DEFAULT_VERSION: &str = "[Serializer_v1.00]";

/// Settings for one read session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Version string the file header must carry, compared byte-for-byte.
    pub version: String,
    /// Whether chunk boundary mismatches are logged and collected.
    pub report_chunk_errors: bool,
    /// Name of the stream, used only in diagnostics.
    pub stream_name: String,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_owned(),
            report_chunk_errors: true,
            stream_name: String::new(),
        }
    }
}

impl ReaderConfig {
    /// Configuration with the default version and reporting enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expect a different version string, e.g. `"[MeshSerializer_v1.100]"`.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Turn chunk mismatch reporting on or off.
    pub fn with_chunk_error_reporting(mut self, enabled: bool) -> Self {
        self.report_chunk_errors = enabled;
        self
    }

    /// Name the stream in diagnostics.
    pub fn with_stream_name(mut self, name: impl Into<String>) -> Self {
        self.stream_name = name.into();
        self
    }
}
