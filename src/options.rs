//! Extraction options.

use std::time::Duration;

/// Slice size the host is asked for, in bytes.
pub const DEFAULT_SLICE_SIZE: u32 = 65536;

/// Options controlling fetching, slide location and fallbacks.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use unslide::ExtractOptions;
///
/// let options = ExtractOptions::default()
///     .with_slice_size(4096)
///     .with_slice_timeout(Duration::from_secs(10));
/// assert_eq!(options.slice_size, 4096);
/// ```
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Bytes per slice requested from the host
    pub slice_size: u32,

    /// Give up on a slice after this long; `None` waits indefinitely
    pub slice_timeout: Option<Duration>,

    /// Probe `slide{n-1}` and `slide{n+1}` after `slide{n}`
    pub probe_adjacent: bool,

    /// Use the first slide entry in the archive when no candidate matched
    pub first_slide_fallback: bool,

    /// Ask the host for its own slide text when the package yields none
    pub host_fallback: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            slice_size: DEFAULT_SLICE_SIZE,
            slice_timeout: None,
            probe_adjacent: true,
            first_slide_fallback: true,
            host_fallback: true,
        }
    }
}

impl ExtractOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the slice size. Zero is raised to one byte.
    pub fn with_slice_size(mut self, bytes: u32) -> Self {
        self.slice_size = bytes.max(1);
        self
    }

    /// Set a per-slice timeout.
    pub fn with_slice_timeout(mut self, timeout: Duration) -> Self {
        self.slice_timeout = Some(timeout);
        self
    }

    /// Enable or disable adjacent index probing.
    pub fn with_adjacent_probing(mut self, enabled: bool) -> Self {
        self.probe_adjacent = enabled;
        self
    }

    /// Enable or disable the first-slide fallback.
    pub fn with_first_slide_fallback(mut self, enabled: bool) -> Self {
        self.first_slide_fallback = enabled;
        self
    }

    /// Enable or disable the host text fallback.
    pub fn with_host_fallback(mut self, enabled: bool) -> Self {
        self.host_fallback = enabled;
        self
    }
}
