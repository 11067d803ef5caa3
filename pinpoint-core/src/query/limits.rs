/// Bounds and defaults applied by the [`super::QueryEngine`].
///
/// The defaults size command replies to fit a single chat message.
///
/// # Examples
/// ```
/// use pinpoint_core::QueryLimits;
///
/// let limits = QueryLimits::default().with_export_cap(10);
/// assert_eq!(limits.export_cap, 10);
/// assert_eq!(limits.recent_default, 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryLimits {
    /// Records listed by `recent` when no count is given.
    pub recent_default: u32,
    /// Smallest accepted `recent` count.
    pub recent_min: u32,
    /// Largest accepted `recent` count.
    pub recent_max: u32,
    /// Search radius used when none is given.
    pub search_radius_default: i64,
    /// How many ranked matches callers should display.
    pub search_display_limit: usize,
    /// Maximum number of records included in an export.
    pub export_cap: usize,
    /// Maximum size of the export text in bytes.
    pub export_max_bytes: usize,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            recent_default: 10,
            recent_min: 1,
            recent_max: 25,
            search_radius_default: 1000,
            search_display_limit: 15,
            export_cap: 50,
            export_max_bytes: 1900,
        }
    }
}

impl QueryLimits {
    /// Override the number of records an export may include.
    #[must_use]
    pub const fn with_export_cap(mut self, cap: usize) -> Self {
        self.export_cap = cap;
        self
    }

    /// Override the maximum export text size.
    #[must_use]
    pub const fn with_export_max_bytes(mut self, max_bytes: usize) -> Self {
        self.export_max_bytes = max_bytes;
        self
    }
}
