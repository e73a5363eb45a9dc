//! Adapter metadata types usable across crates.

/// Typed key identifying a venue adapter.
///
/// The key's string must match the `venue` component of every
/// `InstrumentKey` routed to that adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VenueKey(pub &'static str);

impl VenueKey {
    /// Construct a new typed venue key from a static name.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Returns the inner static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl From<VenueKey> for &'static str {
    fn from(k: VenueKey) -> Self {
        k.0
    }
}
