//! Engine version identity and the plugin compatibility predicate.
//!
//! Plugins report the engine version they were built against through a
//! packed `u32` (see [`EngineVersion::to_packed`]); the loader compares it
//! against [`ENGINE_VERSION`] before anything is registered.

/// Semantic version triple of the running engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EngineVersion {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
}

/// The version of the engine currently running.
pub const ENGINE_VERSION: EngineVersion = EngineVersion {
    major: 0,
    minor: 3,
    patch: 1,
};

impl EngineVersion {
    /// Packs the triple into the `u32` wire form used by the plugin ABI:
    /// `major << 16 | minor << 8 | patch`.
    #[inline]
    #[must_use]
    pub const fn to_packed(self) -> u32 {
        (self.major as u32) << 16 | (self.minor as u32) << 8 | self.patch as u32
    }

    /// Unpacks the `u32` wire form back into a triple.
    #[inline]
    #[must_use]
    pub const fn from_packed(packed: u32) -> Self {
        Self {
            major: ((packed >> 16) & 0xFF) as u8,
            minor: ((packed >> 8) & 0xFF) as u8,
            patch: (packed & 0xFF) as u8,
        }
    }

    /// Whether a plugin built against `required` may load into this engine.
    ///
    /// The major version must match exactly; the plugin's minor version must
    /// not exceed ours (a plugin may rely on APIs added in later minors).
    /// Patch level never affects compatibility.
    #[must_use]
    pub const fn is_compatible_with(self, required: EngineVersion) -> bool {
        self.major == required.major && required.minor <= self.minor
    }
}

impl std::fmt::Display for EngineVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
