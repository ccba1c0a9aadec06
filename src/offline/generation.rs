//! Cache generation identifiers.
//!
//! Every name the manager ever creates comes from [`CacheGeneration::name`];
//! anything else found in storage is stale.

/// Bumped whenever the static asset set changes.
pub const CACHE_VERSION: &str = "v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheGeneration {
    /// Umbrella name kept for the app as a whole.
    Umbrella,
    /// Precached manifest assets.
    Static,
    /// Responses stored at runtime.
    Dynamic,
}

impl CacheGeneration {
    pub const ALL: [CacheGeneration; 3] = [
        CacheGeneration::Umbrella,
        CacheGeneration::Static,
        CacheGeneration::Dynamic,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CacheGeneration::Umbrella => "ai-voice-assistant-v1",
            CacheGeneration::Static => "ai-voice-assistant-static-v1",
            CacheGeneration::Dynamic => "ai-voice-assistant-dynamic-v1",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.name() == name)
    }

    /// Whether `name` belongs to the current version.
    pub fn is_current(name: &str) -> bool {
        Self::from_name(name).is_some()
    }
}

impl std::fmt::Display for CacheGeneration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
