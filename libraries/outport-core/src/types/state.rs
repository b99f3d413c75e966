/// Handle lifecycle state
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a [`ClientHandle`](crate::ClientHandle) is in its lifecycle
///
/// `Idle → Started → Active ⇄ Started → Released`. A released handle can be
/// started again, which acquires a fresh native client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    /// Never started
    Idle,

    /// Native client acquired, not streaming
    Started,

    /// Native client streaming
    Active,

    /// Native client released by `stop`
    Released,
}

impl LifecycleState {
    /// True while a native client is held
    pub fn holds_client(self) -> bool {
        matches!(self, Self::Started | Self::Active)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Started => "started",
            Self::Active => "active",
            Self::Released => "released",
        };
        f.write_str(name)
    }
}
