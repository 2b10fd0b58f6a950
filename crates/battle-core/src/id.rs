//! Strongly-typed identifiers used throughout the battle engine.

use std::fmt;

/// Identifies a competing agent within a match.
///
/// Assigned by the caller at spawn time (typical values: `"A"`, `"B"`,
/// `"C"`). Must be unique per run — uniqueness is enforced by the kernel's
/// `spawn` operation, not by this type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(String);

impl AgentId {
    /// Wrap a string as an agent id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the underlying string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AgentId {
    fn from(v: &str) -> Self {
        Self(v.to_string())
    }
}

impl From<String> for AgentId {
    fn from(v: String) -> Self {
        Self(v)
    }
}

impl serde::Serialize for AgentId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for AgentId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(AgentId)
    }
}

/// Monotonically increasing tick counter.
///
/// Ticks are 1-indexed during a run: the first executed tick is
/// `TickId(1)`. `TickId(0)` denotes "before the match started" and is used
/// only in the replay header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickId(pub u64);

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TickId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_id_display_roundtrips() {
        let id = AgentId::new("A");
        assert_eq!(id.as_str(), "A");
        assert_eq!(format!("{id}"), "A");
    }

    #[test]
    fn agent_id_ordering_is_lexicographic() {
        let mut ids = vec![AgentId::new("C"), AgentId::new("A"), AgentId::new("B")];
        ids.sort();
        assert_eq!(ids, vec![AgentId::new("A"), AgentId::new("B"), AgentId::new("C")]);
    }

    #[test]
    fn tick_id_display() {
        assert_eq!(format!("{}", TickId(42)), "42");
    }
}
