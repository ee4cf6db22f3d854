use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(Uuid);

impl AgentId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Deterministic id derived from an agent name, so that agents can address
    /// each other by name without a lookup.
    pub fn named(name: &str) -> Self {
        Self(Uuid::from_bytes(*ContentId::from_bytes(name.as_bytes()).as_bytes()))
    }

    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for AgentId {
    fn default() -> Self {
        Self::generate()
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "agent:{}", self.0)
    }
}

/// Identity of an intention, allocated by the owning agent's intention pool.
///
/// Ids are sequence numbers rather than random values so that a reasoning
/// cycle over identical state always allocates the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IntentionId(pub u64);

impl IntentionId {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for IntentionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "intention:{}", self.0)
    }
}

/// 128-bit content fingerprint (truncated blake3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentId([u8; 16]);

impl ContentId {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut id = [0u8; 16];
        let hash = blake3::hash(bytes);
        id.copy_from_slice(&hash.as_bytes()[..16]);
        Self(id)
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl std::fmt::Display for ContentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let hex: String = self.0[..4].iter().map(|b| format!("{:02x}", b)).collect();
        write!(f, "{}", hex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_id_generation() {
        let id1 = AgentId::generate();
        let id2 = AgentId::generate();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_named_agent_id_is_stable() {
        assert_eq!(AgentId::named("pinger"), AgentId::named("pinger"));
        assert_ne!(AgentId::named("pinger"), AgentId::named("ponger"));
    }

    #[test]
    fn test_agent_id_display() {
        let display = format!("{}", AgentId::named("alice"));
        assert!(display.starts_with("agent:"));
    }

    #[test]
    fn test_intention_id_sequence() {
        let first = IntentionId(0);
        assert_eq!(first.next(), IntentionId(1));
        assert_eq!(format!("{}", first.next()), "intention:1");
    }

    #[test]
    fn test_content_id_from_bytes() {
        let id1 = ContentId::from_bytes(b"test symbol");
        let id2 = ContentId::from_bytes(b"test symbol");
        assert_eq!(id1, id2);
        assert_ne!(id1, ContentId::from_bytes(b"other symbol"));
    }

    #[test]
    fn test_content_id_display() {
        assert_eq!(format!("{}", ContentId::from_bytes(b"turn(me)")).len(), 8);
    }
}
