//! Knowledge graph relation types.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "proptest-arbitrary")]
use proptest::prelude::{prop_oneof, Arbitrary, BoxedStrategy, Just, Strategy};

/// Closed set of knowledge-relation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Follows,
    Solves,
    References,
    SimilarTo,
    Causes,
    DependsOn,
    Implements,
    Modifies,
    UsedWith,
    Contains,
    EvolvesFrom,
    ConflictsWith,
}

#[cfg(feature = "proptest-arbitrary")]
impl Arbitrary for RelationKind {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            Just(Self::Follows),
            Just(Self::Solves),
            Just(Self::References),
            Just(Self::SimilarTo),
            Just(Self::Causes),
            Just(Self::DependsOn),
            Just(Self::Implements),
            Just(Self::Modifies),
            Just(Self::UsedWith),
            Just(Self::Contains),
            Just(Self::EvolvesFrom),
            Just(Self::ConflictsWith),
        ]
        .boxed()
    }
}

/// A directed, weighted edge between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub id: String,
    pub from: String,
    pub to: String,
    pub kind: RelationKind,
    pub weight: f32,
    pub confidence: f32,
    pub properties: HashMap<String, String>,
    pub evidence: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Relation {
    /// Build a relation with a deterministic id derived from
    /// `(from, to, kind)`, so repeated derivation from the same inputs
    /// is idempotent.
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>, kind: RelationKind) -> Self {
        let from = from.into();
        let to = to.into();
        let now = Utc::now();
        Self {
            id: relation_id(&from, &to, kind),
            from,
            to,
            kind,
            weight: 1.0,
            confidence: 0.5,
            properties: HashMap::new(),
            evidence: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn inferred(mut self) -> Self {
        self.properties.insert("inferred".to_string(), "true".to_string());
        self
    }

    #[must_use]
    pub fn is_inferred(&self) -> bool {
        self.properties.get("inferred").is_some_and(|v| v == "true")
    }
}

fn relation_id(from: &str, to: &str, kind: RelationKind) -> String {
    let mut hasher = DefaultHasher::new();
    from.hash(&mut hasher);
    to.hash(&mut hasher);
    format!("{kind:?}").hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relation_id_is_deterministic() {
        let a = Relation::new("x", "y", RelationKind::Follows);
        let b = Relation::new("x", "y", RelationKind::Follows);
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn relation_id_distinguishes_kind() {
        let a = Relation::new("x", "y", RelationKind::Follows);
        let b = Relation::new("x", "y", RelationKind::Solves);
        assert_ne!(a.id, b.id);
    }
}
