//! Knowledge Graph Builder: three-pass construction from chunk
//! sequences, served concurrently for queries once built.

pub mod builder;
pub mod node;
pub mod query;
pub mod relation;

pub use builder::{GraphConfig, KnowledgeGraph};
pub use node::{Node, NodeKind};
pub use query::{GraphQuery, GraphStats};
pub use relation::{Relation, RelationKind};
