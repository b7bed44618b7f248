//! Multi-Repository Engine: tracks per-repository context, repository
//! similarity relations, and patterns observed across repositories.

pub mod engine;
pub mod types;

pub use engine::{repository_similarity, MultiRepoConfig, MultiRepoEngine};
pub use types::{
    CrossRepoPattern, MultiRepoInsights, MultiRepoQuery, MultiRepoResult, RepositoryContext,
    RepositoryRelation, RepositoryRelationKind,
};
