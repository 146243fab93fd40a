use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A feature as seen by one viewer. Never stored — `votes` and `has_voted`
/// are recomputed from the vote ledger on every read, so clients can trust
/// the count they see.
///
/// `has_voted` is viewer-relative: it is `false` for anonymous reads and for
/// every broadcast payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureView {
    pub id: Uuid,
    pub name: String,
    pub created_by: Uuid,
    pub creator_username: String,
    pub votes: u64,
    pub has_voted: bool,
}
