/// Database row types — these map directly to SQLite rows.
/// Distinct from tally-types API models to keep the DB layer independent.

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub password: String,
    pub created_at: String,
}

/// A feature joined with its creator's username, aggregate vote count, and
/// the viewer-relative `has_voted` flag. Computed fresh on every read.
pub struct FeatureRow {
    pub id: String,
    pub name: String,
    pub created_by: String,
    pub creator_username: String,
    pub votes: u64,
    pub has_voted: bool,
}
