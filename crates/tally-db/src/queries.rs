use rusqlite::{Connection, OptionalExtension};

use crate::models::{FeatureRow, UserRow};
use crate::{Database, StoreError};

impl Database {
    // -- Users --

    pub fn create_user(
        &self,
        id: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, username, password) VALUES (?1, ?2, ?3)",
                (id, username, password_hash),
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>, StoreError> {
        self.with_conn(|conn| query_user(conn, "username", username))
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>, StoreError> {
        self.with_conn(|conn| query_user(conn, "id", id))
    }

    // -- Features --

    pub fn create_feature(
        &self,
        id: &str,
        name: &str,
        creator_id: &str,
    ) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO features (id, name, created_by) VALUES (?1, ?2, ?3)",
                (id, name, creator_id),
            )?;
            Ok(())
        })
    }

    /// List all features ordered by votes descending, then name ascending.
    /// Names are unique, so the order is a strict total order.
    ///
    /// `has_voted` is looked up per row for the given viewer. That is one
    /// extra query per feature; fine at this scale, a batched join would
    /// replace it in a larger deployment.
    pub fn list_features(&self, viewer: Option<&str>) -> Result<Vec<FeatureRow>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT f.id, f.name, f.created_by, u.username,
                        (SELECT COUNT(*) FROM votes v WHERE v.feature_id = f.id) AS votes
                 FROM features f
                 JOIN users u ON u.id = f.created_by
                 ORDER BY votes DESC, f.name ASC",
            )?;

            let mut rows = stmt
                .query_map([], map_feature_row)?
                .collect::<Result<Vec<_>, _>>()?;

            if let Some(viewer_id) = viewer {
                for row in &mut rows {
                    row.has_voted = query_has_voted(conn, viewer_id, &row.id)?;
                }
            }

            Ok(rows)
        })
    }

    pub fn get_feature(
        &self,
        feature_id: &str,
        viewer: Option<&str>,
    ) -> Result<Option<FeatureRow>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT f.id, f.name, f.created_by, u.username,
                        (SELECT COUNT(*) FROM votes v WHERE v.feature_id = f.id) AS votes
                 FROM features f
                 JOIN users u ON u.id = f.created_by
                 WHERE f.id = ?1",
            )?;

            let row = stmt.query_row([feature_id], map_feature_row).optional()?;

            match row {
                Some(mut row) => {
                    if let Some(viewer_id) = viewer {
                        row.has_voted = query_has_voted(conn, viewer_id, &row.id)?;
                    }
                    Ok(Some(row))
                }
                None => Ok(None),
            }
        })
    }

    // -- Votes --

    /// Record one vote. The UNIQUE(user_id, feature_id) constraint makes
    /// this atomic under concurrent identical calls: exactly one insert
    /// succeeds, the rest observe `Conflict`.
    pub fn record_vote(
        &self,
        id: &str,
        user_id: &str,
        feature_id: &str,
    ) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO votes (id, user_id, feature_id) VALUES (?1, ?2, ?3)",
                (id, user_id, feature_id),
            )?;
            Ok(())
        })
    }

    pub fn has_voted(&self, user_id: &str, feature_id: &str) -> Result<bool, StoreError> {
        self.with_conn(|conn| query_has_voted(conn, user_id, feature_id))
    }

    pub fn count_votes(&self, feature_id: &str) -> Result<u64, StoreError> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM votes WHERE feature_id = ?1",
                [feature_id],
                |row| row.get(0),
            )?;
            Ok(count as u64)
        })
    }
}

fn query_user(conn: &Connection, column: &str, value: &str) -> Result<Option<UserRow>, StoreError> {
    // `column` is one of two fixed literals, never user input.
    let sql = format!(
        "SELECT id, username, password, created_at FROM users WHERE {} = ?1",
        column
    );
    let mut stmt = conn.prepare(&sql)?;

    let row = stmt
        .query_row([value], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                password: row.get(2)?,
                created_at: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_has_voted(
    conn: &Connection,
    user_id: &str,
    feature_id: &str,
) -> Result<bool, StoreError> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM votes WHERE user_id = ?1 AND feature_id = ?2)",
        (user_id, feature_id),
        |row| row.get(0),
    )?;
    Ok(exists != 0)
}

fn map_feature_row(row: &rusqlite::Row<'_>) -> Result<FeatureRow, rusqlite::Error> {
    Ok(FeatureRow {
        id: row.get(0)?,
        name: row.get(1)?,
        created_by: row.get(2)?,
        creator_username: row.get(3)?,
        votes: row.get::<_, i64>(4)? as u64,
        // Filled in by the caller when a viewer is known.
        has_voted: false,
    })
}
