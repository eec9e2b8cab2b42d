use crate::models::UserRow;
use crate::{Database, UserRepository};
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};

impl UserRepository for Database {
    fn create_user(&self, username: &str, email: &str, password_hash: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            // The primary key decides uniqueness; an ignored insert means the name is taken.
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO users (username, email, password) VALUES (?1, ?2, ?3)",
                (username, email, password_hash),
            )?;
            Ok(inserted == 1)
        })
    }

    fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_username(conn, username))
    }
}

fn query_user_by_username(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT username, email, password, created_at FROM users WHERE username = ?1",
    )?;

    let row = stmt
        .query_row([username], |row| {
            Ok(UserRow {
                username: row.get(0)?,
                email: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                password: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                created_at: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_temp() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("harvest.db")).unwrap();
        (dir, db)
    }

    #[test]
    fn test_create_and_fetch_user() {
        let (_dir, db) = open_temp();

        assert!(db.create_user("asha", "asha@farm.test", "hash-1").unwrap());

        let row = db.get_user_by_username("asha").unwrap().unwrap();
        assert_eq!(row.username, "asha");
        assert_eq!(row.email, "asha@farm.test");
        assert_eq!(row.password, "hash-1");
        assert!(!row.created_at.is_empty());
    }

    #[test]
    fn test_duplicate_username_keeps_original_row() {
        let (_dir, db) = open_temp();

        assert!(db.create_user("asha", "asha@farm.test", "hash-1").unwrap());
        assert!(!db.create_user("asha", "other@farm.test", "hash-2").unwrap());

        let row = db.get_user_by_username("asha").unwrap().unwrap();
        assert_eq!(row.email, "asha@farm.test");
        assert_eq!(row.password, "hash-1");
    }

    #[test]
    fn test_username_lookup_is_exact() {
        let (_dir, db) = open_temp();
        db.create_user("Asha", "asha@farm.test", "hash-1").unwrap();

        assert!(db.get_user_by_username("asha").unwrap().is_none());
        assert!(db.get_user_by_username("Asha ").unwrap().is_none());
        assert!(db.get_user_by_username("nobody").unwrap().is_none());
    }

    #[test]
    fn test_users_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harvest.db");

        {
            let db = Database::open(&path).unwrap();
            db.create_user("ravi", "ravi@farm.test", "hash").unwrap();
        }

        let db = Database::open(&path).unwrap();
        assert!(db.get_user_by_username("ravi").unwrap().is_some());
    }

    #[test]
    fn test_readers_rotate_and_see_writes() {
        let (_dir, db) = open_temp();
        db.create_user("meera", "meera@farm.test", "hash").unwrap();

        // Hit every reader in the pool at least once.
        for _ in 0..crate::READER_POOL_SIZE * 2 {
            assert!(db.get_user_by_username("meera").unwrap().is_some());
        }
    }
}
