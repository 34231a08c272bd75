//! # User Repository
//!
//! Staff accounts. Hashes arrive already computed; this layer never sees a
//! plaintext password.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use locker_core::validation::validate_username;
use locker_core::User;

const USER_COLUMNS: &str = "id, username, password_hash, is_admin, created_at";

/// Repository for staff accounts.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Creates an account. Duplicate usernames are a UniqueViolation.
    pub async fn create(&self, username: &str, password_hash: &str, is_admin: bool) -> DbResult<User> {
        validate_username(username)?;

        let user = User {
            id: Uuid::new_v4().to_string(),
            username: username.trim().to_string(),
            password_hash: password_hash.to_string(),
            is_admin,
            created_at: Utc::now(),
        };

        sqlx::query(&format!(
            "INSERT INTO users ({USER_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5)"
        ))
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from(e).on_unique("username", &user.username))?;

        debug!(id = %user.id, username = %user.username, is_admin, "User created");
        Ok(user)
    }

    /// Looks up an account for login.
    pub async fn find_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?1"
        ))
        .bind(username.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets an account by ID.
    pub async fn get(&self, id: &str) -> DbResult<User> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("User", id))
    }

    /// All accounts, by username.
    pub async fn list(&self) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY username"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Deletes an account.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        debug!(id = %id, "User deleted");
        Ok(())
    }

    /// Number of accounts, for the first-run bootstrap.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::testing::test_db;

    #[tokio::test]
    async fn test_create_and_find() {
        let db = test_db().await;
        let user = db.users().create("clerk", "hash", false).await.unwrap();

        let found = db.users().find_by_username("clerk").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(found.password_hash, "hash");
        assert!(!found.is_admin);

        assert!(db.users().find_by_username("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let db = test_db().await;
        db.users().create("admin", "h1", true).await.unwrap();

        let err = db.users().create("admin", "h2", false).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::UniqueViolation { ref field, ref value } if field == "username" && value == "admin"
        ));
        assert_eq!(db.users().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_invalid_username_rejected() {
        let db = test_db().await;
        assert!(matches!(
            db.users().create("ab", "h", false).await,
            Err(DbError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let db = test_db().await;
        let b = db.users().create("bravo", "h", false).await.unwrap();
        db.users().create("alpha", "h", true).await.unwrap();

        let names: Vec<_> = db
            .users()
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(names, vec!["alpha", "bravo"]);

        db.users().delete(&b.id).await.unwrap();
        assert!(matches!(
            db.users().delete(&b.id).await,
            Err(DbError::NotFound { .. })
        ));
        assert!(db.users().get(&b.id).await.is_err());
        assert_eq!(db.users().count().await.unwrap(), 1);
    }
}
