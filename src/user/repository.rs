//! User repository for database operations.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::{debug, instrument};

use super::models::{CreateUserRequest, User, UserListQuery};

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Generate a new user ID.
    fn generate_id() -> String {
        format!("usr_{}", nanoid::nanoid!(12))
    }

    /// Register a new user.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn create(&self, request: CreateUserRequest) -> Result<User> {
        let id = Self::generate_id();

        debug!("Creating user: {} ({})", request.email, id);

        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, phone, role, district, state)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&request.name)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(request.role)
        .bind(&request.district)
        .bind(&request.state)
        .execute(&self.pool)
        .await
        .context("Failed to insert user")?;

        self.get(&id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("User not found after creation"))
    }

    /// Get a user by ID.
    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, phone, role, district, state, join_date, last_active
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user")?;

        Ok(user)
    }

    /// Get a user by email.
    #[instrument(skip(self))]
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, phone, role, district, state, join_date, last_active
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user by email")?;

        Ok(user)
    }

    /// List users with optional filters and paging.
    #[instrument(skip(self))]
    pub async fn list(&self, query: UserListQuery) -> Result<Vec<User>> {
        let limit = query.limit.unwrap_or(100);
        let offset = query.offset.unwrap_or(0);

        let mut sql = String::from(
            r#"
            SELECT id, name, email, phone, role, district, state, join_date, last_active
            FROM users
            WHERE 1=1
            "#,
        );

        let mut bind_values: Vec<String> = Vec::new();

        if let Some(role) = query.role {
            sql.push_str(" AND role = ?");
            bind_values.push(role.to_string());
        }

        if let Some(district) = &query.district {
            sql.push_str(" AND district = ?");
            bind_values.push(district.clone());
        }

        sql.push_str(" ORDER BY join_date DESC LIMIT ? OFFSET ?");

        let mut query_builder = sqlx::query_as::<_, User>(&sql);
        for value in &bind_values {
            query_builder = query_builder.bind(value);
        }
        query_builder = query_builder.bind(limit).bind(offset);

        let users = query_builder
            .fetch_all(&self.pool)
            .await
            .context("Failed to list users")?;

        Ok(users)
    }

    /// Count total users.
    #[instrument(skip(self))]
    pub async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count users")?;

        Ok(count.0)
    }

    /// Update the last-active timestamp. Last write wins; concurrent logins
    /// by the same user race harmlessly here.
    #[instrument(skip(self))]
    pub async fn touch_last_active(&self, id: &str) -> Result<()> {
        sqlx::query("UPDATE users SET last_active = datetime('now') WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to update last active")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::db::Database;

    async fn setup_repo() -> UserRepository {
        let db = Database::in_memory().await.unwrap();
        UserRepository::new(db.pool().clone())
    }

    fn sample_user(email: &str, role: Role) -> CreateUserRequest {
        CreateUserRequest {
            name: "Test User".to_string(),
            email: email.to_string(),
            phone: "9876543210".to_string(),
            role,
            district: "Kamrup".to_string(),
            state: "Assam".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let repo = setup_repo().await;

        let user = repo
            .create(sample_user("nurse@healthnet.gov.in", Role::Nurse))
            .await
            .unwrap();
        assert!(user.id.starts_with("usr_"));
        assert_eq!(user.role, Role::Nurse);
        assert!(user.last_active.is_none());

        let by_id = repo.get(&user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "nurse@healthnet.gov.in");

        let by_email = repo
            .get_by_email("nurse@healthnet.gov.in")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, user.id);

        assert!(repo.get_by_email("missing@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_touch_last_active() {
        let repo = setup_repo().await;
        let user = repo
            .create(sample_user("asha@healthnet.gov.in", Role::AshaWorker))
            .await
            .unwrap();

        repo.touch_last_active(&user.id).await.unwrap();

        let fetched = repo.get(&user.id).await.unwrap().unwrap();
        assert!(fetched.last_active.is_some());
    }

    #[tokio::test]
    async fn test_list_and_count() {
        let repo = setup_repo().await;
        repo.create(sample_user("a@x.com", Role::Admin)).await.unwrap();
        repo.create(sample_user("b@x.com", Role::Nurse)).await.unwrap();
        repo.create(sample_user("c@x.com", Role::Nurse)).await.unwrap();

        assert_eq!(repo.count().await.unwrap(), 3);

        let nurses = repo
            .list(UserListQuery {
                role: Some(Role::Nurse),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(nurses.len(), 2);

        let page = repo
            .list(UserListQuery {
                limit: Some(2),
                offset: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
    }
}
