/// PostgreSQL store implementation
///
/// Production persistence over a sqlx connection pool. Queries select
/// explicit column lists, visibility scopes are pushed into WHERE clauses
/// so pagination counts stay correct, and updates are built dynamically so
/// only the patched columns are written, so concurrent writers converge
/// field-by-field, last write wins.
///
/// # Example
///
/// ```no_run
/// use taskhub_shared::db::pool::{create_pool, DatabaseConfig};
/// use taskhub_shared::store::postgres::PgStore;
/// use taskhub_shared::store::UserStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig {
///     url: std::env::var("DATABASE_URL")?,
///     ..Default::default()
/// })
/// .await?;
///
/// let store = PgStore::new(pool);
/// let user = store.find_user_by_email("ada@example.com").await?;
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::pool::health_check;
use crate::models::project::{Project, ProjectFilter, UpdateProject};
use crate::models::task::{
    PriorityCount, StatusCount, Task, TaskFilter, TaskStats, UpdateTask,
};
use crate::models::user::{UpdateProfile, User};
use crate::page::PageParams;
use crate::store::{ProjectStore, Store, StoreError, TaskStore, UserStore};

const USER_COLUMNS: &str =
    "id, name, email, password_hash, avatar_url, roles, created_at, updated_at";

const PROJECT_COLUMNS: &str =
    "id, name, description, status, progress, members, due_date, created_by, created_at, updated_at";

const TASK_COLUMNS: &str =
    "id, title, description, status, priority, assignee_id, project_id, tags, due_date, created_by, created_at, updated_at";

/// sqlx-backed store
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wraps an already-connected pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps a unique-constraint violation on the given field, passing other
/// errors through as backend failures.
fn map_unique_violation(err: sqlx::Error, field: &'static str) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if let Some(constraint) = db_err.constraint() {
            if constraint.contains(field) {
                return StoreError::Duplicate(field);
            }
        }
    }
    StoreError::Database(err)
}

/// Turns a search term into an ILIKE pattern
fn like_pattern(search: &Option<String>) -> Option<String> {
    search.as_ref().map(|term| format!("%{}%", term))
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, avatar_url, roles, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.avatar_url)
        .bind(&user.roles)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "email"))?;

        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        // email is CITEXT, the comparison is case-insensitive
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update_user(&self, id: Uuid, patch: UpdateProfile) -> Result<Option<User>, StoreError> {
        let mut query = String::from("UPDATE users SET updated_at = NOW()");
        let mut bind_count = 1;

        if patch.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if patch.avatar_url.is_some() {
            bind_count += 1;
            query.push_str(&format!(", avatar_url = ${}", bind_count));
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {USER_COLUMNS}"));

        let mut q = sqlx::query_as::<_, User>(&query).bind(id);

        if let Some(name) = patch.name {
            q = q.bind(name);
        }
        if let Some(avatar_url) = patch.avatar_url {
            q = q.bind(avatar_url);
        }

        let user = q.fetch_optional(&self.pool).await?;

        Ok(user)
    }
}

#[async_trait]
impl ProjectStore for PgStore {
    async fn insert_project(&self, project: &Project) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO projects (id, name, description, status, progress, members,
                                  due_date, created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(project.id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.status)
        .bind(project.progress)
        .bind(&project.members)
        .bind(project.due_date)
        .bind(project.created_by)
        .bind(project.created_at)
        .bind(project.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, StoreError> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    async fn list_projects(
        &self,
        user_id: Uuid,
        filter: &ProjectFilter,
        page: PageParams,
    ) -> Result<(Vec<Project>, u64), StoreError> {
        let pattern = like_pattern(&filter.search);

        const SCOPE: &str = r#"
            WHERE (created_by = $1 OR $1 = ANY(members))
              AND ($2::project_status IS NULL OR status = $2)
              AND ($3::text IS NULL OR name ILIKE $3 OR description ILIKE $3)
        "#;

        let projects = sqlx::query_as::<_, Project>(&format!(
            r#"
            SELECT {PROJECT_COLUMNS}
            FROM projects
            {SCOPE}
            ORDER BY created_at DESC, id ASC
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(user_id)
        .bind(filter.status)
        .bind(&pattern)
        .bind(i64::from(page.limit))
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM projects {SCOPE}"))
            .bind(user_id)
            .bind(filter.status)
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await?;

        Ok((projects, total as u64))
    }

    async fn update_project(
        &self,
        id: Uuid,
        patch: UpdateProject,
    ) -> Result<Option<Project>, StoreError> {
        let mut query = String::from("UPDATE projects SET updated_at = NOW()");
        let mut bind_count = 1;

        if patch.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if patch.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if patch.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }
        if patch.progress.is_some() {
            bind_count += 1;
            query.push_str(&format!(", progress = ${}", bind_count));
        }
        if patch.due_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", due_date = ${}", bind_count));
        }
        if patch.members.is_some() {
            bind_count += 1;
            query.push_str(&format!(", members = ${}", bind_count));
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {PROJECT_COLUMNS}"));

        let mut q = sqlx::query_as::<_, Project>(&query).bind(id);

        if let Some(name) = patch.name {
            q = q.bind(name);
        }
        if let Some(description) = patch.description {
            q = q.bind(description);
        }
        if let Some(status) = patch.status {
            q = q.bind(status);
        }
        if let Some(progress) = patch.progress {
            q = q.bind(progress);
        }
        if let Some(due_date) = patch.due_date {
            q = q.bind(due_date);
        }
        if let Some(members) = patch.members {
            q = q.bind(members);
        }

        let project = q.fetch_optional(&self.pool).await?;

        Ok(project)
    }

    async fn delete_project(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn insert_task(&self, task: &Task) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO tasks (id, title, description, status, priority, assignee_id,
                               project_id, tags, due_date, created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status)
        .bind(task.priority)
        .bind(task.assignee_id)
        .bind(task.project_id)
        .bind(&task.tags)
        .bind(task.due_date)
        .bind(task.created_by)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn list_tasks(
        &self,
        user_id: Uuid,
        filter: &TaskFilter,
        page: PageParams,
    ) -> Result<(Vec<Task>, u64), StoreError> {
        let pattern = like_pattern(&filter.search);

        const SCOPE: &str = r#"
            WHERE (assignee_id = $1 OR created_by = $1)
              AND ($2::task_status IS NULL OR status = $2)
              AND ($3::task_priority IS NULL OR priority = $3)
              AND ($4::uuid IS NULL OR project_id = $4)
              AND ($5::text IS NULL OR title ILIKE $5 OR description ILIKE $5)
        "#;

        let tasks = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            {SCOPE}
            ORDER BY created_at DESC, id ASC
            LIMIT $6 OFFSET $7
            "#
        ))
        .bind(user_id)
        .bind(filter.status)
        .bind(filter.priority)
        .bind(filter.project_id)
        .bind(&pattern)
        .bind(i64::from(page.limit))
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM tasks {SCOPE}"))
            .bind(user_id)
            .bind(filter.status)
            .bind(filter.priority)
            .bind(filter.project_id)
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await?;

        Ok((tasks, total as u64))
    }

    async fn update_task(&self, id: Uuid, patch: UpdateTask) -> Result<Option<Task>, StoreError> {
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        if patch.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if patch.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if patch.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }
        if patch.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(", priority = ${}", bind_count));
        }
        if patch.assignee_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(", assignee_id = ${}", bind_count));
        }
        if patch.project_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(", project_id = ${}", bind_count));
        }
        if patch.tags.is_some() {
            bind_count += 1;
            query.push_str(&format!(", tags = ${}", bind_count));
        }
        if patch.due_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", due_date = ${}", bind_count));
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {TASK_COLUMNS}"));

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = patch.title {
            q = q.bind(title);
        }
        if let Some(description) = patch.description {
            q = q.bind(description);
        }
        if let Some(status) = patch.status {
            q = q.bind(status);
        }
        if let Some(priority) = patch.priority {
            q = q.bind(priority);
        }
        if let Some(assignee_id) = patch.assignee_id {
            q = q.bind(assignee_id);
        }
        if let Some(project_id) = patch.project_id {
            q = q.bind(project_id);
        }
        if let Some(tags) = patch.tags {
            q = q.bind(tags);
        }
        if let Some(due_date) = patch.due_date {
            q = q.bind(due_date);
        }

        let task = q.fetch_optional(&self.pool).await?;

        Ok(task)
    }

    async fn delete_task(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn task_stats(&self, user_id: Uuid) -> Result<TaskStats, StoreError> {
        // postgres orders enum values by declaration order, matching the
        // deterministic output the in-memory store produces
        let status_counts = sqlx::query_as::<_, StatusCount>(
            r#"
            SELECT status, COUNT(*) AS count
            FROM tasks
            WHERE assignee_id = $1 OR created_by = $1
            GROUP BY status
            ORDER BY status
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let priority_counts = sqlx::query_as::<_, PriorityCount>(
            r#"
            SELECT priority, COUNT(*) AS count
            FROM tasks
            WHERE assignee_id = $1 OR created_by = $1
            GROUP BY priority
            ORDER BY priority
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(TaskStats {
            status_counts,
            priority_counts,
        })
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        health_check(&self.pool).await?;
        Ok(())
    }
}
