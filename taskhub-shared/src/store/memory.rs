/// In-memory store implementation
///
/// Hashmap-backed twin of the PostgreSQL store with the same observable
/// semantics: case-insensitive email uniqueness, visibility-scoped
/// listing with AND-ed filters, creation-time-descending ordering with id
/// tie-break, and field-level patch application. Backs the test suites
/// and local development without a database.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::project::{Project, ProjectFilter, UpdateProject};
use crate::models::task::{
    PriorityCount, StatusCount, Task, TaskFilter, TaskPriority, TaskStats, TaskStatus, UpdateTask,
};
use crate::models::user::{UpdateProfile, User};
use crate::page::PageParams;
use crate::store::{ProjectStore, Store, StoreError, TaskStore, UserStore};

/// Hashmap-backed store
#[derive(Debug, Default)]
pub struct InMemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    projects: RwLock<HashMap<Uuid, Project>>,
    tasks: RwLock<HashMap<Uuid, Task>>,
}

impl InMemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

/// Sorts newest-first, breaking creation-time ties by ascending id
fn window<T>(mut items: Vec<T>, page: PageParams) -> (Vec<T>, u64)
where
    T: Ordered,
{
    items.sort_by(|a, b| b.created_at_key().cmp(&a.created_at_key()).then(a.id_key().cmp(&b.id_key())));

    let total = items.len() as u64;
    let items = items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit as usize)
        .collect();

    (items, total)
}

trait Ordered {
    fn created_at_key(&self) -> chrono::DateTime<chrono::Utc>;
    fn id_key(&self) -> Uuid;
}

impl Ordered for Project {
    fn created_at_key(&self) -> chrono::DateTime<chrono::Utc> {
        self.created_at
    }
    fn id_key(&self) -> Uuid {
        self.id
    }
}

impl Ordered for Task {
    fn created_at_key(&self) -> chrono::DateTime<chrono::Utc> {
        self.created_at
    }
    fn id_key(&self) -> Uuid {
        self.id
    }
}

/// Case-insensitive substring match over an optional haystack
fn matches_search(needle: &str, primary: &str, secondary: Option<&str>) -> bool {
    let needle = needle.to_lowercase();
    primary.to_lowercase().contains(&needle)
        || secondary.is_some_and(|text| text.to_lowercase().contains(&needle))
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.users.write().unwrap();

        if users.values().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(StoreError::Duplicate("email"));
        }

        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().unwrap().get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .read()
            .unwrap()
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn update_user(&self, id: Uuid, patch: UpdateProfile) -> Result<Option<User>, StoreError> {
        let mut users = self.users.write().unwrap();

        Ok(users.get_mut(&id).map(|user| {
            if let Some(name) = patch.name {
                user.name = name;
            }
            if let Some(avatar_url) = patch.avatar_url {
                user.avatar_url = avatar_url;
            }
            user.updated_at = chrono::Utc::now();
            user.clone()
        }))
    }
}

#[async_trait]
impl ProjectStore for InMemoryStore {
    async fn insert_project(&self, project: &Project) -> Result<(), StoreError> {
        self.projects
            .write()
            .unwrap()
            .insert(project.id, project.clone());
        Ok(())
    }

    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, StoreError> {
        Ok(self.projects.read().unwrap().get(&id).cloned())
    }

    async fn list_projects(
        &self,
        user_id: Uuid,
        filter: &ProjectFilter,
        page: PageParams,
    ) -> Result<(Vec<Project>, u64), StoreError> {
        let projects = self.projects.read().unwrap();

        let matching: Vec<Project> = projects
            .values()
            .filter(|p| p.created_by == user_id || p.is_member(user_id))
            .filter(|p| filter.status.map_or(true, |status| p.status == status))
            .filter(|p| {
                filter.search.as_deref().map_or(true, |term| {
                    matches_search(term, &p.name, p.description.as_deref())
                })
            })
            .cloned()
            .collect();

        Ok(window(matching, page))
    }

    async fn update_project(
        &self,
        id: Uuid,
        patch: UpdateProject,
    ) -> Result<Option<Project>, StoreError> {
        let mut projects = self.projects.write().unwrap();

        Ok(projects.get_mut(&id).map(|project| {
            project.apply(patch);
            project.clone()
        }))
    }

    async fn delete_project(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.projects.write().unwrap().remove(&id).is_some())
    }
}

#[async_trait]
impl TaskStore for InMemoryStore {
    async fn insert_task(&self, task: &Task) -> Result<(), StoreError> {
        self.tasks.write().unwrap().insert(task.id, task.clone());
        Ok(())
    }

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        Ok(self.tasks.read().unwrap().get(&id).cloned())
    }

    async fn list_tasks(
        &self,
        user_id: Uuid,
        filter: &TaskFilter,
        page: PageParams,
    ) -> Result<(Vec<Task>, u64), StoreError> {
        let tasks = self.tasks.read().unwrap();

        let matching: Vec<Task> = tasks
            .values()
            .filter(|t| t.assignee_id == user_id || t.created_by == user_id)
            .filter(|t| filter.status.map_or(true, |status| t.status == status))
            .filter(|t| filter.priority.map_or(true, |priority| t.priority == priority))
            .filter(|t| filter.project_id.map_or(true, |project| t.project_id == Some(project)))
            .filter(|t| {
                filter.search.as_deref().map_or(true, |term| {
                    matches_search(term, &t.title, t.description.as_deref())
                })
            })
            .cloned()
            .collect();

        Ok(window(matching, page))
    }

    async fn update_task(&self, id: Uuid, patch: UpdateTask) -> Result<Option<Task>, StoreError> {
        let mut tasks = self.tasks.write().unwrap();

        Ok(tasks.get_mut(&id).map(|task| {
            task.apply(patch);
            task.clone()
        }))
    }

    async fn delete_task(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.tasks.write().unwrap().remove(&id).is_some())
    }

    async fn task_stats(&self, user_id: Uuid) -> Result<TaskStats, StoreError> {
        let tasks = self.tasks.read().unwrap();

        let scoped: Vec<&Task> = tasks
            .values()
            .filter(|t| t.assignee_id == user_id || t.created_by == user_id)
            .collect();

        let status_counts = TaskStatus::ALL
            .iter()
            .filter_map(|&status| {
                let count = scoped.iter().filter(|t| t.status == status).count() as i64;
                (count > 0).then_some(StatusCount { status, count })
            })
            .collect();

        let priority_counts = TaskPriority::ALL
            .iter()
            .filter_map(|&priority| {
                let count = scoped.iter().filter(|t| t.priority == priority).count() as i64;
                (count > 0).then_some(PriorityCount { priority, count })
            })
            .collect();

        Ok(TaskStats {
            status_counts,
            priority_counts,
        })
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
