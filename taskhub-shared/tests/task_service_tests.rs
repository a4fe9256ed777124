/// Integration tests for the task lifecycle service
///
/// These run against the in-memory store, which shares its observable
/// semantics with the PostgreSQL store, so no database is required.

use std::sync::Arc;

use taskhub_shared::auth::policy::Actor;
use taskhub_shared::error::CoreError;
use taskhub_shared::models::task::{
    CreateTask, TaskFilter, TaskPriority, TaskStatus, UpdateTask,
};
use taskhub_shared::models::user::Role;
use taskhub_shared::services::tasks::TaskService;
use taskhub_shared::store::memory::InMemoryStore;
use uuid::Uuid;

fn setup() -> TaskService {
    TaskService::new(Arc::new(InMemoryStore::new()))
}

fn member() -> Actor {
    Actor::new(Uuid::new_v4(), vec![Role::Member])
}

fn input(title: &str, assignee_id: Uuid) -> CreateTask {
    CreateTask {
        title: title.to_string(),
        description: None,
        status: TaskStatus::Todo,
        priority: TaskPriority::Medium,
        assignee_id,
        project_id: None,
        tags: vec![],
        due_date: None,
    }
}

#[tokio::test]
async fn roundtrip_create_then_get() {
    let service = setup();
    let u1 = member();
    let assignee = Uuid::new_v4();

    let created = service
        .create(
            &u1,
            CreateTask {
                description: Some("repro steps attached".to_string()),
                priority: TaskPriority::High,
                tags: vec!["bug".to_string(), "login".to_string()],
                ..input("Fix bug", assignee)
            },
        )
        .await
        .unwrap();

    assert_eq!(created.created_by, u1.id);
    assert_eq!(created.status, TaskStatus::Todo);

    let fetched = service.get(&u1, created.id).await.unwrap();
    assert_eq!(fetched.title, created.title);
    assert_eq!(fetched.description, created.description);
    assert_eq!(fetched.priority, created.priority);
    assert_eq!(fetched.tags, created.tags);
    assert_eq!(fetched.assignee_id, assignee);
}

#[tokio::test]
async fn create_rejects_bad_titles() {
    let service = setup();
    let u1 = member();

    let err = service.create(&u1, input("", Uuid::new_v4())).await.unwrap_err();
    assert!(matches!(err, CoreError::Validation { field: "title", .. }));

    let err = service
        .create(&u1, input(&"t".repeat(201), Uuid::new_v4()))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation { field: "title", .. }));
}

#[tokio::test]
async fn outsider_update_reports_not_found() {
    // U1 creates for U2; U3 is neither creator nor assignee
    let service = setup();
    let u1 = member();
    let u2 = member();
    let u3 = member();

    let task = service.create(&u1, input("Fix bug", u2.id)).await.unwrap();

    let err = service
        .update(
            &u3,
            task.id,
            UpdateTask {
                status: Some(TaskStatus::Completed),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound("task")));

    // and the task is untouched
    let fetched = service.get(&u1, task.id).await.unwrap();
    assert_eq!(fetched.status, TaskStatus::Todo);
}

#[tokio::test]
async fn assignee_can_update_but_not_delete() {
    let service = setup();
    let creator = member();
    let assignee = member();

    let task = service.create(&creator, input("Fix bug", assignee.id)).await.unwrap();

    let updated = service
        .update(
            &assignee,
            task.id,
            UpdateTask {
                status: Some(TaskStatus::InProgress),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, TaskStatus::InProgress);

    let err = service.delete(&assignee, task.id).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound("task")));

    // creator can
    service.delete(&creator, task.id).await.unwrap();
    let err = service.get(&creator, task.id).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound("task")));
}

#[tokio::test]
async fn admin_role_grants_nothing_on_tasks() {
    let service = setup();
    let creator = member();
    let admin = Actor::new(Uuid::new_v4(), vec![Role::Admin]);

    let task = service.create(&creator, input("Fix bug", creator.id)).await.unwrap();

    let err = service.get(&admin, task.id).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound("task")));

    let err = service
        .update(&admin, task.id, UpdateTask::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound("task")));
}

#[tokio::test]
async fn update_patches_whitelisted_fields_independently() {
    let service = setup();
    let u1 = member();
    let new_assignee = Uuid::new_v4();

    let task = service
        .create(
            &u1,
            CreateTask {
                description: Some("desc".to_string()),
                ..input("Fix bug", u1.id)
            },
        )
        .await
        .unwrap();

    let updated = service
        .update(
            &u1,
            task.id,
            UpdateTask {
                priority: Some(TaskPriority::Urgent),
                assignee_id: Some(new_assignee),
                tags: Some(vec!["hotfix".to_string()]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.priority, TaskPriority::Urgent);
    assert_eq!(updated.assignee_id, new_assignee);
    assert_eq!(updated.tags, vec!["hotfix".to_string()]);
    // untouched fields survive
    assert_eq!(updated.title, "Fix bug");
    assert_eq!(updated.description.as_deref(), Some("desc"));
    assert_eq!(updated.status, TaskStatus::Todo);
    assert_eq!(updated.created_by, u1.id);
}

#[tokio::test]
async fn update_clears_fields_on_explicit_null() {
    let service = setup();
    let u1 = member();
    let project_id = Uuid::new_v4();

    let task = service
        .create(
            &u1,
            CreateTask {
                description: Some("desc".to_string()),
                project_id: Some(project_id),
                due_date: Some(chrono::Utc::now()),
                ..input("Fix bug", u1.id)
            },
        )
        .await
        .unwrap();

    let updated = service
        .update(
            &u1,
            task.id,
            UpdateTask {
                description: Some(None),
                project_id: Some(None),
                due_date: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(updated.description.is_none());
    assert!(updated.project_id.is_none());
    assert!(updated.due_date.is_none());
}

#[tokio::test]
async fn stats_groups_by_status_and_priority() {
    // two tasks assigned to U2: one todo, one completed
    let service = setup();
    let u1 = member();
    let u2 = member();

    service.create(&u1, input("First", u2.id)).await.unwrap();
    service
        .create(
            &u1,
            CreateTask {
                status: TaskStatus::Completed,
                priority: TaskPriority::High,
                ..input("Second", u2.id)
            },
        )
        .await
        .unwrap();

    let stats = service.stats(&u2).await.unwrap();

    assert_eq!(stats.status_counts.len(), 2);
    assert_eq!(stats.status_counts[0].status, TaskStatus::Todo);
    assert_eq!(stats.status_counts[0].count, 1);
    assert_eq!(stats.status_counts[1].status, TaskStatus::Completed);
    assert_eq!(stats.status_counts[1].count, 1);

    assert_eq!(stats.priority_counts.len(), 2);
    assert_eq!(stats.priority_counts[0].priority, TaskPriority::Medium);
    assert_eq!(stats.priority_counts[0].count, 1);
    assert_eq!(stats.priority_counts[1].priority, TaskPriority::High);
    assert_eq!(stats.priority_counts[1].count, 1);

    // a user with no visible tasks gets empty groups
    let stranger = member();
    let stats = service.stats(&stranger).await.unwrap();
    assert!(stats.status_counts.is_empty());
    assert!(stats.priority_counts.is_empty());
}

#[tokio::test]
async fn list_scope_includes_assigned_and_created() {
    let service = setup();
    let u1 = member();
    let u2 = member();

    // created by u1 for u2: visible to both
    service.create(&u1, input("Shared", u2.id)).await.unwrap();
    // created by u2 for themselves: only u2
    service.create(&u2, input("Private", u2.id)).await.unwrap();

    let page = service.list(&u1, TaskFilter::default(), None, None).await.unwrap();
    assert_eq!(page.total, 1);

    let page = service.list(&u2, TaskFilter::default(), None, None).await.unwrap();
    assert_eq!(page.total, 2);
}

#[tokio::test]
async fn list_filters_and_together() {
    let service = setup();
    let u1 = member();
    let project_id = Uuid::new_v4();

    service
        .create(
            &u1,
            CreateTask {
                status: TaskStatus::InProgress,
                priority: TaskPriority::High,
                project_id: Some(project_id),
                ..input("Deploy API", u1.id)
            },
        )
        .await
        .unwrap();
    service
        .create(
            &u1,
            CreateTask {
                status: TaskStatus::InProgress,
                ..input("Deploy frontend", u1.id)
            },
        )
        .await
        .unwrap();
    service.create(&u1, input("Write docs", u1.id)).await.unwrap();

    let page = service
        .list(
            &u1,
            TaskFilter {
                status: Some(TaskStatus::InProgress),
                priority: Some(TaskPriority::High),
                project_id: Some(project_id),
                search: Some("deploy".to_string()),
            },
            None,
            None,
        )
        .await
        .unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].title, "Deploy API");
}

#[tokio::test]
async fn search_matches_title_or_description() {
    let service = setup();
    let u1 = member();

    service.create(&u1, input("Login flow", u1.id)).await.unwrap();
    service
        .create(
            &u1,
            CreateTask {
                description: Some("broken login redirect".to_string()),
                ..input("Redirect audit", u1.id)
            },
        )
        .await
        .unwrap();
    service.create(&u1, input("Unrelated", u1.id)).await.unwrap();

    let page = service
        .list(
            &u1,
            TaskFilter {
                search: Some("LOGIN".to_string()),
                ..Default::default()
            },
            None,
            None,
        )
        .await
        .unwrap();

    assert_eq!(page.total, 2);
}

#[tokio::test]
async fn list_pagination_math() {
    let service = setup();
    let u1 = member();

    for i in 0..7 {
        service.create(&u1, input(&format!("Task {i}"), u1.id)).await.unwrap();
    }

    let page = service.list(&u1, TaskFilter::default(), Some(2), Some(3)).await.unwrap();
    assert_eq!(page.total, 7);
    assert_eq!(page.pages, 3);
    assert_eq!(page.items.len(), 3);

    let page = service.list(&u1, TaskFilter::default(), Some(3), Some(3)).await.unwrap();
    assert_eq!(page.items.len(), 1);
}
