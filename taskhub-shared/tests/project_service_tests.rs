/// Integration tests for the project lifecycle service
///
/// These run against the in-memory store, which shares its observable
/// semantics with the PostgreSQL store, so no database is required.

use std::sync::Arc;

use chrono::Duration;
use taskhub_shared::auth::policy::Actor;
use taskhub_shared::error::CoreError;
use taskhub_shared::models::project::{CreateProject, Project, ProjectFilter, ProjectStatus, UpdateProject};
use taskhub_shared::models::user::Role;
use taskhub_shared::services::projects::ProjectService;
use taskhub_shared::store::memory::InMemoryStore;
use taskhub_shared::store::ProjectStore;
use uuid::Uuid;

fn setup() -> (ProjectService, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    (ProjectService::new(store.clone()), store)
}

fn member() -> Actor {
    Actor::new(Uuid::new_v4(), vec![Role::Member])
}

fn admin() -> Actor {
    Actor::new(Uuid::new_v4(), vec![Role::Admin])
}

fn input(name: &str) -> CreateProject {
    CreateProject {
        name: name.to_string(),
        description: None,
        status: ProjectStatus::Planning,
        due_date: None,
        members: vec![],
    }
}

#[tokio::test]
async fn create_sets_creator_membership_and_progress() {
    let (service, _) = setup();
    let u1 = member();

    let project = service.create(&u1, input("Alpha")).await.unwrap();

    assert_eq!(project.name, "Alpha");
    assert_eq!(project.status, ProjectStatus::Planning);
    assert_eq!(project.members, vec![u1.id]);
    assert_eq!(project.progress, 0);
    assert_eq!(project.created_by, u1.id);
}

#[tokio::test]
async fn create_dedupes_initial_members() {
    let (service, _) = setup();
    let u1 = member();
    let u2 = Uuid::new_v4();

    let project = service
        .create(
            &u1,
            CreateProject {
                members: vec![u2, u2, u1.id],
                ..input("Alpha")
            },
        )
        .await
        .unwrap();

    assert_eq!(project.members, vec![u1.id, u2]);
}

#[tokio::test]
async fn create_rejects_bad_names() {
    let (service, _) = setup();
    let u1 = member();

    let err = service.create(&u1, input("")).await.unwrap_err();
    assert!(matches!(err, CoreError::Validation { field: "name", .. }));

    let err = service.create(&u1, input(&"x".repeat(101))).await.unwrap_err();
    assert!(matches!(err, CoreError::Validation { field: "name", .. }));
}

#[tokio::test]
async fn create_rejects_oversized_description() {
    let (service, _) = setup();
    let u1 = member();

    let err = service
        .create(
            &u1,
            CreateProject {
                description: Some("d".repeat(1001)),
                ..input("Alpha")
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Validation { field: "description", .. }));
}

#[tokio::test]
async fn roundtrip_create_then_get() {
    let (service, _) = setup();
    let u1 = member();

    let created = service
        .create(
            &u1,
            CreateProject {
                description: Some("the plan".to_string()),
                status: ProjectStatus::Active,
                ..input("Alpha")
            },
        )
        .await
        .unwrap();

    let fetched = service.get(&u1, created.id).await.unwrap();

    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.name, created.name);
    assert_eq!(fetched.description, created.description);
    assert_eq!(fetched.status, created.status);
    assert_eq!(fetched.members, created.members);
}

#[tokio::test]
async fn get_hides_existence_from_outsiders() {
    let (service, _) = setup();
    let u1 = member();
    let outsider = member();

    let project = service.create(&u1, input("Alpha")).await.unwrap();

    let err = service.get(&outsider, project.id).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound("project")));
}

#[tokio::test]
async fn member_can_view() {
    let (service, _) = setup();
    let u1 = member();
    let u2 = member();

    let project = service
        .create(
            &u1,
            CreateProject {
                members: vec![u2.id],
                ..input("Alpha")
            },
        )
        .await
        .unwrap();

    assert!(service.get(&u2, project.id).await.is_ok());
}

#[tokio::test]
async fn membership_scenario() {
    // create as U1, add U2, then try to remove the creator
    let (service, _) = setup();
    let u1 = member();
    let u2 = Uuid::new_v4();

    let project = service.create(&u1, input("Alpha")).await.unwrap();
    assert_eq!(project.members, vec![u1.id]);
    assert_eq!(project.progress, 0);

    let project = service.add_member(&u1, project.id, u2).await.unwrap();
    assert_eq!(project.members, vec![u1.id, u2]);

    let err = service.remove_member(&u1, project.id, u1.id).await.unwrap_err();
    assert!(matches!(err, CoreError::Validation { field: "user_id", .. }));

    // state unchanged after the rejected removal
    let project = service.get(&u1, project.id).await.unwrap();
    assert_eq!(project.members, vec![u1.id, u2]);
}

#[tokio::test]
async fn add_member_rejects_duplicates() {
    let (service, _) = setup();
    let u1 = member();
    let u2 = Uuid::new_v4();

    let project = service.create(&u1, input("Alpha")).await.unwrap();
    service.add_member(&u1, project.id, u2).await.unwrap();

    let err = service.add_member(&u1, project.id, u2).await.unwrap_err();
    assert!(matches!(err, CoreError::Conflict(_)));
}

#[tokio::test]
async fn membership_ops_are_creator_only() {
    let (service, _) = setup();
    let u1 = member();
    let u2 = member();

    let project = service
        .create(
            &u1,
            CreateProject {
                members: vec![u2.id],
                ..input("Alpha")
            },
        )
        .await
        .unwrap();

    // a member may view but not manage membership; existence stays hidden
    let err = service.add_member(&u2, project.id, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound("project")));

    let err = service.remove_member(&u2, project.id, u2.id).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound("project")));
}

#[tokio::test]
async fn remove_member_removes() {
    let (service, _) = setup();
    let u1 = member();
    let u2 = Uuid::new_v4();

    let project = service
        .create(
            &u1,
            CreateProject {
                members: vec![u2],
                ..input("Alpha")
            },
        )
        .await
        .unwrap();

    let project = service.remove_member(&u1, project.id, u2).await.unwrap();
    assert_eq!(project.members, vec![u1.id]);
}

#[tokio::test]
async fn update_by_creator_applies_patch() {
    let (service, _) = setup();
    let u1 = member();

    let project = service.create(&u1, input("Alpha")).await.unwrap();

    let updated = service
        .update(
            &u1,
            project.id,
            UpdateProject {
                name: Some("Beta".to_string()),
                status: Some(ProjectStatus::Active),
                progress: Some(40),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Beta");
    assert_eq!(updated.status, ProjectStatus::Active);
    assert_eq!(updated.progress, 40);
    assert!(updated.updated_at >= project.updated_at);
    // identity fields untouched
    assert_eq!(updated.created_by, u1.id);
    assert_eq!(updated.created_at, project.created_at);
}

#[tokio::test]
async fn update_requires_mutation_rights() {
    let (service, _) = setup();
    let u1 = member();
    let u2 = member();
    let admin_member = admin();

    let project = service
        .create(
            &u1,
            CreateProject {
                members: vec![u2.id, admin_member.id],
                ..input("Alpha")
            },
        )
        .await
        .unwrap();

    // plain member: visible, so the failure is forbidden
    let err = service
        .update(&u2, project.id, UpdateProject::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Forbidden(_)));

    // member holding the admin role may mutate
    let updated = service
        .update(
            &admin_member,
            project.id,
            UpdateProject {
                status: Some(ProjectStatus::OnHold),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, ProjectStatus::OnHold);

    // outsiders stay on not-found even with the admin role
    let outside_admin = admin();
    let err = service
        .update(&outside_admin, project.id, UpdateProject::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound("project")));
}

#[tokio::test]
async fn update_progress_is_bounds_checked() {
    let (service, _) = setup();
    let u1 = member();

    let project = service.create(&u1, input("Alpha")).await.unwrap();

    for bad in [-1, 101, 150] {
        let err = service
            .update(
                &u1,
                project.id,
                UpdateProject {
                    progress: Some(bad),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation { field: "progress", .. }));
    }
}

#[tokio::test]
async fn update_members_keeps_creator() {
    let (service, _) = setup();
    let u1 = member();
    let u3 = Uuid::new_v4();

    let project = service.create(&u1, input("Alpha")).await.unwrap();

    let updated = service
        .update(
            &u1,
            project.id,
            UpdateProject {
                members: Some(vec![u3]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.members, vec![u1.id, u3]);
}

#[tokio::test]
async fn update_clears_description_on_explicit_null() {
    let (service, _) = setup();
    let u1 = member();

    let project = service
        .create(
            &u1,
            CreateProject {
                description: Some("old".to_string()),
                ..input("Alpha")
            },
        )
        .await
        .unwrap();

    let updated = service
        .update(
            &u1,
            project.id,
            UpdateProject {
                description: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(updated.description.is_none());
}

#[tokio::test]
async fn delete_is_creator_only() {
    let (service, _) = setup();
    let u1 = member();
    let u2 = member();

    let project = service
        .create(
            &u1,
            CreateProject {
                members: vec![u2.id],
                ..input("Alpha")
            },
        )
        .await
        .unwrap();

    // a member cannot delete and cannot learn the project exists from the error
    let err = service.delete(&u2, project.id).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound("project")));
    assert!(service.get(&u1, project.id).await.is_ok());

    service.delete(&u1, project.id).await.unwrap();
    let err = service.get(&u1, project.id).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound("project")));
}

#[tokio::test]
async fn list_is_scoped_filtered_and_windowed() {
    let (service, _) = setup();
    let u1 = member();
    let stranger = member();

    for i in 0..5 {
        service.create(&u1, input(&format!("Mine {i}"))).await.unwrap();
    }
    service.create(&stranger, input("Not mine")).await.unwrap();

    let page = service
        .list(&u1, ProjectFilter::default(), Some(3), Some(2))
        .await
        .unwrap();

    assert_eq!(page.total, 5);
    assert_eq!(page.pages, 3);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.page, 3);
    assert_eq!(page.limit, 2);

    // past the last page the window is empty but the totals stand
    let page = service
        .list(&u1, ProjectFilter::default(), Some(9), Some(2))
        .await
        .unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total, 5);
}

#[tokio::test]
async fn list_filters_by_status_and_search() {
    let (service, _) = setup();
    let u1 = member();

    service
        .create(
            &u1,
            CreateProject {
                status: ProjectStatus::Active,
                ..input("Website relaunch")
            },
        )
        .await
        .unwrap();
    service
        .create(
            &u1,
            CreateProject {
                description: Some("migrate the website backend".to_string()),
                ..input("Infrastructure")
            },
        )
        .await
        .unwrap();
    service.create(&u1, input("Hiring")).await.unwrap();

    // search is case-insensitive and reaches into descriptions
    let page = service
        .list(
            &u1,
            ProjectFilter {
                search: Some("WEBSITE".to_string()),
                ..Default::default()
            },
            None,
            None,
        )
        .await
        .unwrap();
    assert_eq!(page.total, 2);

    // status ANDs with search
    let page = service
        .list(
            &u1,
            ProjectFilter {
                status: Some(ProjectStatus::Active),
                search: Some("website".to_string()),
            },
            None,
            None,
        )
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].name, "Website relaunch");
}

#[tokio::test]
async fn list_orders_newest_first_with_id_tiebreak() {
    let (service, store) = setup();
    let u1 = member();

    // seed directly so creation times are distinct and controlled
    let mut old = Project::new(input("Old"), u1.id);
    old.created_at = old.created_at - Duration::hours(2);
    let mut mid = Project::new(input("Mid"), u1.id);
    mid.created_at = mid.created_at - Duration::hours(1);
    let new = Project::new(input("New"), u1.id);

    for p in [&mid, &old, &new] {
        store.insert_project(p).await.unwrap();
    }

    let page = service
        .list(&u1, ProjectFilter::default(), None, None)
        .await
        .unwrap();

    let names: Vec<&str> = page.items.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["New", "Mid", "Old"]);

    // equal timestamps fall back to ascending id
    let ts = new.created_at;
    let mut a = Project::new(input("TieA"), u1.id);
    let mut b = Project::new(input("TieB"), u1.id);
    a.created_at = ts + Duration::hours(1);
    b.created_at = ts + Duration::hours(1);
    store.insert_project(&a).await.unwrap();
    store.insert_project(&b).await.unwrap();

    let page = service
        .list(&u1, ProjectFilter::default(), None, None)
        .await
        .unwrap();

    let tie_positions: Vec<Uuid> = page.items.iter().take(2).map(|p| p.id).collect();
    let mut expected = vec![a.id, b.id];
    expected.sort();
    assert_eq!(tie_positions, expected);
}
