/// Lifecycle services
///
/// The services own the business rules: input bounds, visibility and
/// mutation gating via the policy predicates, membership invariants, and
/// the pagination envelope. Each service holds a dependency-injected
/// store handle and nothing else, so the suites exercise them against the
/// in-memory store.
///
/// - `projects`: project CRUD plus membership add/remove
/// - `tasks`: task CRUD plus status/priority statistics

pub mod projects;
pub mod tasks;
