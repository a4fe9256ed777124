/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: health check endpoint
/// - `auth`: registration, login, and profile endpoints
/// - `projects`: project CRUD and membership endpoints
/// - `tasks`: task CRUD and statistics endpoints

pub mod auth;
pub mod health;
pub mod projects;
pub mod tasks;
