//! Integration tests driving the share manager end to end.

mod helpers;

mod auth_test;
mod janitor_test;
mod list_test;
mod postgres_test;
mod share_test;
