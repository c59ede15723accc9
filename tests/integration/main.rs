//! Workspace integration tests.

mod helpers;

mod paging_test;
mod postgres_test;
mod repository_test;
mod specification_test;
