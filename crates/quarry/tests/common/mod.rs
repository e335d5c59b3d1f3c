//! Entity-state shape shared by the integration tests, declared through the
//! derive macros exactly as downstream crates declare theirs.
#![allow(dead_code)]

use quarry::prelude::*;

///
/// ProjectName
///

#[derive(Clone, Debug, Default, Eq, PartialEq, ColumnValue)]
pub struct ProjectName {
    pub value: String,
}

impl ProjectName {
    pub fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
        }
    }
}

///
/// Status
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ColumnValue)]
pub enum Status {
    #[default]
    Created,
    Started,
    Done,
    Cancelled,
}

///
/// Days
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ColumnValue)]
#[value(ordered)]
pub struct Days(pub u32);

///
/// ProjectState
///

#[derive(Clone, Debug, Default, EntityState)]
pub struct ProjectState {
    pub project_name: ProjectName,
    pub status: Status,
    pub days_since_started: Days,
    pub archived: bool,

    #[column(name = "owner", accessor = "owned_by")]
    pub owner_handle: String,

    #[column(skip)]
    pub notes: Option<String>,
}

pub type ProjectId = u64;

pub fn project_query() -> quarry::query::QueryBuilder<ProjectId, ProjectState> {
    ProjectState::new_query()
}

pub fn project(status: Status, days: u32) -> ProjectState {
    ProjectState {
        status,
        days_since_started: Days(days),
        ..ProjectState::default()
    }
}
