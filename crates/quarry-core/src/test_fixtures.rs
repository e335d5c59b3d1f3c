//! Hand-written entity-state fixture mirroring what `#[derive(EntityState)]`
//! and `#[derive(ColumnValue)]` emit, so core tests do not depend on the
//! proc-macro crate.

use crate::{
    model::{Column, TypedColumn},
    query::{Criterion, QueryBuilder},
    traits::{ColumnValue, EntityId, EntityState, RecordView},
    value::{EnumValue, MessageValue, Value, ValueType},
};

///
/// ProjectName
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
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

impl ColumnValue for ProjectName {
    const VALUE_TYPE: ValueType = ValueType::Message("ProjectName");

    fn to_value(&self) -> Value {
        Value::Message(MessageValue::new("ProjectName").with_field("value", self.value.to_value()))
    }
}

///
/// Status
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Status {
    #[default]
    Created,
    Started,
    Done,
    Cancelled,
}

impl ColumnValue for Status {
    const VALUE_TYPE: ValueType = ValueType::Enum("Status");

    fn to_value(&self) -> Value {
        let variant = match self {
            Self::Created => "Created",
            Self::Started => "Started",
            Self::Done => "Done",
            Self::Cancelled => "Cancelled",
        };

        Value::Enum(EnumValue::new("Status", variant))
    }
}

///
/// ProjectState
///

#[derive(Clone, Debug, Default)]
pub struct ProjectState {
    pub project_name: ProjectName,
    pub status: Status,
    pub days_since_started: u32,
    pub title: String,
    pub archived: bool,
}

impl ProjectState {
    pub const PROJECT_NAME: TypedColumn<Self, ProjectName> = TypedColumn::new("project_name");
    pub const STATUS: TypedColumn<Self, Status> = TypedColumn::new("status");
    pub const DAYS_SINCE_STARTED: TypedColumn<Self, u32> = TypedColumn::new("days_since_started");
    pub const TITLE: TypedColumn<Self, String> = TypedColumn::new("title");
    pub const ARCHIVED: TypedColumn<Self, bool> = TypedColumn::new("archived");
}

impl EntityState for ProjectState {
    const ENTITY_NAME: &'static str = "ProjectState";
    const COLUMNS: &'static [Column] = &[
        Self::PROJECT_NAME.column(),
        Self::STATUS.column(),
        Self::DAYS_SINCE_STARTED.column(),
        Self::TITLE.column(),
        Self::ARCHIVED.column(),
    ];
}

impl RecordView for ProjectState {
    fn value(&self, column: &str) -> Option<Value> {
        match column {
            "project_name" => Some(self.project_name.to_value()),
            "status" => Some(self.status.to_value()),
            "days_since_started" => Some(self.days_since_started.to_value()),
            "title" => Some(self.title.to_value()),
            "archived" => Some(self.archived.to_value()),
            _ => None,
        }
    }
}

///
/// ProjectStateColumns
///

pub trait ProjectStateColumns<I: EntityId> {
    fn project_name(self) -> Criterion<I, ProjectState, ProjectName>;
    fn status(self) -> Criterion<I, ProjectState, Status>;
    fn days_since_started(self) -> Criterion<I, ProjectState, u32>;
    fn title(self) -> Criterion<I, ProjectState, String>;
    fn archived(self) -> Criterion<I, ProjectState, bool>;
}

impl<I: EntityId> ProjectStateColumns<I> for QueryBuilder<I, ProjectState> {
    fn project_name(self) -> Criterion<I, ProjectState, ProjectName> {
        self.column(ProjectState::PROJECT_NAME)
    }

    fn status(self) -> Criterion<I, ProjectState, Status> {
        self.column(ProjectState::STATUS)
    }

    fn days_since_started(self) -> Criterion<I, ProjectState, u32> {
        self.column(ProjectState::DAYS_SINCE_STARTED)
    }

    fn title(self) -> Criterion<I, ProjectState, String> {
        self.column(ProjectState::TITLE)
    }

    fn archived(self) -> Criterion<I, ProjectState, bool> {
        self.column(ProjectState::ARCHIVED)
    }
}

/// Id type used across query tests.
pub type ProjectId = u64;

/// Fresh builder over the fixture shape.
pub fn project_query() -> QueryBuilder<ProjectId, ProjectState> {
    ProjectState::new_query()
}

/// Record with the given status and age; other fields default.
pub fn project(status: Status, days_since_started: u32) -> ProjectState {
    ProjectState {
        status,
        days_since_started,
        ..ProjectState::default()
    }
}
