//! Built-in record shapes for clients, workers and tasks.

use std::sync::LazyLock;

use serde::Serialize;

use super::{ContentCheck, Field, Schema, ValidatedRow, Violation};
use crate::types::{DisplayNumber, EntityKind, RawRow};

static CLIENT_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new(vec![
        Field::text("ClientID").non_empty(),
        Field::text("ClientName").non_empty(),
        Field::number("PriorityLevel").min(1.0).max(5.0),
        Field::text("RequestedTaskIDs"),
        Field::text("GroupTag"),
        Field::text("AttributesJSON").content(ContentCheck::Json),
    ])
});

static WORKER_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new(vec![
        Field::text("WorkerID").non_empty(),
        Field::text("WorkerName").non_empty(),
        Field::text("Skills"),
        Field::text("AvailableSlots"),
        Field::number("MaxLoadPerPhase"),
        Field::text("WorkerGroup"),
        Field::number("QualificationLevel"),
    ])
});

static TASK_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new(vec![
        Field::text("TaskID"),
        Field::text("TaskName"),
        Field::text("Category"),
        Field::number("Duration").min(1.0),
        Field::text("RequiredSkills"),
        Field::text("PreferredPhases"),
        Field::number("MaxConcurrent"),
    ])
});

/// The schema rows of `kind` are validated against.
pub fn schema_for(kind: EntityKind) -> &'static Schema {
    match kind {
        EntityKind::Client => &CLIENT_SCHEMA,
        EntityKind::Worker => &WORKER_SCHEMA,
        EntityKind::Task => &TASK_SCHEMA,
    }
}

/// Validate one raw row as a record of `kind`.
///
/// Either every constraint holds and a typed [`Record`] comes back, or the row is rejected with
/// all of its violations.
pub fn validate(kind: EntityKind, row: &RawRow) -> Result<Record, Vec<Violation>> {
    let v = schema_for(kind).validate_row(row)?;
    Ok(match kind {
        EntityKind::Client => Record::Client(ClientRecord::from_validated(&v)),
        EntityKind::Worker => Record::Worker(WorkerRecord::from_validated(&v)),
        EntityKind::Task => Record::Task(TaskRecord::from_validated(&v)),
    })
}

/// A validated client row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientRecord {
    #[serde(rename = "ClientID")]
    pub client_id: String,
    #[serde(rename = "ClientName")]
    pub client_name: String,
    #[serde(rename = "PriorityLevel")]
    pub priority_level: f64,
    /// Free-form delimited task id list; not parsed further.
    #[serde(rename = "RequestedTaskIDs")]
    pub requested_task_ids: String,
    #[serde(rename = "GroupTag")]
    pub group_tag: String,
    /// Raw JSON text, known to parse.
    #[serde(rename = "AttributesJSON")]
    pub attributes_json: String,
}

impl ClientRecord {
    fn from_validated(v: &ValidatedRow) -> Self {
        Self {
            client_id: v.text("ClientID"),
            client_name: v.text("ClientName"),
            priority_level: v.number("PriorityLevel"),
            requested_task_ids: v.text("RequestedTaskIDs"),
            group_tag: v.text("GroupTag"),
            attributes_json: v.text("AttributesJSON"),
        }
    }
}

/// A validated worker row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkerRecord {
    #[serde(rename = "WorkerID")]
    pub worker_id: String,
    #[serde(rename = "WorkerName")]
    pub worker_name: String,
    #[serde(rename = "Skills")]
    pub skills: String,
    #[serde(rename = "AvailableSlots")]
    pub available_slots: String,
    #[serde(rename = "MaxLoadPerPhase")]
    pub max_load_per_phase: f64,
    #[serde(rename = "WorkerGroup")]
    pub worker_group: String,
    #[serde(rename = "QualificationLevel")]
    pub qualification_level: f64,
}

impl WorkerRecord {
    fn from_validated(v: &ValidatedRow) -> Self {
        Self {
            worker_id: v.text("WorkerID"),
            worker_name: v.text("WorkerName"),
            skills: v.text("Skills"),
            available_slots: v.text("AvailableSlots"),
            max_load_per_phase: v.number("MaxLoadPerPhase"),
            worker_group: v.text("WorkerGroup"),
            qualification_level: v.number("QualificationLevel"),
        }
    }
}

/// A validated task row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskRecord {
    #[serde(rename = "TaskID")]
    pub task_id: String,
    #[serde(rename = "TaskName")]
    pub task_name: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Duration")]
    pub duration: f64,
    #[serde(rename = "RequiredSkills")]
    pub required_skills: String,
    #[serde(rename = "PreferredPhases")]
    pub preferred_phases: String,
    #[serde(rename = "MaxConcurrent")]
    pub max_concurrent: f64,
}

impl TaskRecord {
    fn from_validated(v: &ValidatedRow) -> Self {
        Self {
            task_id: v.text("TaskID"),
            task_name: v.text("TaskName"),
            category: v.text("Category"),
            duration: v.number("Duration"),
            required_skills: v.text("RequiredSkills"),
            preferred_phases: v.text("PreferredPhases"),
            max_concurrent: v.number("MaxConcurrent"),
        }
    }
}

/// A validated row of any kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Client(ClientRecord),
    Worker(WorkerRecord),
    Task(TaskRecord),
}

impl Record {
    /// Kind of this record.
    pub fn kind(&self) -> EntityKind {
        match self {
            Record::Client(_) => EntityKind::Client,
            Record::Worker(_) => EntityKind::Worker,
            Record::Task(_) => EntityKind::Task,
        }
    }

    /// Display strings in schema field order, one per column of a tabular view.
    pub fn cells(&self) -> Vec<String> {
        let num = |n: f64| DisplayNumber(n).to_string();
        match self {
            Record::Client(r) => vec![
                r.client_id.clone(),
                r.client_name.clone(),
                num(r.priority_level),
                r.requested_task_ids.clone(),
                r.group_tag.clone(),
                r.attributes_json.clone(),
            ],
            Record::Worker(r) => vec![
                r.worker_id.clone(),
                r.worker_name.clone(),
                r.skills.clone(),
                r.available_slots.clone(),
                num(r.max_load_per_phase),
                r.worker_group.clone(),
                num(r.qualification_level),
            ],
            Record::Task(r) => vec![
                r.task_id.clone(),
                r.task_name.clone(),
                r.category.clone(),
                num(r.duration),
                r.required_skills.clone(),
                r.preferred_phases.clone(),
                num(r.max_concurrent),
            ],
        }
    }

    /// The client record, if this is one.
    pub fn as_client(&self) -> Option<&ClientRecord> {
        match self {
            Record::Client(r) => Some(r),
            _ => None,
        }
    }

    /// The worker record, if this is one.
    pub fn as_worker(&self) -> Option<&WorkerRecord> {
        match self {
            Record::Worker(r) => Some(r),
            _ => None,
        }
    }

    /// The task record, if this is one.
    pub fn as_task(&self) -> Option<&TaskRecord> {
        match self {
            Record::Task(r) => Some(r),
            _ => None,
        }
    }
}
