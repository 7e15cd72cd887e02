use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    /// Approved and rejected requests accept no further transition.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, LeaveStatus::Pending)
    }
}

/// Tag assigned to a request from its free-text reason.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveCategory {
    Medical,
    Personal,
    Academic,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": 1,
    "student_id": 7,
    "start_date": "2026-01-05",
    "end_date": "2026-01-07",
    "reason": "fever and doctor visit",
    "category": "MEDICAL",
    "status": "PENDING",
    "conflict_count": 0,
    "created_at": "2026-01-01T09:00:00Z"
}))]
pub struct LeaveRequest {
    pub id: u64,
    pub student_id: u64,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-07", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    pub reason: String,
    pub category: LeaveCategory,
    pub status: LeaveStatus,
    /// Reserved, always 0
    pub conflict_count: i32,
    #[schema(example = "2026-01-01T09:00:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
}

/// A request about to be inserted in `PENDING` state.
#[derive(Debug, Clone)]
pub struct NewLeave {
    pub student_id: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub category: LeaveCategory,
}

/// Pending request joined with its requester, for the faculty review queue.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeaveWithStudent {
    #[serde(flatten)]
    pub leave: LeaveRequest,
    pub student_name: String,
    pub class_name: Option<String>,
}

/// Approved leave as shown on the class calendar.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CalendarEntry {
    pub leave_id: u64,
    pub student_name: String,
    pub class_name: Option<String>,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-07", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    pub category: LeaveCategory,
    pub reason: String,
}
