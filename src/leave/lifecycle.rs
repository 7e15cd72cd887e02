//! Leave request state machine.
//!
//! ```text
//!   submit ──► PENDING ──approve──► APPROVED
//!                 │
//!                 └────reject────► REJECTED
//! ```
//!
//! Every transition runs in one store transaction: the request and the
//! owning student's account are row-locked before any check, so a second
//! concurrent decision sees the terminal status and fails with
//! `InvalidState` instead of deducting twice. Notifications are queued
//! only after commit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::auth::auth::{Action, AuthUser};
use crate::config::LeavePolicy;
use crate::error::AppError;
use crate::leave::classifier::classify_reason;
use crate::leave::day_span::inclusive_days;
use crate::leave::projection::{AttendanceProjection, project_attendance};
use crate::model::leave_request::{
    CalendarEntry, LeaveRequest, LeaveStatus, LeaveWithStudent, NewLeave,
};
use crate::notify::{Notification, Notifier};
use crate::store::{LeaveStore, LeaveTx};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SubmitLeave {
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-07", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "fever and doctor visit")]
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubmissionResult {
    pub leave: LeaveRequest,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DecisionResult {
    pub leave: LeaveRequest,
    /// Days deducted from the student's balance; 0 on rejection
    pub days: i64,
    pub remaining_balance: i32,
}

pub struct LeaveManager<S> {
    store: S,
    policy: LeavePolicy,
    notifier: Notifier,
    faculty_email: String,
}

impl<S: LeaveStore> LeaveManager<S> {
    pub fn new(store: S, policy: LeavePolicy, notifier: Notifier, faculty_email: String) -> Self {
        Self {
            store,
            policy,
            notifier,
            faculty_email,
        }
    }

    #[instrument(skip(self, actor, request), fields(student_id = actor.account_id))]
    pub async fn submit(
        &self,
        actor: &AuthUser,
        request: SubmitLeave,
    ) -> Result<SubmissionResult, AppError> {
        actor.authorize(Action::SubmitLeave)?;

        if request.end_date < request.start_date {
            return Err(AppError::InvalidDateRange);
        }

        let category = classify_reason(&request.reason);

        let mut tx = self.store.begin().await?;
        let student = tx
            .lock_account(actor.account_id)
            .await?
            .ok_or_else(|| AppError::not_found("Student not found"))?;

        let leave = tx
            .insert_leave(&NewLeave {
                student_id: student.id,
                start_date: request.start_date,
                end_date: request.end_date,
                reason: request.reason,
                category,
            })
            .await?;
        tx.commit().await?;

        info!(leave_id = leave.id, %category, "Leave request submitted");

        self.notifier.notify(Notification::Submitted {
            recipient: self.faculty_email.clone(),
            student_name: student.name,
            class_name: student.class_name,
            start_date: leave.start_date,
            end_date: leave.end_date,
            reason: leave.reason.clone(),
            category,
        });

        Ok(SubmissionResult { leave })
    }

    pub async fn approve(
        &self,
        actor: &AuthUser,
        leave_id: u64,
        comment: Option<String>,
    ) -> Result<DecisionResult, AppError> {
        self.decide(actor, leave_id, LeaveStatus::Approved, comment)
            .await
    }

    pub async fn reject(
        &self,
        actor: &AuthUser,
        leave_id: u64,
        comment: Option<String>,
    ) -> Result<DecisionResult, AppError> {
        self.decide(actor, leave_id, LeaveStatus::Rejected, comment)
            .await
    }

    #[instrument(skip(self, actor, comment), fields(faculty_id = actor.account_id))]
    async fn decide(
        &self,
        actor: &AuthUser,
        leave_id: u64,
        outcome: LeaveStatus,
        comment: Option<String>,
    ) -> Result<DecisionResult, AppError> {
        actor.authorize(Action::DecideLeave)?;

        let mut tx = self.store.begin().await?;

        let mut leave = tx
            .lock_leave(leave_id)
            .await?
            .ok_or_else(|| AppError::not_found("Leave not found"))?;
        let student = tx
            .lock_account(leave.student_id)
            .await?
            .ok_or_else(|| AppError::not_found("Student not found"))?;

        actor.authorize_for(Action::DecideLeave, &student)?;

        if leave.status.is_terminal() {
            return Err(AppError::InvalidState {
                leave_id,
                status: leave.status,
            });
        }

        let (days, remaining_balance) = match outcome {
            LeaveStatus::Approved => {
                let days = inclusive_days(leave.start_date, leave.end_date);
                if i64::from(student.casual_balance) < days {
                    return Err(AppError::InsufficientBalance {
                        balance: student.casual_balance,
                        required: days,
                    });
                }
                // days <= balance, so it fits in i32
                let remaining = student.casual_balance - days as i32;
                tx.update_balance(student.id, remaining).await?;
                (days, remaining)
            }
            _ => (0, student.casual_balance),
        };

        tx.update_status(leave.id, outcome).await?;
        tx.commit().await?;
        leave.status = outcome;

        info!(leave_id, status = %outcome, days, remaining_balance, "Leave request decided");

        self.notifier.notify(Notification::Decided {
            recipient: student.email,
            student_name: student.name,
            start_date: leave.start_date,
            end_date: leave.end_date,
            status: outcome,
            comment,
        });

        Ok(DecisionResult {
            leave,
            days,
            remaining_balance,
        })
    }

    pub async fn my_leaves(&self, actor: &AuthUser) -> Result<Vec<LeaveRequest>, AppError> {
        actor.authorize(Action::ViewOwnLeaves)?;
        Ok(self.store.leaves_for_student(actor.account_id).await?)
    }

    pub async fn pending_for_class(
        &self,
        actor: &AuthUser,
    ) -> Result<Vec<LeaveWithStudent>, AppError> {
        actor.authorize(Action::ReviewPending)?;
        Ok(self.store.pending_for_class(actor.class_scope()?).await?)
    }

    pub async fn calendar(&self, actor: &AuthUser) -> Result<Vec<CalendarEntry>, AppError> {
        actor.authorize(Action::ViewCalendar)?;
        Ok(self.store.calendar_for_class(actor.class_scope()?).await?)
    }

    pub async fn project(
        &self,
        actor: &AuthUser,
        requested_days: u32,
    ) -> Result<AttendanceProjection, AppError> {
        actor.authorize(Action::ProjectAttendance)?;
        let account = self
            .store
            .find_account(actor.account_id)
            .await?
            .ok_or_else(|| AppError::not_found("Student not found"))?;
        Ok(project_attendance(&account, requested_days, &self.policy))
    }
}
