//! Storage seam for accounts and leave requests.
//!
//! Lifecycle transitions run inside a [`LeaveTx`]: rows read through
//! `lock_*` stay locked until the transaction commits or is dropped, so two
//! decisions on the same request are serialized.

#[cfg(test)]
pub mod memory;
pub mod mysql;

use crate::model::account::{Account, NewAccount};
use crate::model::leave_request::{CalendarEntry, LeaveRequest, LeaveStatus, LeaveWithStudent, NewLeave};
use crate::model::role::Role;

pub type StoreResult<T> = Result<T, sqlx::Error>;

pub trait LeaveStore {
    type Tx: LeaveTx;

    async fn begin(&self) -> StoreResult<Self::Tx>;

    async fn find_account(&self, id: u64) -> StoreResult<Option<Account>>;

    async fn find_account_by_email(&self, email: &str, role: Role) -> StoreResult<Option<Account>>;

    /// Returns `None` when the email is already registered.
    async fn insert_account(&self, account: &NewAccount) -> StoreResult<Option<u64>>;

    /// Newest first.
    async fn leaves_for_student(&self, student_id: u64) -> StoreResult<Vec<LeaveRequest>>;

    /// Pending requests of students in `class_name`, newest first.
    async fn pending_for_class(&self, class_name: &str) -> StoreResult<Vec<LeaveWithStudent>>;

    /// Approved requests of students in `class_name`, by start date.
    async fn calendar_for_class(&self, class_name: &str) -> StoreResult<Vec<CalendarEntry>>;
}

/// A unit of work. Dropping it without [`LeaveTx::commit`] discards every
/// write made through it.
pub trait LeaveTx {
    async fn lock_leave(&mut self, id: u64) -> StoreResult<Option<LeaveRequest>>;

    async fn lock_account(&mut self, id: u64) -> StoreResult<Option<Account>>;

    async fn insert_leave(&mut self, leave: &NewLeave) -> StoreResult<LeaveRequest>;

    async fn update_status(&mut self, leave_id: u64, status: LeaveStatus) -> StoreResult<()>;

    async fn update_balance(&mut self, account_id: u64, casual_balance: i32) -> StoreResult<()>;

    async fn commit(self) -> StoreResult<()>;
}
