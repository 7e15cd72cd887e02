use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::model::account::{Account, NewAccount};
use crate::model::leave_request::{
    CalendarEntry, LeaveRequest, LeaveStatus, LeaveWithStudent, NewLeave,
};
use crate::model::role::Role;
use crate::store::{LeaveStore, LeaveTx, StoreResult};

#[derive(Default, Clone)]
struct MemoryState {
    accounts: BTreeMap<u64, Account>,
    leaves: BTreeMap<u64, LeaveRequest>,
    next_account_id: u64,
    next_leave_id: u64,
}

/// In-process store for tests. A transaction holds the whole state lock
/// and works on a staged copy.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

pub struct MemoryTx {
    guard: OwnedMutexGuard<MemoryState>,
    staged: MemoryState,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn leave(&self, id: u64) -> Option<LeaveRequest> {
        self.state.lock().await.leaves.get(&id).cloned()
    }

    pub async fn leave_count(&self) -> usize {
        self.state.lock().await.leaves.len()
    }
}

impl LeaveStore for MemoryStore {
    type Tx = MemoryTx;

    async fn begin(&self) -> StoreResult<MemoryTx> {
        let guard = self.state.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(MemoryTx { guard, staged })
    }

    async fn find_account(&self, id: u64) -> StoreResult<Option<Account>> {
        Ok(self.state.lock().await.accounts.get(&id).cloned())
    }

    async fn find_account_by_email(&self, email: &str, role: Role) -> StoreResult<Option<Account>> {
        let state = self.state.lock().await;
        Ok(state
            .accounts
            .values()
            .find(|a| a.email == email && a.role == role)
            .cloned())
    }

    async fn insert_account(&self, account: &NewAccount) -> StoreResult<Option<u64>> {
        let mut state = self.state.lock().await;
        if state.accounts.values().any(|a| a.email == account.email) {
            return Ok(None);
        }
        state.next_account_id += 1;
        let id = state.next_account_id;
        state.accounts.insert(
            id,
            Account {
                id,
                name: account.name.clone(),
                email: account.email.clone(),
                password_hash: account.password_hash.clone(),
                role: account.role,
                class_name: account.class_name.clone(),
                casual_balance: account.casual_balance,
                total_working_days: Some(account.total_working_days),
                absent_days: Some(0),
            },
        );
        Ok(Some(id))
    }

    async fn leaves_for_student(&self, student_id: u64) -> StoreResult<Vec<LeaveRequest>> {
        let state = self.state.lock().await;
        Ok(state
            .leaves
            .values()
            .rev()
            .filter(|l| l.student_id == student_id)
            .cloned()
            .collect())
    }

    async fn pending_for_class(&self, class_name: &str) -> StoreResult<Vec<LeaveWithStudent>> {
        let state = self.state.lock().await;
        Ok(state
            .leaves
            .values()
            .rev()
            .filter(|l| l.status == LeaveStatus::Pending)
            .filter_map(|l| {
                let student = state.accounts.get(&l.student_id)?;
                (student.class_name.as_deref() == Some(class_name)).then(|| LeaveWithStudent {
                    leave: l.clone(),
                    student_name: student.name.clone(),
                    class_name: student.class_name.clone(),
                })
            })
            .collect())
    }

    async fn calendar_for_class(&self, class_name: &str) -> StoreResult<Vec<CalendarEntry>> {
        let state = self.state.lock().await;
        let mut entries: Vec<CalendarEntry> = state
            .leaves
            .values()
            .filter(|l| l.status == LeaveStatus::Approved)
            .filter_map(|l| {
                let student = state.accounts.get(&l.student_id)?;
                (student.class_name.as_deref() == Some(class_name)).then(|| CalendarEntry {
                    leave_id: l.id,
                    student_name: student.name.clone(),
                    class_name: student.class_name.clone(),
                    start_date: l.start_date,
                    end_date: l.end_date,
                    category: l.category,
                    reason: l.reason.clone(),
                })
            })
            .collect();
        entries.sort_by_key(|e| (e.start_date, e.leave_id));
        Ok(entries)
    }
}

impl LeaveTx for MemoryTx {
    async fn lock_leave(&mut self, id: u64) -> StoreResult<Option<LeaveRequest>> {
        Ok(self.staged.leaves.get(&id).cloned())
    }

    async fn lock_account(&mut self, id: u64) -> StoreResult<Option<Account>> {
        Ok(self.staged.accounts.get(&id).cloned())
    }

    async fn insert_leave(&mut self, leave: &NewLeave) -> StoreResult<LeaveRequest> {
        self.staged.next_leave_id += 1;
        let created = LeaveRequest {
            id: self.staged.next_leave_id,
            student_id: leave.student_id,
            start_date: leave.start_date,
            end_date: leave.end_date,
            reason: leave.reason.clone(),
            category: leave.category,
            status: LeaveStatus::Pending,
            conflict_count: 0,
            created_at: Utc::now(),
        };
        self.staged.leaves.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_status(&mut self, leave_id: u64, status: LeaveStatus) -> StoreResult<()> {
        let leave = self
            .staged
            .leaves
            .get_mut(&leave_id)
            .ok_or(sqlx::Error::RowNotFound)?;
        leave.status = status;
        Ok(())
    }

    async fn update_balance(&mut self, account_id: u64, casual_balance: i32) -> StoreResult<()> {
        let account = self
            .staged
            .accounts
            .get_mut(&account_id)
            .ok_or(sqlx::Error::RowNotFound)?;
        account.casual_balance = casual_balance;
        Ok(())
    }

    async fn commit(mut self) -> StoreResult<()> {
        *self.guard = self.staged;
        Ok(())
    }
}
