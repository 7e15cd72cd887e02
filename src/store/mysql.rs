use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, MySql, MySqlPool, Transaction};

use crate::model::account::{Account, NewAccount};
use crate::model::leave_request::{
    CalendarEntry, LeaveCategory, LeaveRequest, LeaveStatus, LeaveWithStudent, NewLeave,
};
use crate::model::role::Role;
use crate::store::{LeaveStore, LeaveTx, StoreResult};

const ACCOUNT_COLUMNS: &str = "id, name, email, password_hash, role, class_name, \
     casual_balance, total_working_days, absent_days";

const LEAVE_COLUMNS: &str = "l.id, l.student_id, l.start_date, l.end_date, l.reason, \
     l.category, l.status, l.conflict_count, l.created_at";

#[derive(FromRow)]
struct AccountRow {
    id: u64,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    class_name: Option<String>,
    casual_balance: i32,
    total_working_days: Option<i32>,
    absent_days: Option<i32>,
}

#[derive(FromRow)]
struct LeaveRow {
    id: u64,
    student_id: u64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    reason: String,
    category: String,
    status: String,
    conflict_count: i32,
    created_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct LeaveWithStudentRow {
    #[sqlx(flatten)]
    leave: LeaveRow,
    student_name: String,
    class_name: Option<String>,
}

#[derive(FromRow)]
struct CalendarRow {
    leave_id: u64,
    student_name: String,
    class_name: Option<String>,
    start_date: NaiveDate,
    end_date: NaiveDate,
    category: String,
    reason: String,
}

fn decode<T: FromStr>(value: &str) -> StoreResult<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    T::from_str(value).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

impl TryFrom<AccountRow> for Account {
    type Error = sqlx::Error;

    fn try_from(row: AccountRow) -> StoreResult<Self> {
        Ok(Account {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role: decode::<Role>(&row.role)?,
            class_name: row.class_name,
            casual_balance: row.casual_balance,
            total_working_days: row.total_working_days,
            absent_days: row.absent_days,
        })
    }
}

impl TryFrom<LeaveRow> for LeaveRequest {
    type Error = sqlx::Error;

    fn try_from(row: LeaveRow) -> StoreResult<Self> {
        Ok(LeaveRequest {
            id: row.id,
            student_id: row.student_id,
            start_date: row.start_date,
            end_date: row.end_date,
            reason: row.reason,
            category: decode::<LeaveCategory>(&row.category)?,
            status: decode::<LeaveStatus>(&row.status)?,
            conflict_count: row.conflict_count,
            created_at: row.created_at,
        })
    }
}

/// MySQL/InnoDB backed store.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

pub struct MySqlTx {
    tx: Transaction<'static, MySql>,
}

impl LeaveStore for MySqlStore {
    type Tx = MySqlTx;

    async fn begin(&self) -> StoreResult<MySqlTx> {
        Ok(MySqlTx {
            tx: self.pool.begin().await?,
        })
    }

    async fn find_account(&self, id: u64) -> StoreResult<Option<Account>> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?");
        sqlx::query_as::<_, AccountRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Account::try_from)
            .transpose()
    }

    async fn find_account_by_email(&self, email: &str, role: Role) -> StoreResult<Option<Account>> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = ? AND role = ?");
        sqlx::query_as::<_, AccountRow>(&sql)
            .bind(email)
            .bind(role.to_string())
            .fetch_optional(&self.pool)
            .await?
            .map(Account::try_from)
            .transpose()
    }

    async fn insert_account(&self, account: &NewAccount) -> StoreResult<Option<u64>> {
        let result = sqlx::query(
            r#"
            INSERT INTO accounts
                (name, email, password_hash, role, class_name, casual_balance, total_working_days, absent_days)
            VALUES (?, ?, ?, ?, ?, ?, ?, 0)
            "#,
        )
        .bind(&account.name)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.role.to_string())
        .bind(&account.class_name)
        .bind(account.casual_balance)
        .bind(account.total_working_days)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => Ok(Some(done.last_insert_id())),
            // duplicate email
            Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("23000") => {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn leaves_for_student(&self, student_id: u64) -> StoreResult<Vec<LeaveRequest>> {
        let sql = format!(
            "SELECT {LEAVE_COLUMNS} FROM leave_requests l \
             WHERE l.student_id = ? \
             ORDER BY l.created_at DESC, l.id DESC"
        );
        sqlx::query_as::<_, LeaveRow>(&sql)
            .bind(student_id)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(LeaveRequest::try_from)
            .collect()
    }

    async fn pending_for_class(&self, class_name: &str) -> StoreResult<Vec<LeaveWithStudent>> {
        let sql = format!(
            "SELECT {LEAVE_COLUMNS}, a.name AS student_name, a.class_name \
             FROM leave_requests l \
             JOIN accounts a ON a.id = l.student_id \
             WHERE l.status = ? AND a.class_name = ? \
             ORDER BY l.created_at DESC, l.id DESC"
        );
        sqlx::query_as::<_, LeaveWithStudentRow>(&sql)
            .bind(LeaveStatus::Pending.to_string())
            .bind(class_name)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(|row| {
                Ok(LeaveWithStudent {
                    leave: LeaveRequest::try_from(row.leave)?,
                    student_name: row.student_name,
                    class_name: row.class_name,
                })
            })
            .collect()
    }

    async fn calendar_for_class(&self, class_name: &str) -> StoreResult<Vec<CalendarEntry>> {
        let rows = sqlx::query_as::<_, CalendarRow>(
            r#"
            SELECT l.id AS leave_id, a.name AS student_name, a.class_name,
                   l.start_date, l.end_date, l.category, l.reason
            FROM leave_requests l
            JOIN accounts a ON a.id = l.student_id
            WHERE l.status = ? AND a.class_name = ?
            ORDER BY l.start_date ASC, l.id ASC
            "#,
        )
        .bind(LeaveStatus::Approved.to_string())
        .bind(class_name)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(CalendarEntry {
                    leave_id: row.leave_id,
                    student_name: row.student_name,
                    class_name: row.class_name,
                    start_date: row.start_date,
                    end_date: row.end_date,
                    category: decode::<LeaveCategory>(&row.category)?,
                    reason: row.reason,
                })
            })
            .collect()
    }
}

impl LeaveTx for MySqlTx {
    async fn lock_leave(&mut self, id: u64) -> StoreResult<Option<LeaveRequest>> {
        let sql = format!("SELECT {LEAVE_COLUMNS} FROM leave_requests l WHERE l.id = ? FOR UPDATE");
        sqlx::query_as::<_, LeaveRow>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?
            .map(LeaveRequest::try_from)
            .transpose()
    }

    async fn lock_account(&mut self, id: u64) -> StoreResult<Option<Account>> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ? FOR UPDATE");
        sqlx::query_as::<_, AccountRow>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?
            .map(Account::try_from)
            .transpose()
    }

    async fn insert_leave(&mut self, leave: &NewLeave) -> StoreResult<LeaveRequest> {
        let result = sqlx::query(
            r#"
            INSERT INTO leave_requests
                (student_id, start_date, end_date, reason, category, status, conflict_count)
            VALUES (?, ?, ?, ?, ?, ?, 0)
            "#,
        )
        .bind(leave.student_id)
        .bind(leave.start_date)
        .bind(leave.end_date)
        .bind(&leave.reason)
        .bind(leave.category.to_string())
        .bind(LeaveStatus::Pending.to_string())
        .execute(&mut *self.tx)
        .await?;

        self.lock_leave(result.last_insert_id())
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    async fn update_status(&mut self, leave_id: u64, status: LeaveStatus) -> StoreResult<()> {
        sqlx::query("UPDATE leave_requests SET status = ? WHERE id = ?")
            .bind(status.to_string())
            .bind(leave_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn update_balance(&mut self, account_id: u64, casual_balance: i32) -> StoreResult<()> {
        sqlx::query("UPDATE accounts SET casual_balance = ? WHERE id = ?")
            .bind(casual_balance)
            .bind(account_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn commit(self) -> StoreResult<()> {
        self.tx.commit().await
    }
}
