use crate::model::role::Role;

/// A student or faculty member as stored in `accounts`.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    /// Class/section; scopes faculty visibility and decision authority
    pub class_name: Option<String>,
    pub casual_balance: i32,
    pub total_working_days: Option<i32>,
    pub absent_days: Option<i32>,
}

/// Fields needed to provision an account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub class_name: Option<String>,
    pub casual_balance: i32,
    pub total_working_days: i32,
}
