use serde::Serialize;
use utoipa::ToSchema;

use crate::config::LeavePolicy;
use crate::model::account::Account;

/// How a hypothetical leave of `requested_days` would change a student's
/// attendance and casual-leave standing.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AttendanceProjection {
    pub total_leaves_allowed: i32,
    pub used_leaves: i32,
    pub remaining_leaves: i32,

    pub total_working_days: i32,
    pub current_absent_days: i32,
    pub current_attendance_percentage: f64,

    pub projected_absent_days: i64,
    pub projected_attendance_percentage: f64,

    pub will_drop_below_threshold: bool,
    pub threshold: f64,

    pub projected_used_leaves: i64,
    pub projected_remaining_leaves: i64,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

fn attendance_pct(total_working: i32, absent: i64) -> f64 {
    let total = f64::from(total_working);
    (total - absent as f64) / total * 100.0
}

/// Read-only; safe to call for any day count, including more days than
/// the remaining balance.
pub fn project_attendance(
    account: &Account,
    requested_days: u32,
    policy: &LeavePolicy,
) -> AttendanceProjection {
    let total_working = match account.total_working_days {
        Some(days) if days > 0 => days,
        _ => policy.default_total_working_days,
    };
    let absent = account.absent_days.unwrap_or(0);
    let remaining = account.casual_balance;
    let requested = i64::from(requested_days);

    let current_pct = attendance_pct(total_working, i64::from(absent));
    let projected_absent = i64::from(absent) + requested;
    let projected_pct = attendance_pct(total_working, projected_absent);

    let projected_remaining = (i64::from(remaining) - requested).max(0);

    AttendanceProjection {
        total_leaves_allowed: policy.total_leaves_allowed,
        used_leaves: policy.total_leaves_allowed - remaining,
        remaining_leaves: remaining,
        total_working_days: total_working,
        current_absent_days: absent,
        current_attendance_percentage: round1(current_pct.max(0.0)),
        projected_absent_days: projected_absent,
        projected_attendance_percentage: round1(projected_pct.max(0.0)),
        will_drop_below_threshold: projected_pct < policy.attendance_threshold,
        threshold: policy.attendance_threshold,
        projected_used_leaves: i64::from(policy.total_leaves_allowed) - projected_remaining,
        projected_remaining_leaves: projected_remaining,
    }
}
