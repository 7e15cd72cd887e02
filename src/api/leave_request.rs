use crate::auth::auth::AuthUser;
use crate::leave::AppLeaveManager;
use crate::leave::lifecycle::SubmitLeave;
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LeaveAction {
    /// Optional message passed on to the student
    #[schema(example = "Get well soon")]
    #[serde(default)]
    pub comment: Option<String>,
}

/* =========================
Submit leave (Student)
========================= */
#[utoipa::path(
    post,
    path = "/api/leaves",
    request_body(content = SubmitLeave, content_type = "application/json"),
    responses(
        (status = 201, description = "Leave request submitted", body = crate::leave::lifecycle::SubmissionResult),
        (status = 400, description = "End date before start date"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only students can apply")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn submit_leave(
    auth: AuthUser,
    manager: web::Data<AppLeaveManager>,
    payload: web::Json<SubmitLeave>,
) -> actix_web::Result<impl Responder> {
    let result = manager.submit(&auth, payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(result))
}

/// Student's own requests, newest first
#[utoipa::path(
    get,
    path = "/api/leaves/me",
    responses(
        (status = 200, description = "Own leave requests", body = [crate::model::leave_request::LeaveRequest]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn my_leaves(
    auth: AuthUser,
    manager: web::Data<AppLeaveManager>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(manager.my_leaves(&auth).await?))
}

/// Pending requests of the faculty's class, newest first
#[utoipa::path(
    get,
    path = "/api/leaves/pending",
    responses(
        (status = 200, description = "Pending leave requests", body = [crate::model::leave_request::LeaveWithStudent]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn pending_leaves(
    auth: AuthUser,
    manager: web::Data<AppLeaveManager>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(manager.pending_for_class(&auth).await?))
}

/// Approved requests of the faculty's class by start date
#[utoipa::path(
    get,
    path = "/api/leaves/calendar",
    responses(
        (status = 200, description = "Approved leave calendar", body = [crate::model::leave_request::CalendarEntry]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn leave_calendar(
    auth: AuthUser,
    manager: web::Data<AppLeaveManager>,
) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(manager.calendar(&auth).await?))
}

/* =========================
Approve leave (Faculty)
========================= */
#[utoipa::path(
    put,
    path = "/api/leaves/{leave_id}/approve",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to approve")
    ),
    request_body = LeaveAction,
    responses(
        (status = 200, description = "Leave approved", body = crate::leave::lifecycle::DecisionResult),
        (status = 400, description = "Insufficient leave balance"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not faculty of the student's class"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Leave request already processed")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: AuthUser,
    manager: web::Data<AppLeaveManager>,
    path: web::Path<u64>,
    action: web::Json<LeaveAction>,
) -> actix_web::Result<impl Responder> {
    let decision = manager
        .approve(&auth, path.into_inner(), action.into_inner().comment)
        .await?;
    Ok(HttpResponse::Ok().json(decision))
}

/* =========================
Reject leave (Faculty)
========================= */
#[utoipa::path(
    put,
    path = "/api/leaves/{leave_id}/reject",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to reject")
    ),
    request_body = LeaveAction,
    responses(
        (status = 200, description = "Leave rejected", body = crate::leave::lifecycle::DecisionResult),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not faculty of the student's class"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Leave request already processed")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn reject_leave(
    auth: AuthUser,
    manager: web::Data<AppLeaveManager>,
    path: web::Path<u64>,
    action: web::Json<LeaveAction>,
) -> actix_web::Result<impl Responder> {
    let decision = manager
        .reject(&auth, path.into_inner(), action.into_inner().comment)
        .await?;
    Ok(HttpResponse::Ok().json(decision))
}
