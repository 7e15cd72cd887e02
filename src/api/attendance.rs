use crate::auth::auth::AuthUser;
use crate::leave::AppLeaveManager;
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct ProjectionQuery {
    /// Length of the leave being considered, in days
    #[schema(example = 3)]
    pub requested_days: u32,
}

/// What a leave of `requested_days` would do to attendance and balance
#[utoipa::path(
    get,
    path = "/api/leaves/summary",
    params(ProjectionQuery),
    responses(
        (status = 200, description = "Attendance projection", body = crate::leave::projection::AttendanceProjection),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Student not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn leave_summary(
    auth: AuthUser,
    manager: web::Data<AppLeaveManager>,
    query: web::Query<ProjectionQuery>,
) -> actix_web::Result<impl Responder> {
    let projection = manager.project(&auth, query.requested_days).await?;
    Ok(HttpResponse::Ok().json(projection))
}
