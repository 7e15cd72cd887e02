use crate::api::attendance::ProjectionQuery;
use crate::api::leave_request::LeaveAction;
use crate::leave::lifecycle::{DecisionResult, SubmissionResult, SubmitLeave};
use crate::leave::projection::AttendanceProjection;
use crate::model::leave_request::{
    CalendarEntry, LeaveCategory, LeaveRequest, LeaveStatus, LeaveWithStudent,
};
use crate::model::role::Role;
use crate::models::{LoginReqDto, LoginResponse, RegisterReq};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leave Manager API",
        version = "1.0.0",
        description = r#"
## Academic Leave Manager

Students apply for leave, faculty approve or reject requests for their own
class, and students can preview how a leave would affect their attendance.

### Security
Every `/api` endpoint requires a **JWT Bearer** token from `/auth/login`.
Students submit and track their own requests; faculty act only on students
of their class.
"#,
    ),
    paths(
        crate::api::leave_request::submit_leave,
        crate::api::leave_request::my_leaves,
        crate::api::leave_request::pending_leaves,
        crate::api::leave_request::leave_calendar,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,

        crate::api::attendance::leave_summary,

        crate::auth::handlers::login,
        crate::auth::handlers::register
    ),
    components(
        schemas(
            SubmitLeave,
            SubmissionResult,
            DecisionResult,
            LeaveAction,
            LeaveRequest,
            LeaveWithStudent,
            CalendarEntry,
            LeaveStatus,
            LeaveCategory,
            AttendanceProjection,
            ProjectionQuery,
            LoginReqDto,
            LoginResponse,
            RegisterReq,
            Role
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Leave", description = "Leave lifecycle APIs"),
        (name = "Attendance", description = "Attendance projection APIs"),
        (name = "Auth", description = "Login and account provisioning"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
