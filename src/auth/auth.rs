use crate::{
    error::AppError,
    model::{account::Account, role::Role},
    models::Claims,
};
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use futures::future::{Ready, ready};

/// Identity resolved by `auth_middleware` from the bearer token.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub account_id: u64,
    pub email: String,
    pub role: Role,
    pub class_name: Option<String>,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        AuthUser {
            account_id: claims.account_id,
            email: claims.sub,
            role: claims.role,
            class_name: claims.class_name,
        }
    }
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(AppError::Unauthorized.into())),
        }
    }
}

/// Operations gated by role.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Action {
    SubmitLeave,
    ViewOwnLeaves,
    ProjectAttendance,
    ReviewPending,
    DecideLeave,
    ViewCalendar,
}

impl Action {
    pub fn required_role(&self) -> Role {
        match self {
            Action::SubmitLeave | Action::ViewOwnLeaves | Action::ProjectAttendance => {
                Role::Student
            }
            Action::ReviewPending | Action::DecideLeave | Action::ViewCalendar => Role::Faculty,
        }
    }

    fn denial(&self) -> &'static str {
        match self {
            Action::SubmitLeave => "Only students can apply for leave",
            Action::ViewOwnLeaves => "Only students have leave requests",
            Action::ProjectAttendance => "Only students have an attendance summary",
            Action::ReviewPending => "Only faculty can view pending leaves",
            Action::DecideLeave => "Only faculty can approve or reject leaves",
            Action::ViewCalendar => "Only faculty can view the leave calendar",
        }
    }
}

impl AuthUser {
    pub fn authorize(&self, action: Action) -> Result<(), AppError> {
        if self.role == action.required_role() {
            Ok(())
        } else {
            Err(AppError::forbidden(action.denial()))
        }
    }

    /// Role check plus class affiliation with the student who owns the
    /// resource.
    pub fn authorize_for(&self, action: Action, student: &Account) -> Result<(), AppError> {
        self.authorize(action)?;

        match (&self.class_name, &student.class_name) {
            (Some(mine), Some(theirs)) if mine == theirs => Ok(()),
            _ => Err(AppError::forbidden("Faculty not assigned to this class")),
        }
    }

    /// Class a faculty member reviews; faculty without one see nothing.
    pub fn class_scope(&self) -> Result<&str, AppError> {
        self.class_name
            .as_deref()
            .ok_or_else(|| AppError::forbidden("Faculty not assigned to any class"))
    }
}
