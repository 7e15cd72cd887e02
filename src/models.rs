use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::role::Role;

#[derive(Deserialize, ToSchema)]
pub struct LoginReqDto {
    #[schema(example = "asha@college.edu")]
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub id: u64,
    pub name: String,
    pub role: Role,
    pub class_name: Option<String>,
    pub access_token: String,
    #[schema(example = "bearer")]
    pub token_type: String,
}

#[derive(Deserialize, ToSchema)]
pub struct RegisterReq {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[schema(example = "CS-A")]
    pub class_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub account_id: u64,
    /// account email
    pub sub: String,
    pub role: Role,
    pub class_name: Option<String>,
    pub exp: usize,
    pub jti: String,
}
