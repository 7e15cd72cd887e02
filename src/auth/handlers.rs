use crate::{
    auth::{
        jwt::generate_access_token,
        password::{hash_password, verify_dummy_password, verify_password},
    },
    config::Config,
    model::account::NewAccount,
    models::{LoginReqDto, LoginResponse, RegisterReq},
    store::{LeaveStore, mysql::MySqlStore},
};
use actix_web::{HttpResponse, Responder, web};
use serde_json::json;
use tracing::{debug, error, info, instrument};

/// Account provisioning, enabled with `ALLOW_REGISTRATION=true`
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterReq,
    responses(
        (status = 201, description = "Account created"),
        (status = 400, description = "Missing fields"),
        (status = 403, description = "Registration disabled"),
        (status = 409, description = "Email already registered")
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_register",
    skip(store, config, user),
    fields(email = %user.email, role = %user.role)
)]
pub async fn register(
    user: web::Json<RegisterReq>,
    store: web::Data<MySqlStore>,
    config: web::Data<Config>,
) -> impl Responder {
    if !config.allow_registration {
        return HttpResponse::Forbidden().json(json!({
            "error": "forbidden",
            "message": "Registration is disabled"
        }));
    }

    let name = user.name.trim();
    let email = user.email.trim().to_lowercase();

    if name.is_empty() || email.is_empty() || user.password.is_empty() {
        return HttpResponse::BadRequest().json(json!({
            "error": "bad_request",
            "message": "Name, email and password must not be empty"
        }));
    }

    let password_hash = match hash_password(&user.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "Failed to hash password");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let account = NewAccount {
        name: name.to_string(),
        email,
        password_hash,
        role: user.role,
        class_name: user.class_name.clone(),
        casual_balance: config.policy.default_casual_balance,
        total_working_days: config.policy.default_total_working_days,
    };

    match store.insert_account(&account).await {
        Ok(Some(id)) => {
            info!(account_id = id, "Account registered");
            HttpResponse::Created().json(json!({
                "id": id,
                "message": "Account registered successfully"
            }))
        }
        Ok(None) => HttpResponse::Conflict().json(json!({
            "error": "conflict",
            "message": "Email already registered"
        })),
        Err(e) => {
            error!(error = %e, "Failed to register account");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Exchange email, password and role for a bearer token
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid email or password")
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_login",
    skip(store, config, user),
    fields(email = %user.email, role = %user.role)
)]
pub async fn login(
    user: web::Json<LoginReqDto>,
    store: web::Data<MySqlStore>,
    config: web::Data<Config>,
) -> impl Responder {
    info!("Login request received");

    if user.email.trim().is_empty() || user.password.is_empty() {
        info!("Validation failed: empty email or password");
        return HttpResponse::BadRequest().body("Email and password required");
    }

    debug!("Fetching account");

    let account = match store
        .find_account_by_email(&user.email.trim().to_lowercase(), user.role)
        .await
    {
        Ok(Some(account)) => {
            debug!(account_id = account.id, "Account found");
            account
        }
        Ok(None) => {
            verify_dummy_password(&user.password);
            info!("Invalid credentials: account not found");
            return HttpResponse::Unauthorized().body("Invalid email or password");
        }
        Err(e) => {
            error!(error = %e, "Database error while fetching account");
            return HttpResponse::InternalServerError().finish();
        }
    };

    if let Err(e) = verify_password(&user.password, &account.password_hash) {
        info!(error = %e, "Invalid credentials: password mismatch");
        return HttpResponse::Unauthorized().body("Invalid email or password");
    }

    debug!("Password verified, issuing access token");

    let access_token =
        match generate_access_token(&account, &config.jwt_secret, config.access_token_ttl) {
            Ok(t) => t,
            Err(e) => {
                error!(error = %e, "Failed to sign access token");
                return HttpResponse::InternalServerError().finish();
            }
        };

    info!(account_id = account.id, "Login successful");

    HttpResponse::Ok().json(LoginResponse {
        id: account.id,
        name: account.name,
        role: account.role,
        class_name: account.class_name,
        access_token,
        token_type: "bearer".to_string(),
    })
}
