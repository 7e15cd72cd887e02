use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub access_token_ttl: usize,
    pub allow_registration: bool,
    pub log_dir: String,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_register_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,

    pub policy: LeavePolicy,
    pub notifications: NotificationConfig,
}

/// Department-wide leave rules, fixed for the lifetime of the process.
#[derive(Debug, Clone, PartialEq)]
pub struct LeavePolicy {
    /// Casual-leave balance given to new accounts
    pub default_casual_balance: i32,
    pub total_leaves_allowed: i32,
    /// Attendance percentage a student must stay at or above
    pub attendance_threshold: f64,
    /// Used when an account has no working-day count recorded
    pub default_total_working_days: i32,
}

impl Default for LeavePolicy {
    fn default() -> Self {
        Self {
            default_casual_balance: 10,
            total_leaves_allowed: 10,
            attendance_threshold: 75.0,
            default_total_working_days: 100,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NotificationConfig {
    /// Receives "new leave request" mails
    pub faculty_email: String,
    pub max_attempts: u32,
    pub retry_delay: Duration,
    /// Without SMTP settings mails are only logged
    pub smtp: Option<SmtpConfig>,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

fn parsed<T: FromStr>(key: &str, default: &str) -> T {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .unwrap_or_else(|_| panic!("{key} must be a valid value"))
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let policy = LeavePolicy {
            default_casual_balance: parsed("DEFAULT_CASUAL_BALANCE", "10"),
            total_leaves_allowed: parsed("TOTAL_LEAVES_ALLOWED", "10"),
            attendance_threshold: parsed("ATTENDANCE_THRESHOLD", "75.0"),
            default_total_working_days: parsed("DEFAULT_TOTAL_WORKING_DAYS", "100"),
        };

        let smtp = env::var("SMTP_HOST").ok().map(|host| SmtpConfig {
            host,
            port: parsed("SMTP_PORT", "465"),
            username: env::var("SMTP_USERNAME").unwrap_or_default(),
            password: env::var("SMTP_PASSWORD").unwrap_or_default(),
            from: env::var("SMTP_FROM")
                .unwrap_or_else(|_| "Leave Manager <noreply@leave-manager.local>".to_string()),
        });

        let notifications = NotificationConfig {
            faculty_email: env::var("FACULTY_EMAIL").expect("FACULTY_EMAIL must be set"),
            max_attempts: parsed("NOTIFY_MAX_ATTEMPTS", "3"),
            retry_delay: Duration::from_millis(parsed("NOTIFY_RETRY_DELAY_MS", "500")),
            smtp,
        };

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            access_token_ttl: parsed("ACCESS_TOKEN_TTL", "3600"), // default 1 hour
            allow_registration: parsed("ALLOW_REGISTRATION", "false"),
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),

            rate_login_per_min: parsed("RATE_LOGIN_PER_MIN", "60"),
            rate_register_per_min: parsed("RATE_REGISTER_PER_MIN", "30"),
            rate_protected_per_min: parsed("RATE_PROTECTED_PER_MIN", "1000"),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),

            policy,
            notifications,
        }
    }
}
