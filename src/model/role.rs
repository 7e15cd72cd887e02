use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Student,
    Faculty,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn role_uses_stored_spelling() {
        assert_eq!(Role::Student.to_string(), "STUDENT");
        assert_eq!(Role::from_str("FACULTY").unwrap(), Role::Faculty);
        assert!(Role::from_str("admin").is_err());
    }
}
