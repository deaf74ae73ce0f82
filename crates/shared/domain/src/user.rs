//! User domain entity and related types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Stored credential of a user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    /// Role tag as registered with the identity authority
    pub role: String,
    pub created_at: NaiveDate,
    /// Soft delete flag
    pub deleted: bool,
}

impl Credential {
    /// Check if the account is active (not soft deleted)
    pub fn is_active(&self) -> bool {
        !self.deleted
    }
}

/// User projection returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ResponseUser {
    /// User identifier
    #[cfg_attr(feature = "openapi", schema(example = 1))]
    pub id: i32,
    /// User email address
    #[cfg_attr(feature = "openapi", schema(example = "test@yandex.ru"))]
    pub email: String,
    /// Creation date (YYYYMMDD)
    #[serde(with = "compact_date")]
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "20220311"))]
    pub created_at: NaiveDate,
    /// User role
    #[cfg_attr(feature = "openapi", schema(example = "Courier"))]
    pub role: String,
}

impl From<&Credential> for ResponseUser {
    fn from(credential: &Credential) -> Self {
        Self {
            id: credential.id,
            email: credential.email.clone(),
            created_at: credential.created_at,
            role: credential.role.clone(),
        }
    }
}

/// One page of users plus the total number of pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPage {
    pub users: Vec<ResponseUser>,
    pub pages: u64,
}

/// Access/refresh token pair issued by the identity authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Tokens issued for an authenticated or freshly registered user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: i32,
    pub tokens: TokenPair,
}

/// Caller identity resolved from a bearer token. Lives for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub user_id: i32,
    pub role: String,
    /// Comma-separated permission names
    pub permissions: String,
}

/// A password restore in progress.
#[derive(Clone)]
pub struct RestoreRequest {
    pub email: String,
    pub generated_password: String,
}

impl std::fmt::Debug for RestoreRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestoreRequest")
            .field("email", &self.email)
            .field("generated_password", &"[REDACTED]")
            .finish()
    }
}

/// Query-shaping filters for user listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFilters {
    pub show_deleted: bool,
    pub filter_data: bool,
    pub start_time: Option<NaiveDate>,
    pub end_time: Option<NaiveDate>,
    pub role: String,
}

/// The single filter a listing applies, in precedence order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    Role(String),
    CreatedBetween { start: NaiveDate, end: NaiveDate },
    Unfiltered,
}

impl RequestFilters {
    /// Resolve which filter applies: role, then creation date range, then none.
    ///
    /// An inverted date range is corrected by moving the end to the start.
    pub fn selection(&self) -> DomainResult<UserFilter> {
        if !self.role.is_empty() {
            return Ok(UserFilter::Role(self.role.clone()));
        }

        if !self.filter_data {
            return Ok(UserFilter::Unfiltered);
        }

        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => Ok(UserFilter::CreatedBetween {
                start,
                end: end.max(start),
            }),
            _ => Err(DomainError::validation(
                "start_time and end_time are required when filter_data is set",
            )),
        }
    }
}

/// Serde helpers for YYYYMMDD dates.
pub mod compact_date {
    use chrono::NaiveDate;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use crate::constants::DATE_LAYOUT;

    pub fn parse(value: &str) -> Result<NaiveDate, chrono::ParseError> {
        NaiveDate::parse_from_str(value, DATE_LAYOUT)
    }

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(DATE_LAYOUT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(|e| D::Error::custom(format!("invalid date '{}': {}", raw, e)))
    }

    /// Optional variant; an empty string counts as absent.
    pub mod option {
        use super::*;

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDate>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) if !raw.is_empty() => parse(&raw)
                    .map(Some)
                    .map_err(|e| D::Error::custom(format!("invalid date '{}': {}", raw, e))),
                _ => Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_role_filter_wins_over_date_filter() {
        let filters = RequestFilters {
            role: "Courier".to_string(),
            filter_data: true,
            start_time: Some(date(2022, 3, 1)),
            end_time: Some(date(2022, 3, 31)),
            ..Default::default()
        };
        assert_eq!(
            filters.selection().unwrap(),
            UserFilter::Role("Courier".to_string())
        );
    }

    #[test]
    fn test_inverted_range_is_corrected() {
        let filters = RequestFilters {
            filter_data: true,
            start_time: Some(date(2022, 3, 11)),
            end_time: Some(date(2022, 3, 1)),
            ..Default::default()
        };
        assert_eq!(
            filters.selection().unwrap(),
            UserFilter::CreatedBetween {
                start: date(2022, 3, 11),
                end: date(2022, 3, 11),
            }
        );
    }

    #[test]
    fn test_date_filter_requires_both_bounds() {
        let filters = RequestFilters {
            filter_data: true,
            start_time: Some(date(2022, 3, 11)),
            ..Default::default()
        };
        assert!(filters.selection().is_err());
    }

    #[test]
    fn test_dates_ignored_without_filter_data() {
        let filters = RequestFilters {
            start_time: Some(date(2022, 3, 11)),
            ..Default::default()
        };
        assert_eq!(filters.selection().unwrap(), UserFilter::Unfiltered);
    }

    #[test]
    fn test_response_user_date_format() {
        let user = ResponseUser {
            id: 1,
            email: "test@yandex.ru".to_string(),
            created_at: date(2022, 3, 11),
            role: "Courier".to_string(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["created_at"], "20220311");

        let back: ResponseUser = serde_json::from_value(json).unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn test_credential_projection() {
        let credential = Credential {
            id: 4,
            email: "courier@yandex.ru".to_string(),
            password_hash: "hash".to_string(),
            role: "Courier".to_string(),
            created_at: date(2022, 3, 11),
            deleted: false,
        };
        let projected = ResponseUser::from(&credential);
        assert_eq!(projected.id, 4);
        assert_eq!(projected.role, "Courier");
        assert!(credential.is_active());
    }
}
