//! Member records and the projections computed from them

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::{self, LeapDayPolicy};
use crate::error::BirthdayError;

// ============================================================================
// Identity
// ============================================================================

/// Opaque row identifier assigned by the member store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub String);

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MemberId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

// ============================================================================
// Member record
// ============================================================================

/// A member row as the store returns it, dates still unparsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMemberRecord {
    pub id: String,
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    pub date_of_birth: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub profile_picture_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// A validated member. Read-only to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub id: MemberId,
    pub full_name: String,
    pub gender: Option<String>,
    /// Historical date of birth, never adjusted for leap years.
    pub date_of_birth: NaiveDate,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub profile_picture_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<RawMemberRecord> for MemberRecord {
    type Error = BirthdayError;

    fn try_from(raw: RawMemberRecord) -> Result<Self, Self::Error> {
        let date_of_birth = calendar::parse_date(&raw.date_of_birth)?;
        let created_at = calendar::parse_timestamp(&raw.created_at)?;
        let updated_at = calendar::parse_timestamp(&raw.updated_at)?;

        Ok(Self {
            id: MemberId(raw.id),
            full_name: raw.full_name,
            gender: non_empty(raw.gender),
            date_of_birth,
            phone: raw.phone,
            email: non_empty(raw.email),
            address: non_empty(raw.address),
            profile_picture_url: non_empty(raw.profile_picture_url),
            created_at,
            updated_at,
        })
    }
}

impl From<&MemberRecord> for RawMemberRecord {
    fn from(member: &MemberRecord) -> Self {
        Self {
            id: member.id.0.clone(),
            full_name: member.full_name.clone(),
            gender: member.gender.clone(),
            date_of_birth: member.date_of_birth.format("%Y-%m-%d").to_string(),
            phone: member.phone.clone(),
            email: member.email.clone(),
            address: member.address.clone(),
            profile_picture_url: member.profile_picture_url.clone(),
            created_at: member.created_at.to_rfc3339(),
            updated_at: member.updated_at.to_rfc3339(),
        }
    }
}

/// Forms submit blank optional fields as empty strings.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ============================================================================
// Projection
// ============================================================================

/// Birthday-focused view of a member, derived fresh for each evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthdayProjection {
    pub id: MemberId,
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub date_of_birth: NaiveDate,
    /// Completed years as of the evaluation date.
    pub age: u32,
    pub profile_picture_url: Option<String>,
}

impl BirthdayProjection {
    pub fn project(member: &MemberRecord, now: NaiveDate, policy: LeapDayPolicy) -> Self {
        Self {
            id: member.id.clone(),
            full_name: member.full_name.clone(),
            phone: member.phone.clone(),
            email: member.email.clone(),
            date_of_birth: member.date_of_birth,
            age: calendar::calculate_age_with_policy(member.date_of_birth, now, policy),
            profile_picture_url: member.profile_picture_url.clone(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use assert_matches::assert_matches;

    pub(crate) fn member(id: &str, full_name: &str, date_of_birth: &str) -> MemberRecord {
        MemberRecord::try_from(raw(id, full_name, date_of_birth)).unwrap()
    }

    pub(crate) fn raw(id: &str, full_name: &str, date_of_birth: &str) -> RawMemberRecord {
        RawMemberRecord {
            id: id.to_string(),
            full_name: full_name.to_string(),
            gender: None,
            date_of_birth: date_of_birth.to_string(),
            phone: "555-0100".to_string(),
            email: Some(format!("{id}@example.org")),
            address: None,
            profile_picture_url: None,
            created_at: "2024-01-01T09:00:00+00:00".to_string(),
            updated_at: "2024-01-01T09:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn test_raw_record_parses() {
        let record = member("m1", "Ama Mensah", "1990-06-01");
        assert_eq!(record.id, MemberId::from("m1"));
        assert_eq!(record.date_of_birth, NaiveDate::from_ymd_opt(1990, 6, 1).unwrap());
    }

    #[test]
    fn test_invalid_birth_date_is_rejected() {
        let result = MemberRecord::try_from(raw("m1", "Ama Mensah", "1990-31-31"));
        assert_matches!(result, Err(BirthdayError::InvalidDate { value, .. }) if value == "1990-31-31");
    }

    #[test]
    fn test_blank_optional_fields_become_none() {
        let mut row = raw("m1", "Ama Mensah", "1990-06-01");
        row.email = Some("  ".to_string());
        row.address = Some(String::new());
        let record = MemberRecord::try_from(row).unwrap();
        assert_eq!(record.email, None);
        assert_eq!(record.address, None);
    }

    #[test]
    fn test_wire_shape_survives_conversion() {
        let record = member("m1", "Ama Mensah", "1990-06-01");
        let back = MemberRecord::try_from(RawMemberRecord::from(&record)).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_projection_carries_age() {
        let record = member("m1", "Ama Mensah", "1990-06-01");
        let now = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let projection = BirthdayProjection::project(&record, now, LeapDayPolicy::Skip);
        assert_eq!(projection.age, 34);
        assert_eq!(projection.email.as_deref(), Some("m1@example.org"));
    }
}
