//! Domain models that mirror the SQLite schema. They stay plain data holders
//! so the persistence layer can hydrate them straight from rows and the UI can
//! render them without further lookups.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A company account. `is_active` is a soft-delete flag; rows are never
/// removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Company {
    pub id: i64,
    pub company_name: String,
    pub company_phone_number: String,
    pub company_email: String,
    pub business_number: String,
    pub web_address: String,
    pub is_active: bool,
}

impl fmt::Display for Company {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.company_name)
    }
}

/// Lookup row for a permission role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: i64,
    pub role_name: String,
    pub is_active: bool,
}

/// Profile and credential row for a person who can sign in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDetail {
    pub id: i64,
    pub username: String,
    /// `salt$digest`, see [`crate::credentials`]. Never the plaintext.
    pub password_hash: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub company_id: i64,
    pub is_active: bool,
    pub is_logged_in: bool,
    /// RFC 3339 timestamp.
    pub created_date: String,
    /// RFC 3339 timestamp.
    pub modified_date: String,
}

impl UserDetail {
    /// `First Last`, falling back to the username when both names are blank.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub user_detail_id: i64,
    pub created_date: String,
    pub modified_date: String,
}

/// A report layout a company can pick for its estimates. Shared layouts show
/// up under a separate tab in the layout dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub id: i64,
    pub layout_name: String,
    pub company_id: i64,
    pub is_active: bool,
    pub is_shared: bool,
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.layout_name)
    }
}

/// The layout a company last chose in the layout dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutPreference {
    pub company_id: i64,
    pub layout_id: i64,
    pub layout_name: String,
    pub modified_date: String,
}

/// Where an estimate stands with the customer. Stored as its lower-case name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimateStatus {
    Provided,
    Requested,
    Accepted,
    Completed,
    Revised,
    Cancelled,
}

impl EstimateStatus {
    /// Every status in the order the status picker lists them.
    pub const ALL: [EstimateStatus; 6] = [
        EstimateStatus::Provided,
        EstimateStatus::Requested,
        EstimateStatus::Accepted,
        EstimateStatus::Completed,
        EstimateStatus::Revised,
        EstimateStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EstimateStatus::Provided => "provided",
            EstimateStatus::Requested => "requested",
            EstimateStatus::Accepted => "accepted",
            EstimateStatus::Completed => "completed",
            EstimateStatus::Revised => "revised",
            EstimateStatus::Cancelled => "cancelled",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EstimateStatus::Provided => "Provided",
            EstimateStatus::Requested => "Requested",
            EstimateStatus::Accepted => "Accepted",
            EstimateStatus::Completed => "Completed",
            EstimateStatus::Revised => "Revised",
            EstimateStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for EstimateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown estimate status {0:?}")]
pub struct UnknownStatus(pub String);

impl FromStr for EstimateStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        EstimateStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| UnknownStatus(value.to_string()))
    }
}

/// A customer quote. Amounts are kept in cents so totals never pick up
/// floating point noise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Estimate {
    pub id: i64,
    pub company_id: i64,
    pub quote_number: String,
    pub customer_name: String,
    pub project_address: String,
    /// `YYYY-MM-DD`.
    pub quote_date: String,
    pub total_cents: i64,
    pub status: EstimateStatus,
    /// Introduction letter template; may contain placeholder tokens.
    pub introduction: String,
    pub created_date: String,
    pub modified_date: String,
}

impl Estimate {
    /// `$12,500.00` style total.
    pub fn formatted_total(&self) -> String {
        format_cents(self.total_cents)
    }
}

fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let dollars = (cents / 100).to_string();

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (idx, digit) in dollars.chars().enumerate() {
        if idx > 0 && (dollars.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{sign}${grouped}.{:02}", cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(first: &str, last: &str) -> UserDetail {
        UserDetail {
            id: 1,
            username: "admin".to_string(),
            password_hash: String::new(),
            email: String::new(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            phone_number: String::new(),
            company_id: 1,
            is_active: true,
            is_logged_in: false,
            created_date: String::new(),
            modified_date: String::new(),
        }
    }

    #[test]
    fn display_name_joins_first_and_last() {
        assert_eq!(detail("Admin", "User").display_name(), "Admin User");
        assert_eq!(detail("Admin", " ").display_name(), "Admin");
    }

    #[test]
    fn display_name_falls_back_to_username() {
        assert_eq!(detail("", "").display_name(), "admin");
    }

    #[test]
    fn status_names_round_trip_through_from_str() {
        for status in EstimateStatus::ALL {
            assert_eq!(status.as_str().parse(), Ok(status));
        }
        assert_eq!(
            "in_progress".parse::<EstimateStatus>(),
            Err(UnknownStatus("in_progress".to_string()))
        );
    }

    #[test]
    fn totals_are_grouped_by_thousands() {
        assert_eq!(format_cents(1_250_000), "$12,500.00");
        assert_eq!(format_cents(99_905), "$999.05");
        assert_eq!(format_cents(123_456_789), "$1,234,567.89");
        assert_eq!(format_cents(-150), "-$1.50");
        assert_eq!(format_cents(0), "$0.00");
    }
}
