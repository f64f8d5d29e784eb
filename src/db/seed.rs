//! Demo rows written the first time the schema is created.

use chrono::Utc;
use rusqlite::Connection;

use crate::credentials::hash_password;
use crate::db::{companies, estimates, layouts, roles, user_details, users};
use crate::error::Result;
use crate::models::{Company, Estimate, EstimateStatus, Layout, Role, User, UserDetail};

const DEFAULT_INTRODUCTION: &str = "Dear {{CUSTOMER_NAME}}, thank you for the opportunity \
to quote the work at {{PROJECT_ADDRESS}}. Quote {{QUOTE_NUMBER}}, dated {{QUOTE_DATE}}, \
comes to {{TOTAL_AMOUNT}}.";

/// A full set of rows to insert, in dependency order.
#[derive(Debug, Clone, Default)]
pub struct SeedData {
    pub companies: Vec<Company>,
    pub roles: Vec<Role>,
    pub user_details: Vec<UserDetail>,
    pub users: Vec<User>,
    pub layouts: Vec<Layout>,
    pub estimates: Vec<Estimate>,
}

impl SeedData {
    /// One demo company with an admin and a regular user (`admin`/`admin123`
    /// and `demo`/`demo123`), a handful of report layouts and three sample
    /// estimates.
    pub fn demo() -> Self {
        let now = Utc::now().to_rfc3339();

        let company = Company {
            id: 1,
            company_name: "Demo Company".to_string(),
            company_phone_number: "1234567890".to_string(),
            company_email: "contact@democompany.com".to_string(),
            business_number: "BN123456".to_string(),
            web_address: "www.democompany.com".to_string(),
            is_active: true,
        };

        let roles = vec![
            Role {
                id: 1,
                role_name: "Admin".to_string(),
                is_active: true,
            },
            Role {
                id: 2,
                role_name: "User".to_string(),
                is_active: true,
            },
        ];

        let user_details = vec![
            UserDetail {
                id: 1,
                username: "admin".to_string(),
                password_hash: hash_password("admin123"),
                email: "admin@democompany.com".to_string(),
                first_name: "Admin".to_string(),
                last_name: "User".to_string(),
                phone_number: "1234567890".to_string(),
                company_id: company.id,
                is_active: true,
                is_logged_in: false,
                created_date: now.clone(),
                modified_date: now.clone(),
            },
            UserDetail {
                id: 2,
                username: "demo".to_string(),
                password_hash: hash_password("demo123"),
                email: "user@democompany.com".to_string(),
                first_name: "Demo".to_string(),
                last_name: "User".to_string(),
                phone_number: "0987654321".to_string(),
                company_id: company.id,
                is_active: true,
                is_logged_in: false,
                created_date: now.clone(),
                modified_date: now.clone(),
            },
        ];

        let users = user_details
            .iter()
            .map(|detail| User {
                id: detail.id,
                user_detail_id: detail.id,
                created_date: now.clone(),
                modified_date: now.clone(),
            })
            .collect();

        let layouts = [
            (1, "Standard Estimate", true, false),
            (2, "Detailed Estimate", true, false),
            (3, "Company Template", true, true),
            (4, "Legacy Template", false, true),
        ]
        .into_iter()
        .map(|(id, name, is_active, is_shared)| Layout {
            id,
            layout_name: name.to_string(),
            company_id: company.id,
            is_active,
            is_shared,
        })
        .collect();

        let sample_estimates = [
            (
                1,
                "John Smith",
                "123 Main St, Springfield",
                "2024-03-15",
                1_250_000,
                EstimateStatus::Provided,
            ),
            (
                2,
                "Sarah Johnson",
                "456 Oak Ave, Riverside",
                "2024-03-14",
                875_000,
                EstimateStatus::Requested,
            ),
            (
                3,
                "Michael Brown",
                "789 Pine Rd, Lakeside",
                "2024-03-13",
                1_520_000,
                EstimateStatus::Accepted,
            ),
        ]
        .into_iter()
        .map(|(id, customer, address, date, total_cents, status)| Estimate {
            id,
            company_id: company.id,
            quote_number: estimates::quote_number_for(id),
            customer_name: customer.to_string(),
            project_address: address.to_string(),
            quote_date: date.to_string(),
            total_cents,
            status,
            introduction: DEFAULT_INTRODUCTION.to_string(),
            created_date: now.clone(),
            modified_date: now.clone(),
        })
        .collect();

        Self {
            companies: vec![company],
            roles,
            user_details,
            users,
            layouts,
            estimates: sample_estimates,
        }
    }

    pub fn row_count(&self) -> usize {
        self.companies.len()
            + self.roles.len()
            + self.user_details.len()
            + self.users.len()
            + self.layouts.len()
            + self.estimates.len()
    }
}

/// Insert every row. Stops at the first failure; the caller owns the
/// transaction and decides what to roll back.
pub fn insert_seed(conn: &Connection, seed: &SeedData) -> Result<usize> {
    for company in &seed.companies {
        companies::insert(conn, company)?;
    }
    for role in &seed.roles {
        roles::insert(conn, role)?;
    }
    for detail in &seed.user_details {
        user_details::insert(conn, detail)?;
    }
    for user in &seed.users {
        users::insert(conn, user)?;
    }
    for layout in &seed.layouts {
        layouts::insert(conn, layout)?;
    }
    for estimate in &seed.estimates {
        estimates::insert(conn, estimate)?;
    }
    Ok(seed.row_count())
}
