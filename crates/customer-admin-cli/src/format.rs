//! Plain-text rendering of customer records.

use customer_admin_core::models::Customer;

const ID_WIDTH: usize = 8;
const NAME_WIDTH: usize = 16;
const EMAIL_WIDTH: usize = 28;

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

pub fn customer_header() -> String {
    format!(
        "{:<id$}  {:<name$}  {:<email$}  {:>3}  {}",
        "ID",
        "NAME",
        "EMAIL",
        "AGE",
        "GENDER",
        id = ID_WIDTH,
        name = NAME_WIDTH,
        email = EMAIL_WIDTH,
    )
}

pub fn customer_row(customer: &Customer) -> String {
    format!(
        "{:<id$}  {:<name$}  {:<email$}  {:>3}  {}",
        truncate_string(&customer.id.to_string(), ID_WIDTH),
        truncate_string(&customer.name, NAME_WIDTH),
        truncate_string(&customer.email, EMAIL_WIDTH),
        customer.age,
        customer.gender,
        id = ID_WIDTH,
        name = NAME_WIDTH,
        email = EMAIL_WIDTH,
    )
}

pub fn customer_table(customers: &[Customer]) -> String {
    if customers.is_empty() {
        return "No customers available".to_string();
    }
    std::iter::once(customer_header())
        .chain(customers.iter().map(customer_row))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Multi-line detail view for a single customer
pub fn customer_detail(customer: &Customer) -> String {
    let roles = if customer.roles.is_empty() {
        "-".to_string()
    } else {
        customer.roles.join(", ")
    };
    format!(
        "ID:       {}\nName:     {}\nEmail:    {}\nAge:      {}\nGender:   {}\nUsername: {}\nRoles:    {}",
        customer.id,
        customer.name,
        customer.email,
        customer.age,
        customer.gender,
        customer.username.as_deref().unwrap_or("-"),
        roles,
    )
}
