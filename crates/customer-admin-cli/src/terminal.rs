use std::io::{self, Write};

use anyhow::Result;
use customer_admin_core::notify::{Notification, NotificationLevel, Notifier};

/// Prints notifications: successes to stdout, errors to stderr.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => {
                println!("✓ {}: {}", notification.title, notification.description)
            }
            NotificationLevel::Error => {
                eprintln!("✗ {}: {}", notification.title, notification.description)
            }
        }
    }
}

/// Prompt for a line of input, returning `default` when the answer is blank.
pub fn prompt_line(label: &str, default: Option<&str>) -> Result<String> {
    match default {
        Some(d) => print!("{} [{}]: ", label, d),
        None => print!("{}: ", label),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    Ok(match default {
        Some(d) if input.is_empty() => d.to_string(),
        _ => input.to_string(),
    })
}

pub fn prompt_password(label: &str) -> Result<String> {
    let password = rpassword::prompt_password(format!("{}: ", label))?;
    Ok(password)
}
