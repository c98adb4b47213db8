//! customer-admin - a terminal front-end for the customer service.
//!
//! Log in once, then list, create, update and delete customer records.
//! The session is kept in the cache directory between runs.

mod format;
mod terminal;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use customer_admin_core::actions;
use customer_admin_core::models::{
    Customer, CustomerId, CustomerRegistrationRequest, CustomerUpdateRequest, Gender, LoginRequest,
};
use customer_admin_core::notify::{Notification, Notifier};
use customer_admin_core::{ApiClient, ApiError, Config, Session};

use terminal::TerminalNotifier;

#[derive(Debug, Parser)]
#[command(name = "customer-admin", version, about = "Manage customer records")]
struct Cli {
    /// API base URL (overrides the config file and CUSTOMER_ADMIN_API_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check that the server is reachable
    Ping,
    /// Log in and remember the session
    Login {
        #[arg(long, short)]
        username: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in customer
    Whoami,
    /// List all customers
    List,
    /// Show one customer
    Show { id: CustomerId },
    /// Register a new customer
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        age: u32,
        #[arg(long)]
        gender: Gender,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Change some fields of a customer
    Update {
        id: CustomerId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        age: Option<u32>,
    },
    /// Delete a customer
    Delete { id: CustomerId },
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Everything the commands share
struct App {
    config: Config,
    client: ApiClient,
    session: Session,
}

fn load_app(base_url: Option<String>) -> Result<App> {
    let mut config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        }
    };
    config.base_url_override = base_url;
    debug!(base_url = %config.base_url(), "Config loaded");

    let client = ApiClient::from_config(&config).context("Failed to create API client")?;

    let cache_dir = config.cache_dir().unwrap_or_else(|_| PathBuf::from("./cache"));
    let mut session = Session::new(cache_dir).with_ttl(config.token_ttl());
    let restored = session.load().unwrap_or_else(|e| {
        debug!(error = %e, "Ignoring unreadable session file");
        false
    });
    debug!(restored, "Session loaded");

    Ok(App {
        config,
        client,
        session,
    })
}

/// Map an action outcome to an exit code. The notifier has already shown
/// the error; auth failures get a hint on how to recover.
fn finish(result: Result<(), ApiError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if e.is_auth() {
                eprintln!("Run `customer-admin login` to sign in.");
            }
            ExitCode::FAILURE
        }
    }
}

/// Pick the live record for `whoami`. Only an unreachable server falls back
/// to the identity recorded at login; other failures are notified and returned.
fn current_or_recorded(
    current: Result<Customer, ApiError>,
    recorded: Customer,
    notifier: &dyn Notifier,
) -> Result<Customer, ApiError> {
    match current {
        Ok(customer) => Ok(customer),
        Err(ApiError::NetworkError(msg)) => {
            warn!(error = %msg, "Server unreachable, showing identity recorded at login");
            Ok(recorded)
        }
        Err(e) => {
            notifier.notify(Notification::error(&e));
            Err(e)
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let App {
        mut config,
        client,
        mut session,
    } = load_app(cli.base_url)?;
    let notifier = TerminalNotifier;

    let code = match cli.command {
        Command::Ping => finish(client.ping().await.map(|pong| println!("{}", pong.result))),

        Command::Login { username } => {
            let username = match username {
                Some(u) => u,
                None => terminal::prompt_line("Email", config.last_username.as_deref())?,
            };
            let password = terminal::prompt_password("Password")?;

            let credentials = LoginRequest::new(username.clone(), password);
            let result = actions::login(&client, &mut session, &notifier, &credentials).await;
            if result.is_ok() {
                config.last_username = Some(username);
                if let Err(e) = config.save() {
                    warn!(error = %e, "Failed to save config");
                }
                info!("Remembered username for next login");
            }
            finish(result.map(|_| ()))
        }

        Command::Logout => {
            actions::logout(&mut session, &notifier);
            ExitCode::SUCCESS
        }

        Command::Whoami => {
            let Some(me) = session.customer().cloned() else {
                return Ok(finish(Err(ApiError::AuthError("Not logged in".to_string()))));
            };
            let (pong, current) =
                futures::join!(client.ping(), client.get_customer(&session, &me.id));
            match pong {
                Ok(p) => debug!(result = %p.result, "Server reachable"),
                Err(e) => eprintln!("Server check failed: {}", e),
            }
            let customer = match current_or_recorded(current, me, &notifier) {
                Ok(c) => c,
                Err(e) => return Ok(finish(Err(e))),
            };
            println!("{}", format::customer_detail(&customer));
            if let Some(data) = session.data.as_ref() {
                println!("Session:  {} minutes left", data.minutes_until_expiry(session.ttl()));
            }
            ExitCode::SUCCESS
        }

        Command::List => finish(
            actions::fetch_customers(&client, &session, &notifier)
                .await
                .map(|customers| println!("{}", format::customer_table(&customers))),
        ),

        Command::Show { id } => {
            let result = client.get_customer(&session, &id).await;
            if let Err(ref e) = result {
                notifier.notify(Notification::error(e));
            }
            finish(result.map(|c| println!("{}", format::customer_detail(&c))))
        }

        Command::Create {
            name,
            email,
            age,
            gender,
            password,
        } => {
            let password = match password {
                Some(p) => p,
                None => terminal::prompt_password("Password for the new customer")?,
            };
            let request = CustomerRegistrationRequest {
                name,
                email,
                password,
                age,
                gender,
            };
            finish(
                actions::create_customer(&client, &session, &notifier, &request)
                    .await
                    .map(|customers| println!("{}", format::customer_table(&customers))),
            )
        }

        Command::Update {
            id,
            name,
            email,
            age,
        } => {
            let update = CustomerUpdateRequest { name, email, age };
            finish(
                actions::update_customer(&client, &session, &notifier, &id, &update)
                    .await
                    .map(|customers| println!("{}", format::customer_table(&customers))),
            )
        }

        Command::Delete { id } => finish(
            actions::delete_customer(&client, &session, &notifier, &id)
                .await
                .map(|customers| println!("{}", format::customer_table(&customers))),
        ),
    };

    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use customer_admin_core::notify::RecordingNotifier;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_create() {
        let cli = Cli::try_parse_from([
            "customer-admin", "create", "--name", "Jane", "--email", "jane@x.com", "--age", "18",
            "--gender", "female", "--password", "pw",
        ])
        .expect("Failed to parse create");
        match cli.command {
            Command::Create { gender, age, .. } => {
                assert_eq!(gender, Gender::Female);
                assert_eq!(age, 18);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_delete_with_opaque_id() {
        let cli = Cli::try_parse_from(["customer-admin", "delete", "nonexistent-id"])
            .expect("Failed to parse delete");
        match cli.command {
            Command::Delete { id } => assert_eq!(id, CustomerId::Text("nonexistent-id".to_string())),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_global_base_url() {
        let cli = Cli::try_parse_from(["customer-admin", "list", "--base-url", "http://api.test"])
            .expect("Failed to parse list");
        assert_eq!(cli.base_url.as_deref(), Some("http://api.test"));
    }

    fn recorded() -> Customer {
        Customer {
            id: CustomerId::Number(7),
            name: "Jane".to_string(),
            email: "jane@x.com".to_string(),
            gender: Gender::Female,
            age: 18,
            roles: vec![],
            username: Some("jane@x.com".to_string()),
        }
    }

    #[test]
    fn test_whoami_rejected_token_is_reported() {
        let notifier = RecordingNotifier::new();
        let current = Err(ApiError::AuthError("Token expired".to_string()));

        let err = current_or_recorded(current, recorded(), &notifier).unwrap_err();

        assert!(err.is_auth());
        assert_eq!(finish(Err(err)), ExitCode::FAILURE);
        let seen = notifier.notifications();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].title, "AUTH_ERROR");
    }

    #[test]
    fn test_whoami_unreachable_server_uses_recorded_identity() {
        let notifier = RecordingNotifier::new();
        let current = Err(ApiError::NetworkError("connection refused".to_string()));

        let customer = current_or_recorded(current, recorded(), &notifier)
            .expect("network failure falls back");

        assert_eq!(customer, recorded());
        assert!(notifier.notifications().is_empty());
    }

    #[test]
    fn test_whoami_prefers_live_record() {
        let notifier = RecordingNotifier::new();
        let mut live = recorded();
        live.name = "Janet".to_string();

        let customer = current_or_recorded(Ok(live.clone()), recorded(), &notifier)
            .expect("live record");
        assert_eq!(customer, live);
    }

    #[test]
    fn test_finish_exit_codes() {
        assert_eq!(finish(Ok(())), ExitCode::SUCCESS);
        assert_eq!(finish(Err(ApiError::NotFoundError("x".to_string()))), ExitCode::FAILURE);
    }
}
