//! Form submission handlers.
//!
//! Each handler validates its input, calls the `ApiClient`, and reports the
//! outcome through a `Notifier`. Login, logout and the mutations emit exactly
//! one notification per call. Mutations refetch the customer list
//! afterwards, because the client never patches records locally.

use tracing::{error, info, warn};

use crate::api::{ApiClient, ApiError};
use crate::auth::{Session, SessionData};
use crate::forms;
use crate::models::{Customer, CustomerId, CustomerRegistrationRequest, CustomerUpdateRequest, LoginRequest};
use crate::notify::{Notification, Notifier};

fn report(notifier: &dyn Notifier, err: ApiError) -> ApiError {
    error!(code = err.code(), error = %err, "Action failed");
    notifier.notify(Notification::error(&err));
    err
}

/// Log in and store the resulting token in `session`.
pub async fn login(
    client: &ApiClient,
    session: &mut Session,
    notifier: &dyn Notifier,
    credentials: &LoginRequest,
) -> Result<Customer, ApiError> {
    if let Err(e) = forms::validate_login(credentials).into_result() {
        return Err(report(notifier, e));
    }

    let response = client.login(credentials).await.map_err(|e| report(notifier, e))?;
    let customer = response.customer.clone();

    session.update(SessionData::from_login(response));
    if let Err(e) = session.save() {
        warn!(error = %e, "Failed to save session");
    }

    info!(customer_id = %customer.id, "Login successful");
    notifier.notify(Notification::success(
        "Logged in",
        format!("Welcome back, {}", customer.name),
    ));
    Ok(customer)
}

/// Forget the token. The in-memory session is always cleared, even when the
/// file on disk cannot be removed.
pub fn logout(session: &mut Session, notifier: &dyn Notifier) {
    if let Err(e) = session.clear() {
        warn!(error = %e, "Failed to remove stored session");
    }
    info!("Logged out");
    notifier.notify(Notification::success("Logged out", "Your session has ended"));
}

/// Fetch the customer list. Only failures are notified; an `AuthError`
/// tells the caller to send the user back to login.
pub async fn fetch_customers(
    client: &ApiClient,
    session: &Session,
    notifier: &dyn Notifier,
) -> Result<Vec<Customer>, ApiError> {
    client
        .list_customers(session)
        .await
        .map_err(|e| report(notifier, e))
}

/// Refetch after a mutation. A failure here is returned but not notified,
/// since the mutation itself already produced its notification.
async fn refetch(client: &ApiClient, session: &Session) -> Result<Vec<Customer>, ApiError> {
    client.list_customers(session).await.map_err(|e| {
        warn!(code = e.code(), error = %e, "Refetch after mutation failed");
        e
    })
}

pub async fn create_customer(
    client: &ApiClient,
    session: &Session,
    notifier: &dyn Notifier,
    request: &CustomerRegistrationRequest,
) -> Result<Vec<Customer>, ApiError> {
    client
        .create_customer(session, request)
        .await
        .map_err(|e| report(notifier, e))?;

    notifier.notify(Notification::success(
        "Customer saved",
        format!("{} was successfully saved", request.name),
    ));
    refetch(client, session).await
}

pub async fn update_customer(
    client: &ApiClient,
    session: &Session,
    notifier: &dyn Notifier,
    id: &CustomerId,
    update: &CustomerUpdateRequest,
) -> Result<Vec<Customer>, ApiError> {
    let updated = client
        .update_customer(session, id, update)
        .await
        .map_err(|e| report(notifier, e))?;

    let label = updated
        .map(|c| c.name)
        .or_else(|| update.name.clone())
        .unwrap_or_else(|| format!("Customer with id {}", id));
    notifier.notify(Notification::success(
        "Customer updated",
        format!("{} was successfully updated", label),
    ));
    refetch(client, session).await
}

pub async fn delete_customer(
    client: &ApiClient,
    session: &Session,
    notifier: &dyn Notifier,
    id: &CustomerId,
) -> Result<Vec<Customer>, ApiError> {
    client
        .delete_customer(session, id)
        .await
        .map_err(|e| report(notifier, e))?;

    notifier.notify(Notification::success(
        "Customer deleted",
        format!("Customer with id {} was successfully deleted", id),
    ));
    refetch(client, session).await
}
