//! Account management commands.
//!
//! Accounts are never created over HTTP; the authentication layer only
//! forwards ids that were registered here.

use factory_inventory_api::db::AccountRepository;
use factory_inventory_api::models::CreateAccountInput;
use factory_inventory_core::AccountId;

use super::{CommandError, connect};

/// Create an account.
pub async fn create(
    id: &str,
    email: &str,
    is_staff: bool,
    is_superuser: bool,
) -> Result<(), CommandError> {
    let id = AccountId::parse(id).map_err(|e| CommandError::Invalid(format!("account id: {e}")))?;

    let email = email.trim();
    if !email.contains('@') {
        return Err(CommandError::Invalid(format!("email: {email}")));
    }

    let pool = connect().await?;
    let account = AccountRepository::new(&pool)
        .create(&CreateAccountInput {
            id,
            email: email.to_owned(),
            is_staff,
            is_superuser,
        })
        .await?;

    tracing::info!(
        account_id = %account.id,
        email = %account.email,
        is_staff = account.is_staff,
        is_superuser = account.is_superuser,
        "Account created"
    );
    if !account.is_superuser {
        tracing::warn!("Account has no factory access until it is assigned as a manager");
    }

    Ok(())
}
