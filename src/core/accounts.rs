//! Account business logic - registration, authentication and profile lookups.
//!
//! Logins are unique across buyers and companies together, and authentication
//! checks buyers before companies. Credentials are compared as plaintext.

use super::{
    Shop, ShopEvent,
    session::{Identity, Profile},
};
use crate::{
    entities::{Account, Buyer, Company, Role},
    errors::{Error, Result},
};
use tracing::{info, warn};

/// Raw registration form input. Fields are expected to be trimmed already.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registration {
    /// Buyer name, letters only
    pub name: String,
    /// Postal address
    pub address: String,
    /// Phone, digits only
    pub phone: String,
    /// Requested login
    pub login: String,
    /// Requested password
    pub password: String,
    /// Company registration key; must be empty for buyers
    pub key: String,
    /// Optional avatar picture path, kept for buyers only
    pub avatar_path: String,
}

/// Returns true if any buyer or company already uses `login`.
#[must_use]
pub fn login_taken(shop: &Shop, login: &str) -> bool {
    shop.buyers.records().iter().any(|b| b.login == login)
        || shop.companies.records().iter().any(|c| c.login == login)
}

/// Total number of accounts across both roles.
#[must_use]
pub fn account_count(shop: &Shop) -> usize {
    shop.buyers.records().len() + shop.companies.records().len()
}

/// Checks the registration form, in the order the fields appear on it.
fn validate_registration(shop: &Shop, role: Role, form: &Registration) -> Result<()> {
    if form.name.is_empty() || !form.name.chars().all(char::is_alphabetic) {
        return Err(Error::InvalidField { field: "name" });
    }
    if form.address.is_empty() {
        return Err(Error::InvalidField { field: "address" });
    }
    if form.phone.is_empty() || !form.phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::InvalidField { field: "phone" });
    }
    if form.login.is_empty() {
        return Err(Error::InvalidField { field: "login" });
    }
    if form.password.is_empty() {
        return Err(Error::InvalidField { field: "password" });
    }
    if login_taken(shop, &form.login) {
        return Err(Error::DuplicateLogin {
            login: form.login.clone(),
        });
    }

    match role {
        Role::Buyer if !form.key.is_empty() => Err(Error::InvalidField { field: "key" }),
        Role::Company if form.key != shop.settings.company_key => Err(Error::WrongCompanyKey),
        _ => Ok(()),
    }
}

/// Registers a new buyer or company account and persists its collection.
///
/// # Errors
/// Returns an error if:
/// - A field is empty or malformed (`InvalidField`)
/// - The login is used by any existing account (`DuplicateLogin`)
/// - A company key does not match (`WrongCompanyKey`)
/// - The collection cannot be written
pub fn register(shop: &mut Shop, role: Role, form: Registration) -> Result<Account> {
    validate_registration(shop, role, &form)?;

    let account = match role {
        Role::Buyer => {
            let buyer = Buyer {
                id: shop.buyers.next_id(),
                name: form.name,
                address: form.address,
                phone: form.phone,
                avatar_path: form.avatar_path,
                login: form.login,
                password: form.password,
            };
            let mut staged = shop.buyers.staged();
            staged.push(buyer.clone());
            shop.buyers.commit(&shop.store, staged)?;
            Account::Buyer(buyer)
        }
        Role::Company => {
            let company = Company {
                id: shop.companies.next_id(),
                login: form.login,
                password: form.password,
            };
            let mut staged = shop.companies.staged();
            staged.push(company.clone());
            shop.companies.commit(&shop.store, staged)?;
            Account::Company(company)
        }
    };

    info!(
        "Registered {} '{}' with id {}",
        role,
        account.login(),
        account.id()
    );
    shop.notify(ShopEvent::AccountsChanged);
    Ok(account)
}

/// Finds the account matching `login` and `password` exactly.
///
/// Buyers are checked before companies and the first match wins.
pub fn find_account(shop: &Shop, login: &str, password: &str) -> Option<Account> {
    shop.buyers
        .records()
        .iter()
        .find(|b| b.login == login && b.password == password)
        .map(|b| Account::Buyer(b.clone()))
        .or_else(|| {
            shop.companies
                .records()
                .iter()
                .find(|c| c.login == login && c.password == password)
                .map(|c| Account::Company(c.clone()))
        })
}

/// Logs in and starts a new session, replacing any current one.
///
/// # Errors
/// Returns `InvalidCredentials` if no account matches.
pub fn authenticate(shop: &mut Shop, login: &str, password: &str) -> Result<Identity> {
    let Some(account) = find_account(shop, login, password) else {
        warn!("Failed login attempt for '{}'", login);
        return Err(Error::InvalidCredentials);
    };

    let identity = Identity::from_account(&account);
    shop.session.login(identity.clone());
    info!("'{}' logged in as {}", identity.login, identity.role);
    Ok(identity)
}

/// Ends the current session.
pub fn logout(shop: &mut Shop) {
    shop.session.logout();
}

/// Retrieves a buyer account by ID.
#[must_use]
pub fn find_buyer(shop: &Shop, buyer_id: i64) -> Option<&Buyer> {
    shop.buyers.records().iter().find(|b| b.id == buyer_id)
}

/// Current profile of a buyer identity, re-read from the directory.
///
/// # Errors
/// Returns `Forbidden` for company identities.
pub fn profile(shop: &Shop, identity: &Identity) -> Result<Profile> {
    identity.ensure_role(Role::Buyer)?;
    let buyer = find_buyer(shop, identity.account_id).ok_or(Error::NotAuthenticated)?;
    Ok(Profile {
        name: buyer.name.clone(),
        address: buyer.address.clone(),
        phone: buyer.phone.clone(),
        avatar_path: buyer.avatar_path.clone(),
    })
}
