//! Session - the identity of whoever is logged in.
//!
//! There is at most one session per process. Logging in again replaces the
//! previous identity and logging out clears it.

use crate::{
    entities::{Account, Role},
    errors::{Error, Result},
};
use tracing::info;

/// Buyer profile fields kept for display and as checkout defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Buyer name
    pub name: String,
    /// Default delivery address
    pub address: String,
    /// Contact phone, digits only
    pub phone: String,
    /// Avatar picture path, may be empty
    pub avatar_path: String,
}

/// Authenticated account as seen by the rest of the core
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Buyer or company
    pub role: Role,
    /// ID within the collection of `role`
    pub account_id: i64,
    /// Buyer name, or the login for companies
    pub display_name: String,
    /// Login used to authenticate
    pub login: String,
    /// Present for buyers only
    pub profile: Option<Profile>,
}

impl Identity {
    /// Builds the identity of a freshly authenticated account.
    #[must_use]
    pub fn from_account(account: &Account) -> Self {
        let profile = match account {
            Account::Buyer(buyer) => Some(Profile {
                name: buyer.name.clone(),
                address: buyer.address.clone(),
                phone: buyer.phone.clone(),
                avatar_path: buyer.avatar_path.clone(),
            }),
            Account::Company(_) => None,
        };

        Self {
            role: account.role(),
            account_id: account.id(),
            display_name: account.display_name().to_string(),
            login: account.login().to_string(),
            profile,
        }
    }

    /// Fails with [`Error::Forbidden`] unless this identity has `role`.
    ///
    /// # Errors
    /// Returns `Forbidden` on a role mismatch.
    pub fn ensure_role(&self, role: Role) -> Result<()> {
        if self.role == role {
            Ok(())
        } else {
            Err(Error::Forbidden)
        }
    }
}

/// At most one logged-in identity per process
#[derive(Debug, Default)]
pub struct Session {
    current: Option<Identity>,
}

impl Session {
    /// Starts a session for `identity`, replacing any existing one.
    pub fn login(&mut self, identity: Identity) {
        if let Some(previous) = self.current.replace(identity) {
            info!("Session for '{}' replaced by a new login", previous.login);
        }
    }

    /// Ends the session, if any.
    pub fn logout(&mut self) {
        if let Some(previous) = self.current.take() {
            info!("'{}' logged out", previous.login);
        }
    }

    /// The logged-in identity, if any.
    #[must_use]
    pub const fn current(&self) -> Option<&Identity> {
        self.current.as_ref()
    }

    /// The logged-in identity, or [`Error::NotAuthenticated`].
    ///
    /// # Errors
    /// Returns `NotAuthenticated` when nobody is logged in.
    pub fn require(&self) -> Result<&Identity> {
        self.current.as_ref().ok_or(Error::NotAuthenticated)
    }

    /// The logged-in buyer.
    ///
    /// # Errors
    /// Returns `NotAuthenticated` or `Forbidden`.
    pub fn require_buyer(&self) -> Result<&Identity> {
        let identity = self.require()?;
        identity.ensure_role(Role::Buyer)?;
        Ok(identity)
    }

    /// The logged-in company.
    ///
    /// # Errors
    /// Returns `NotAuthenticated` or `Forbidden`.
    pub fn require_company(&self) -> Result<&Identity> {
        let identity = self.require()?;
        identity.ensure_role(Role::Company)?;
        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Buyer, Company};

    fn buyer_identity() -> Identity {
        Identity::from_account(&Account::Buyer(Buyer {
            id: 3,
            name: "Alice".to_string(),
            address: "1 Elm St".to_string(),
            phone: "5550100".to_string(),
            avatar_path: String::new(),
            login: "alice".to_string(),
            password: "pw".to_string(),
        }))
    }

    fn company_identity() -> Identity {
        Identity::from_account(&Account::Company(Company {
            id: 1,
            login: "acme".to_string(),
            password: "pw".to_string(),
        }))
    }

    #[test]
    fn test_identity_from_accounts() {
        let buyer = buyer_identity();
        assert_eq!(buyer.role, Role::Buyer);
        assert_eq!(buyer.display_name, "Alice");
        assert_eq!(buyer.profile.as_ref().map(|p| p.address.as_str()), Some("1 Elm St"));

        let company = company_identity();
        assert_eq!(company.role, Role::Company);
        assert_eq!(company.display_name, "acme");
        assert!(company.profile.is_none());
    }

    #[test]
    fn test_empty_session_requires_login() {
        let session = Session::default();
        assert!(matches!(session.require(), Err(Error::NotAuthenticated)));
        assert!(matches!(session.require_buyer(), Err(Error::NotAuthenticated)));
    }

    #[test]
    fn test_second_login_overwrites_first() {
        let mut session = Session::default();
        session.login(buyer_identity());
        session.login(company_identity());

        assert_eq!(session.current().map(|i| i.login.as_str()), Some("acme"));
        assert!(session.require_company().is_ok());
        assert!(matches!(session.require_buyer(), Err(Error::Forbidden)));
    }

    #[test]
    fn test_logout_clears_session() {
        let mut session = Session::default();
        session.login(buyer_identity());
        session.logout();
        assert!(session.current().is_none());
    }
}
