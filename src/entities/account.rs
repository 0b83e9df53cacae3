//! Account entities - buyers and companies.
//!
//! The two roles are stored in separate collections with different columns.
//! [`Account`] is the tagged view over both that the directory hands out.

use crate::store::{Collection, Record};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which kind of account a login belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Places and collects orders
    Buyer,
    /// Lists items and ships orders
    Company,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buyer => f.write_str("buyer"),
            Self::Company => f.write_str("company"),
        }
    }
}

/// Buyer account row
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buyer {
    /// Unique identifier within the buyer collection
    pub id: i64,
    /// Human-readable name, letters only; orders are filed under it
    pub name: String,
    /// Default delivery address
    pub address: String,
    /// Phone number, digits only
    pub phone: String,
    /// Path to the avatar image, empty when none was chosen
    pub avatar_path: String,
    /// Login, unique across buyers and companies
    pub login: String,
    /// Plaintext password
    pub password: String,
}

impl Record for Buyer {
    const COLLECTION: Collection = Collection::Buyers;
    const HEADER: &'static [&'static str] = &[
        "id",
        "name",
        "address",
        "phone",
        "avatar_path",
        "login",
        "password",
    ];

    fn id(&self) -> i64 {
        self.id
    }
}

/// Company account row
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// Unique identifier within the company collection
    pub id: i64,
    /// Login, unique across buyers and companies
    pub login: String,
    /// Plaintext password
    pub password: String,
}

impl Record for Company {
    const COLLECTION: Collection = Collection::Companies;
    const HEADER: &'static [&'static str] = &["id", "login", "password"];

    fn id(&self) -> i64 {
        self.id
    }
}

/// Either kind of account
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Account {
    /// Buyer account
    Buyer(Buyer),
    /// Company account
    Company(Company),
}

impl Account {
    /// Buyer or company.
    #[must_use]
    pub const fn role(&self) -> Role {
        match self {
            Self::Buyer(_) => Role::Buyer,
            Self::Company(_) => Role::Company,
        }
    }

    /// ID within the account's own collection.
    #[must_use]
    pub const fn id(&self) -> i64 {
        match self {
            Self::Buyer(buyer) => buyer.id,
            Self::Company(company) => company.id,
        }
    }

    /// Login used to authenticate.
    #[must_use]
    pub fn login(&self) -> &str {
        match self {
            Self::Buyer(buyer) => &buyer.login,
            Self::Company(company) => &company.login,
        }
    }

    /// Name shown to other parties. Companies have no separate name, so their
    /// login is used.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::Buyer(buyer) => &buyer.name,
            Self::Company(company) => &company.login,
        }
    }
}
