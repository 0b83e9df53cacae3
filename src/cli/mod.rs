//! Command-line interface - a thin presentation layer over the core.
//!
//! Every subcommand maps onto one core operation. Commands that act for an
//! account take `--login`/`--password` and open a session for the duration of
//! the process; registration uses the same two flags as the new credentials.

/// Listing and profile formatting
pub mod render;

use render::format_money;

use crate::{
    core::{
        Shop,
        accounts::{self, Registration},
        catalog::{self, NewItem},
        import, orders,
        session::Identity,
    },
    entities::{OrderStatus, Role},
    errors::{Error, Result},
};
use clap::{Parser, Subcommand};
use std::{io::Write, path::PathBuf};
use tracing::debug;

/// Command line of the `storefront` binary
#[derive(Parser, Debug)]
#[command(name = "storefront", version, about = "Storefront accounts, catalog and orders")]
pub struct Cli {
    /// Settings file (defaults to storefront.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Account login
    #[arg(long, global = true)]
    pub login: Option<String>,

    /// Account password
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Operation to run
    #[command(subcommand)]
    pub command: Command,
}

/// One subcommand per core operation
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Register a buyer account with --login/--password
    RegisterBuyer {
        /// Buyer name, letters only
        #[arg(long)]
        name: String,
        /// Postal address
        #[arg(long)]
        address: String,
        /// Phone number, digits only
        #[arg(long)]
        phone: String,
        /// Avatar picture path
        #[arg(long, default_value = "")]
        avatar: String,
    },
    /// Register a company account with --login/--password
    RegisterCompany {
        /// Company name
        #[arg(long)]
        name: String,
        /// Postal address
        #[arg(long)]
        address: String,
        /// Phone number, digits only
        #[arg(long)]
        phone: String,
        /// Company registration key
        #[arg(long)]
        key: String,
    },
    /// List the catalog
    Items,
    /// List an item (company)
    AddItem {
        /// Item name
        #[arg(long)]
        name: String,
        /// Unit price
        #[arg(long)]
        price: String,
        /// Units in stock
        #[arg(long)]
        stock: String,
        /// Free-form description
        #[arg(long, default_value = "")]
        description: String,
        /// Allow home delivery
        #[arg(long)]
        delivery: bool,
        /// Item picture path
        #[arg(long, default_value = "")]
        image: String,
    },
    /// Remove an item by ID (company)
    RemoveItem {
        /// Item ID
        id: i64,
    },
    /// Import items from a CSV file (company)
    Import {
        /// CSV file with name, price, stock, delivery_eligible, description and image columns
        file: PathBuf,
    },
    /// Show what an order would cost
    Quote {
        /// Item name
        #[arg(long)]
        item: String,
        /// Number of units
        #[arg(long)]
        quantity: String,
        /// Delivery or Pickup
        #[arg(long)]
        mode: String,
    },
    /// Place an order (buyer)
    Order {
        /// Item name
        #[arg(long)]
        item: String,
        /// Number of units
        #[arg(long)]
        quantity: String,
        /// Delivery or Pickup
        #[arg(long)]
        mode: String,
        /// Delivery address; defaults to the profile address
        #[arg(long, default_value = "")]
        address: String,
    },
    /// List active orders: your own as a buyer, all of them as a company
    Orders,
    /// Update an order status (company)
    SetStatus {
        /// Order ID
        order_id: i64,
        /// Placed, Shipped, Confirmed or Delivered
        status: String,
    },
    /// Collect a delivered order (buyer)
    Collect {
        /// Order ID
        order_id: i64,
    },
    /// List collected orders (buyer)
    History,
    /// Show the buyer profile
    Profile,
}

impl Command {
    /// Whether the command needs a logged-in account.
    #[must_use]
    pub const fn needs_session(&self) -> bool {
        !matches!(
            self,
            Self::RegisterBuyer { .. } | Self::RegisterCompany { .. } | Self::Items | Self::Quote { .. }
        )
    }
}

fn credentials(cli: &Cli) -> Result<(String, String)> {
    let login = cli.login.as_deref().map(str::trim).unwrap_or_default();
    let password = cli.password.as_deref().map(str::trim).unwrap_or_default();
    if login.is_empty() {
        return Err(Error::InvalidField { field: "login" });
    }
    if password.is_empty() {
        return Err(Error::InvalidField { field: "password" });
    }
    Ok((login.to_string(), password.to_string()))
}

fn sign_in(shop: &mut Shop, cli: &Cli) -> Result<Identity> {
    let (login, password) = credentials(cli)?;
    accounts::authenticate(shop, &login, &password)
}

fn registration(cli: &Cli, name: &str, address: &str, phone: &str) -> Registration {
    Registration {
        name: name.trim().to_string(),
        address: address.trim().to_string(),
        phone: phone.trim().to_string(),
        login: cli.login.as_deref().unwrap_or_default().trim().to_string(),
        password: cli.password.as_deref().unwrap_or_default().trim().to_string(),
        key: String::new(),
        avatar_path: String::new(),
    }
}

/// Runs one parsed command against `shop`, writing user-facing output to `out`.
///
/// # Errors
/// Returns the core error of the failed operation, or an IO error if `out`
/// cannot be written.
pub fn run<W: Write>(cli: &Cli, shop: &mut Shop, out: &mut W) -> Result<()> {
    if cli.command.needs_session() {
        sign_in(shop, cli)?;
    }
    debug!("Running {:?}", cli.command);

    match &cli.command {
        Command::RegisterBuyer {
            name,
            address,
            phone,
            avatar,
        } => {
            let form = Registration {
                avatar_path: avatar.trim().to_string(),
                ..registration(cli, name, address, phone)
            };
            let account = accounts::register(shop, Role::Buyer, form)?;
            writeln!(out, "✅ Buyer '{}' registered. You can now log in.", account.login())?;
        }
        Command::RegisterCompany {
            name,
            address,
            phone,
            key,
        } => {
            let form = Registration {
                key: key.trim().to_string(),
                ..registration(cli, name, address, phone)
            };
            let account = accounts::register(shop, Role::Company, form)?;
            writeln!(out, "✅ Company '{}' registered. You can now log in.", account.login())?;
        }
        Command::Items => {
            let items: Vec<_> = catalog::list_items(shop).iter().collect();
            write!(out, "{}", render::items_table(&items))?;
        }
        Command::AddItem {
            name,
            price,
            stock,
            description,
            delivery,
            image,
        } => {
            let owner = shop.session().require_company()?.account_id;
            let fields = NewItem {
                name: name.trim().to_string(),
                price: price.trim().to_string(),
                stock: stock.trim().to_string(),
                description: description.trim().to_string(),
                delivery_eligible: *delivery,
                image_path: image.trim().to_string(),
            };
            let item = catalog::add_item(shop, owner, fields)?;
            writeln!(out, "✅ Item '{}' added with ID {}.", item.name, item.id)?;
        }
        Command::RemoveItem { id } => {
            shop.session().require_company()?;
            let item = catalog::remove_item(shop, *id)?;
            writeln!(out, "✅ Item '{}' removed.", item.name)?;
        }
        Command::Import { file } => {
            let owner = shop.session().require_company()?.account_id;
            let report = import::import_file(shop, owner, file)?;
            writeln!(out, "✅ Imported {} items.", report.imported)?;
            for skipped in &report.skipped {
                writeln!(out, "⚠️  Line {} skipped: {}", skipped.line, skipped.error)?;
            }
        }
        Command::Quote {
            item,
            quantity,
            mode,
        } => {
            let total = orders::quote(shop, item.trim(), quantity.trim(), mode.trim())?;
            writeln!(out, "Total: {}", format_money(total))?;
        }
        Command::Order {
            item,
            quantity,
            mode,
            address,
        } => {
            let buyer = shop.session().require_buyer()?.clone();
            let order = orders::place_order(
                shop,
                &buyer,
                item.trim(),
                quantity.trim(),
                mode.trim(),
                address.trim(),
            )?;
            writeln!(
                out,
                "✅ Order {} placed: {} x '{}', total {}.",
                order.id,
                order.quantity,
                order.item_name,
                format_money(order.total_price)
            )?;
        }
        Command::Orders => {
            let identity = shop.session().require()?;
            let table = match identity.role {
                Role::Buyer => render::orders_table(
                    &orders::list_orders_for(shop, &identity.display_name),
                    false,
                ),
                Role::Company => {
                    let all: Vec<_> = orders::list_all_orders(shop).iter().collect();
                    render::orders_table(&all, true)
                }
            };
            write!(out, "{table}")?;
        }
        Command::SetStatus { order_id, status } => {
            let company = shop.session().require_company()?.clone();
            let status: OrderStatus = status.parse()?;
            let order = orders::advance_status(shop, &company, *order_id, status)?;
            writeln!(out, "✅ Order {} is now {}.", order.id, order.status)?;
        }
        Command::Collect { order_id } => {
            let buyer = shop.session().require_buyer()?.clone();
            let entry = orders::collect_order(shop, &buyer, *order_id)?;
            writeln!(out, "✅ Order {} collected and moved to history.", entry.id)?;
        }
        Command::History => {
            let buyer = shop.session().require_buyer()?;
            let entries = orders::history_for(shop, &buyer.display_name);
            write!(out, "{}", render::history_table(&entries))?;
        }
        Command::Profile => {
            let identity = shop.session().require()?;
            let profile = accounts::profile(shop, identity)?;
            write!(out, "{}", render::profile_card(&profile))?;
        }
    }

    Ok(())
}
