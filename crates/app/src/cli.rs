//! Command-line front end
//!
//! Every subcommand goes through the stores on [`AppState`]; nothing here
//! talks to the backend directly.
//!
//! # Usage
//!
//! ```bash
//! inventory login -e admin@example.com -p secret
//! inventory list --min-price 10 --has-image true --sort-by price --sort-dir desc --page 2
//! inventory create "Desk lamp" --price 24.50 --quantity 12
//! inventory update 7 --quantity 3 --image-url ""
//! inventory delete 7
//! inventory logout
//! ```

use std::fmt::Write as _;

use chrono::Local;
use clap::{Parser, Subcommand};

use inventory_core::pagination::Pager;
use inventory_core::{
    ListQuery, Product, ProductDraft, ProductPatch, Result, Role, Session, SortBy, SortDir,
};

use crate::state::AppState;

/// Inventory client CLI arguments.
#[derive(Parser, Debug, Clone)]
#[command(name = "inventory", version, about = "Manage products in the inventory backend")]
pub struct Cli {
    /// Backend base URL (overrides config and INVENTORY_API_URL).
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Log in and remember the session.
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },

    /// Create an account, then log in.
    Register {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        /// Account role (admin or user).
        #[arg(short, long, default_value_t = Role::User)]
        role: Role,
    },

    /// Forget the stored session.
    Logout,

    /// Show the current session.
    Whoami,

    /// List products.
    List {
        /// Free-text search over name and description.
        #[arg(short = 'q', long)]
        text: Option<String>,

        #[arg(long)]
        min_price: Option<f64>,

        #[arg(long)]
        max_price: Option<f64>,

        #[arg(long)]
        min_qty: Option<i64>,

        /// Only products with (true) or without (false) an image.
        #[arg(long)]
        has_image: Option<bool>,

        /// name, price, quantity or updated_at.
        #[arg(long)]
        sort_by: Option<SortBy>,

        /// asc or desc.
        #[arg(long)]
        sort_dir: Option<SortDir>,

        /// Page to show, starting at 1.
        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Show one product.
    Show { id: i64 },

    /// Create a product.
    Create {
        name: String,

        #[arg(long)]
        price: f64,

        #[arg(long)]
        quantity: i64,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        image_url: Option<String>,
    },

    /// Update some fields of a product. An empty text value clears the field.
    Update {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        price: Option<f64>,

        #[arg(long)]
        quantity: Option<i64>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        image_url: Option<String>,
    },

    /// Delete a product.
    Delete { id: i64 },
}

impl Command {
    /// Build the listing query from the filter flags
    fn list_query(&self) -> Option<ListQuery> {
        let Command::List {
            text,
            min_price,
            max_price,
            min_qty,
            has_image,
            sort_by,
            sort_dir,
            ..
        } = self
        else {
            return None;
        };
        Some(ListQuery {
            text: text.clone(),
            min_price: *min_price,
            max_price: *max_price,
            min_quantity: *min_qty,
            has_image: *has_image,
            sort_by: *sort_by,
            sort_dir: *sort_dir,
        })
    }
}

/// Run one subcommand against the stores.
pub async fn run(command: Command, state: &AppState) -> Result<()> {
    let session = &state.session;
    let products = &state.products;

    match command {
        Command::Login { email, password } => {
            session.login(&email, &password).await?;
            println!("{}", describe_session(&session.session()));
        }
        Command::Register {
            email,
            password,
            role,
        } => {
            session.register(&email, &password, role).await?;
            println!("{}", describe_session(&session.session()));
        }
        Command::Logout => {
            session.logout();
            println!("Logged out.");
        }
        Command::Whoami => println!("{}", describe_session(&session.session())),
        Command::List { page, .. } => {
            session.require_authenticated()?;
            let query = command.list_query().unwrap_or_default();
            products.refresh(&query).await?;

            let snapshot = products.snapshot();

            let mut pager = Pager::new(state.config.page_size);
            pager.observe(snapshot.revision);
            pager.go_to(page, snapshot.items.len());
            print!("{}", render_page(&snapshot.items, &pager));
        }
        Command::Show { id } => {
            session.require_authenticated()?;
            let product = products.fetch(id).await?;
            print!("{}", render_product(&product));
        }
        Command::Create {
            name,
            price,
            quantity,
            description,
            image_url,
        } => {
            require_editor(state)?;
            let mut draft = ProductDraft::new(name, price, quantity);
            if let Some(description) = description {
                draft = draft.with_description(description);
            }
            if let Some(image_url) = image_url {
                draft = draft.with_image_url(image_url);
            }
            let product = products.create(draft).await?;
            println!("Created product {}.", product.id);
            print!("{}", render_product(&product));
        }
        Command::Update {
            id,
            name,
            price,
            quantity,
            description,
            image_url,
        } => {
            require_editor(state)?;
            let patch = ProductPatch {
                name,
                description: description.map(Some),
                price,
                quantity,
                image_url: image_url.map(Some),
            };
            let product = products.update(id, patch).await?;
            println!("Updated product {}.", product.id);
            print!("{}", render_product(&product));
        }
        Command::Delete { id } => {
            require_editor(state)?;
            products.remove(id).await?;
            println!("Deleted product {}.", id);
        }
    }

    Ok(())
}

/// Write commands need a session; the admin check is left to the backend
fn require_editor(state: &AppState) -> Result<()> {
    state.session.require_authenticated()?;
    if !state.session.is_admin() {
        tracing::warn!("Session role is not admin, the backend may refuse this change");
    }
    Ok(())
}

pub fn describe_session(session: &Session) -> String {
    match (&session.identity, session.role) {
        (Some(identity), Some(role)) => format!("Logged in as {} ({}).", identity, role),
        (Some(identity), None) => format!("Logged in as {}.", identity),
        (None, _) => "Not logged in.".to_string(),
    }
}

/// One page of products plus the pager footer
pub fn render_page(items: &[Product], pager: &Pager) -> String {
    let mut out = String::new();
    let Some((first, last)) = pager.visible_range(items.len()) else {
        out.push_str("No products found.\n");
        return out;
    };

    let _ = writeln!(
        out,
        "{:>6}  {:<32} {:>10} {:>8}  {:<5}  {}",
        "ID", "NAME", "PRICE", "QTY", "IMAGE", "UPDATED"
    );
    for product in pager.slice(items) {
        let _ = writeln!(
            out,
            "{:>6}  {:<32} {:>10.2} {:>8}  {:<5}  {}",
            product.id,
            truncate(&product.name, 32),
            product.price,
            product.quantity,
            if product.has_image() { "yes" } else { "-" },
            product.updated_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
        );
    }

    let _ = write!(out, "Showing {}-{} of {}", first, last, items.len());
    if pager.needs_controls(items.len()) {
        let pages: Vec<String> = pager
            .window(items.len())
            .map(|n| {
                if n == pager.page() {
                    format!("[{}]", n)
                } else {
                    n.to_string()
                }
            })
            .collect();
        let _ = write!(
            out,
            "  |  page {} of {}: {}",
            pager.page(),
            pager.total_pages(items.len()),
            pages.join(" ")
        );
    }
    out.push('\n');
    out
}

pub fn render_product(product: &Product) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#{} {}", product.id, product.name);
    let _ = writeln!(out, "  price:       {:.2}", product.price);
    let _ = writeln!(out, "  quantity:    {}", product.quantity);
    if let Some(description) = &product.description {
        let _ = writeln!(out, "  description: {}", description);
    }
    if let Some(url) = &product.image_url {
        let _ = writeln!(out, "  image:       {}", url);
    }
    let _ = writeln!(out, "  updated:     {}", product.updated_at.to_rfc3339());
    out
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{product, FakeApi};
    use inventory_core::{ClientConfig, Database, Error};
    use std::sync::Arc;

    #[test]
    fn test_list_flags_become_query() {
        let cli = Cli::try_parse_from([
            "inventory",
            "list",
            "--min-price",
            "10",
            "--has-image",
            "true",
            "--sort-by",
            "PRICE",
        ])
        .unwrap();

        let query = cli.command.list_query().unwrap();
        assert_eq!(query.min_price, Some(10.0));
        assert_eq!(query.has_image, Some(true));
        assert_eq!(query.sort_by, Some(SortBy::Price));
        assert_eq!(query.sort_dir, None);
    }

    #[tokio::test]
    async fn test_list_reports_expired_credential_as_authentication() {
        let api = Arc::new(
            FakeApi::new()
                .with_account("a@x.io", "pw", Role::Admin)
                .with_products(vec![product(1, "A")]),
        );
        let state = AppState::with_parts(
            ClientConfig::default(),
            api.clone(),
            Box::new(Database::open_in_memory().unwrap()),
        )
        .unwrap();
        state.session.login("a@x.io", "pw").await.unwrap();
        api.backend().reject_list = true;

        let cli = Cli::try_parse_from(["inventory", "list"]).unwrap();
        let err = run(cli.command, &state).await.unwrap_err();

        assert!(matches!(err, Error::Authentication(_)));
    }

    #[test]
    fn test_register_role_defaults_to_user() {
        let cli =
            Cli::try_parse_from(["inventory", "register", "-e", "a@x.io", "-p", "pw"]).unwrap();
        assert!(matches!(cli.command, Command::Register { role: Role::User, .. }));

        let cli = Cli::try_parse_from([
            "inventory", "register", "-e", "a@x.io", "-p", "pw", "--role", "admin",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Register { role: Role::Admin, .. }));

        assert!(Cli::try_parse_from([
            "inventory", "register", "-e", "a@x.io", "-p", "pw", "--role", "root",
        ])
        .is_err());
    }

    #[test]
    fn test_render_page_with_controls() {
        let items: Vec<Product> = (1..=12).map(|i| product(i, &format!("P{}", i))).collect();
        let mut pager = Pager::new(5);
        pager.go_to(2, items.len());

        let out = render_page(&items, &pager);

        assert!(out.contains("P6"));
        assert!(!out.contains("P5 "));
        assert!(out.ends_with("Showing 6-10 of 12  |  page 2 of 3: 1 [2] 3\n"));
    }

    #[test]
    fn test_render_page_single_page_has_no_controls() {
        let items = vec![product(1, "Only")];
        let out = render_page(&items, &Pager::new(5));
        assert!(out.ends_with("Showing 1-1 of 1\n"));
    }

    #[test]
    fn test_render_empty_page() {
        assert_eq!(render_page(&[], &Pager::new(5)), "No products found.\n");
    }

    #[test]
    fn test_describe_session() {
        assert_eq!(describe_session(&Session::empty()), "Not logged in.");
        let session = Session::new("t".into(), "a@x.io".into(), Some(Role::Admin));
        assert_eq!(describe_session(&session), "Logged in as a@x.io (admin).");
        let session = Session::new("t".into(), "a@x.io".into(), None);
        assert_eq!(describe_session(&session), "Logged in as a@x.io.");
    }

    #[test]
    fn test_truncate_long_names() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }
}
