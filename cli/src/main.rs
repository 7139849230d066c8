use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use client::api::{auth_api, orders_api, products_api, stock_reports_api, suppliers_api};
use client::{AppContext, ClientConfig, MemoryNavigator, Navigator, Route};
use shared::{RegisterRequest, Theme};
use tracing::level_filters::LevelFilter;
use tracing::{debug, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "OrderSathi shop management from the terminal")]
struct Cli {
    #[clap(flatten)]
    client: ClientConfig,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send a one time password to a phone number or email
    Otp { identifier: String },
    /// Log in with the one time password received
    Login {
        identifier: String,
        #[arg(value_parser = parse_otp)]
        otp: String,
    },
    /// Create a shop account
    Register {
        name: String,
        phone: String,
        email: String,
        shop_name: String,
        #[arg(value_parser = parse_otp)]
        otp: String,
    },
    Logout,
    /// Show the logged user
    Whoami,
    Products,
    Suppliers,
    Orders,
    StockReports,
    /// Save the PDF of an order
    OrderPdf { id: String, out: PathBuf },
    /// Save the PDF of a stock report
    StockReportPdf { id: String, out: PathBuf },
    /// Show or change the theme
    Theme { action: Option<ThemeAction> },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ThemeAction {
    Light,
    Dark,
    Toggle,
}

impl Command {
    /// Screen the command stands for, used as the starting location.
    fn route(&self) -> &'static str {
        match self {
            Command::Otp { .. } | Command::Login { .. } | Command::Logout => Route::LOGIN,
            Command::Register { .. } => Route::REGISTER,
            Command::Whoami => "/profile",
            Command::Products => "/products",
            Command::Suppliers => "/suppliers",
            Command::Orders | Command::OrderPdf { .. } => "/orders",
            Command::StockReports | Command::StockReportPdf { .. } => "/stock-reports",
            Command::Theme { .. } => Route::HOME,
        }
    }
}

fn parse_otp(value: &str) -> Result<String, String> {
    let value = value.trim();
    if (4..=8).contains(&value.len()) && value.chars().all(|c| c.is_ascii_digit()) {
        Ok(value.to_owned())
    } else {
        Err("OTP must be 4 to 8 digits".to_owned())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .init();

    debug!(?cli, "Starting OrderSathi cli");

    let start = cli.command.route();
    let navigator = Arc::new(MemoryNavigator::new(start));
    let ctx = AppContext::open(&cli.client, navigator.clone())?;

    if let Err(error) = run(&ctx, &cli.command).await {
        warn!(?error, "Command failed");
        if navigator.location() == Route::LOGIN && start != Route::LOGIN {
            eprintln!("Session expired, log in again with `ordersathi otp` and `ordersathi login`");
        } else if let Some(error) = error.downcast_ref::<client::Error>() {
            eprintln!("{}", error.user_message());
        } else {
            eprintln!("{error:#}");
        }
        std::process::exit(1);
    }
    Ok(())
}

async fn run(ctx: &AppContext, command: &Command) -> anyhow::Result<()> {
    match command {
        Command::Otp { identifier } => {
            let response = auth_api::request_otp(ctx, identifier).await?;
            println!("{}", response.message.as_deref().unwrap_or("OTP sent"));
        }
        Command::Login { identifier, otp } => {
            let user = auth_api::login(ctx, identifier, otp).await?;
            println!("Logged in as {}", user.display_name());
        }
        Command::Register {
            name,
            phone,
            email,
            shop_name,
            otp,
        } => {
            let request = RegisterRequest {
                name: name.clone(),
                phone: phone.clone(),
                email: email.clone(),
                shop_name: shop_name.clone(),
                otp: otp.clone(),
            };
            let user = auth_api::register(ctx, &request).await?;
            println!("Registered {}", user.display_name());
        }
        Command::Logout => {
            auth_api::logout(ctx).await?;
            println!("Logged out");
        }
        Command::Whoami => {
            require_session(ctx)?;
            let user = auth_api::profile(ctx).await?;
            println!("name:  {}", user.name.as_deref().unwrap_or("-"));
            println!("phone: {}", user.phone.as_deref().unwrap_or("-"));
            println!("email: {}", user.email.as_deref().unwrap_or("-"));
            println!("role:  {}", user.role.as_deref().unwrap_or("-"));
            println!("shop:  {}", user.shop_name.as_deref().unwrap_or("-"));
        }
        Command::Products => {
            require_session(ctx)?;
            for product in products_api::list(&ctx.api).await? {
                println!(
                    "{id}\t{name}\t{quantity} {unit}\t{price}",
                    id = product.id,
                    name = product.name.as_deref().unwrap_or("-"),
                    quantity = product.quantity.unwrap_or_default(),
                    unit = product.unit.as_deref().unwrap_or(""),
                    price = product.price.map(|p| format!("{p:.2}")).unwrap_or_default(),
                );
            }
        }
        Command::Suppliers => {
            require_session(ctx)?;
            for supplier in suppliers_api::list(&ctx.api).await? {
                println!(
                    "{id}\t{name}\t{phone}",
                    id = supplier.id,
                    name = supplier.name.as_deref().unwrap_or("-"),
                    phone = supplier.phone.as_deref().unwrap_or("-"),
                );
            }
        }
        Command::Orders => {
            require_session(ctx)?;
            for order in orders_api::list(&ctx.api).await? {
                println!(
                    "{id}\t{status}\t{items} items\t{total}\t{created}",
                    id = order.id,
                    status = order.status.as_deref().unwrap_or("-"),
                    items = order.items.len(),
                    total = order.total_amount.map(|t| format!("{t:.2}")).unwrap_or_default(),
                    created = order.created_at.map(|at| at.to_rfc3339()).unwrap_or_default(),
                );
            }
        }
        Command::StockReports => {
            require_session(ctx)?;
            for report in stock_reports_api::list(&ctx.api).await? {
                println!(
                    "{id}\t{title}\t{created}",
                    id = report.id,
                    title = report.title.as_deref().unwrap_or("-"),
                    created = report.created_at.map(|at| at.to_rfc3339()).unwrap_or_default(),
                );
            }
        }
        Command::OrderPdf { id, out } => {
            require_session(ctx)?;
            let content = orders_api::pdf(&ctx.api, id).await?;
            save(out, &content)?;
        }
        Command::StockReportPdf { id, out } => {
            require_session(ctx)?;
            let content = stock_reports_api::pdf(&ctx.api, id).await?;
            save(out, &content)?;
        }
        Command::Theme { action } => {
            let theme = match action {
                None => ctx.theme.current(),
                Some(ThemeAction::Light) => set_theme(ctx, Theme::Light),
                Some(ThemeAction::Dark) => set_theme(ctx, Theme::Dark),
                Some(ThemeAction::Toggle) => ctx.theme.toggle(),
            };
            println!("{theme}");
        }
    }
    Ok(())
}

fn require_session(ctx: &AppContext) -> anyhow::Result<()> {
    if !ctx.session.snapshot().logged() {
        bail!("Not logged in, use `ordersathi otp` and `ordersathi login` first");
    }
    Ok(())
}

fn set_theme(ctx: &AppContext, theme: Theme) -> Theme {
    ctx.theme.set(theme);
    theme
}

fn save(out: &Path, content: &[u8]) -> anyhow::Result<()> {
    std::fs::write(out, content).with_context(|| format!("Fail to write {}", out.display()))?;
    println!("Saved {} bytes to {}", content.len(), out.display());
    Ok(())
}
