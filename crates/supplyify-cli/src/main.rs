use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use supplyify_core::{
    open_from_config, AffiliateLinks, Config, ItemId, SessionToken, StorageBackend, SupplyStatus,
    Supplyify, AFFILIATE_DISCLOSURE,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "supplyify")]
#[command(version, about = "Track household supplies and reorder before they run out", long_about = None)]
struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Account email
    #[arg(long, env = "SUPPLYIFY_EMAIL", global = true)]
    email: Option<String>,

    /// Account password
    #[arg(long, env = "SUPPLYIFY_PASSWORD", global = true, hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Create an account
    Register {
        /// Password again
        #[arg(long, env = "SUPPLYIFY_CONFIRM_PASSWORD", hide_env_values = true)]
        confirm: String,
    },
    /// Print the affiliate search link for a product
    Link {
        /// What to search for, e.g. "laundry detergent"
        query: String,
    },
    /// Add a product to your supply list
    Add {
        /// What to search for, e.g. "laundry detergent"
        query: String,
    },
    /// Show your supply list with depletion estimates
    List {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Change how much is left or how fast it's used
    Update {
        /// Item id as shown by `list`
        id: ItemId,
        /// Units left
        #[arg(long, allow_negative_numbers = true)]
        amount: Option<f64>,
        /// Units used per day
        #[arg(long, allow_negative_numbers = true)]
        usage: Option<f64>,
    },
    /// Remove an item from your supply list
    Remove {
        /// Item id as shown by `list`
        id: ItemId,
    },
    /// Print the effective configuration
    Config {
        /// Also write it to the config file
        #[arg(long)]
        init: bool,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize logging - helps when things go sideways
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "supplyify=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let Some(command) = cli.command else {
        println!("No command specified. Try --help");
        return Ok(());
    };

    // These two don't need storage or an account
    match &command {
        Commands::Config { init } => {
            if *init {
                match &cli.config {
                    Some(path) => config.save_to(path)?,
                    None => config.save()?,
                }
                tracing::info!("Wrote config file");
            }
            print!("{}", toml::to_string_pretty(&config)?);
            return Ok(());
        }
        Commands::Link { query } => {
            let links = AffiliateLinks::from_config(&config.affiliate);
            println!("{}", links.build(query));
            println!("{}", AFFILIATE_DISCLOSURE);
            return Ok(());
        }
        _ => {}
    }

    let mut app = open_from_config(&config)?;
    let credentials = Credentials {
        email: cli.email,
        password: cli.password,
    };

    run(&mut app, &credentials, command)
}

struct Credentials {
    email: Option<String>,
    password: Option<String>,
}

impl Credentials {
    fn email(&self) -> anyhow::Result<&str> {
        self.email
            .as_deref()
            .context("--email or SUPPLYIFY_EMAIL is required")
    }

    fn password(&self) -> anyhow::Result<&str> {
        self.password
            .as_deref()
            .context("--password or SUPPLYIFY_PASSWORD is required")
    }

    fn login<B: StorageBackend>(&self, app: &mut Supplyify<B>) -> anyhow::Result<SessionToken> {
        Ok(app.login(self.email()?, self.password()?)?)
    }
}

fn run<B: StorageBackend>(
    app: &mut Supplyify<B>,
    credentials: &Credentials,
    command: Commands,
) -> anyhow::Result<()> {
    match command {
        Commands::Register { confirm } => {
            let email = credentials.email()?;
            app.register(email, credentials.password()?, &confirm)?;
            println!("Account created for {}. You can now log in.", email);
        }
        Commands::Add { query } => {
            let token = credentials.login(app)?;
            let item = app.registry(&token)?.add_from_query(&query)?;
            println!("Added '{}' to your list (id {})", item.name, item.id);
            println!("View on Amazon: {}", item.link);
            app.logout(&token);
        }
        Commands::List { json } => {
            let token = credentials.login(app)?;
            let statuses = app.registry(&token)?.statuses(chrono::Utc::now())?;

            if json {
                println!("{}", serde_json::to_string_pretty(&statuses)?);
            } else if statuses.is_empty() {
                println!("Your supply list is empty. Try `supplyify add <query>`.");
            } else {
                println!("Logged in as: {}", app.whoami(&token)?);
                for status in &statuses {
                    println!("{}", render_status(status));
                }
                println!("---");
                println!("{}", AFFILIATE_DISCLOSURE);
            }
            app.logout(&token);
        }
        Commands::Update { id, amount, usage } => {
            if amount.is_none() && usage.is_none() {
                anyhow::bail!("Nothing to update. Pass --amount and/or --usage");
            }
            let token = credentials.login(app)?;
            app.registry(&token)?.update(id, amount, usage)?;
            println!("Updated item {}", id);
            app.logout(&token);
        }
        Commands::Remove { id } => {
            let token = credentials.login(app)?;
            app.registry(&token)?.remove(id)?;
            println!("Removed item {}", id);
            app.logout(&token);
        }
        Commands::Config { .. } | Commands::Link { .. } => unreachable!("handled before opening storage"),
    }

    Ok(())
}

/// One list entry: name, quantities, estimate and reorder link
fn render_status(status: &SupplyStatus) -> String {
    let item = &status.item;
    let mut out = format!(
        "[{}] {}\n    Units left: {}  Units used per day: {}\n",
        item.id, item.name, item.amount_left, item.usage_per_day
    );

    match &status.estimate {
        Some(estimate) => {
            out.push_str(&format!(
                "    Estimated days remaining: {:.1} days (Reorder by {})\n",
                estimate.days_left,
                estimate.reorder_date()
            ));
            if estimate.low_stock {
                out.push_str(&format!(
                    "    ⚠️ Low stock alert for {}! Consider reordering soon.\n",
                    item.name
                ));
            }
        }
        None => out.push_str("    No estimate: set a usage rate above zero\n"),
    }

    out.push_str(&format!("    Reorder on Amazon: {}", item.link));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use supplyify_core::estimate;

    fn status(amount_left: f64, usage_per_day: f64) -> SupplyStatus {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        SupplyStatus {
            item: supplyify_core::SupplyItem {
                id: ItemId(4),
                name: "coffee".into(),
                link: "https://www.amazon.com/s?k=coffee&tag=t-20".into(),
                amount_left,
                usage_per_day,
                added_on: now,
            },
            estimate: estimate(amount_left, usage_per_day, now).ok(),
        }
    }

    #[test]
    fn test_render_with_estimate() {
        let out = render_status(&status(10.0, 2.0));
        assert!(out.starts_with("[4] coffee"));
        assert!(out.contains("Estimated days remaining: 5.0 days (Reorder by 2024-06-06)"));
        assert!(!out.contains("Low stock"));
        assert!(out.ends_with("https://www.amazon.com/s?k=coffee&tag=t-20"));
    }

    #[test]
    fn test_render_low_stock() {
        let out = render_status(&status(2.0, 1.0));
        assert!(out.contains("Low stock alert for coffee"));
    }

    #[test]
    fn test_render_without_estimate() {
        let out = render_status(&status(5.0, 0.0));
        assert!(out.contains("No estimate"));
        assert!(!out.contains("Reorder by"));
    }

    #[test]
    fn test_cli_parses_update() {
        let cli = Cli::try_parse_from([
            "supplyify", "update", "7", "--amount", "3.5", "--usage", "-1",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Update { id, amount, usage }) => {
                assert_eq!(id, ItemId(7));
                assert_eq!(amount, Some(3.5));
                assert_eq!(usage, Some(-1.0));
            }
            _ => panic!("expected update command"),
        }
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
