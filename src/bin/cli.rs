//! seqstore CLI
//!
//! Command-line interface for inspecting and editing a store file.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use seqstore::model::{Article, User, VatRate};
use seqstore::{Config, LoadPolicy, Result, SeqError, Store};
use tracing_subscriber::{fmt, EnvFilter};

/// seqstore CLI
#[derive(Parser, Debug)]
#[command(name = "seqstore-cli")]
#[command(about = "Inspect and edit a seqstore inventory file")]
#[command(version)]
struct Args {
    /// Store file
    #[arg(short, long, default_value = "./seqstore.dat")]
    file: PathBuf,

    /// Keep partially decoded data instead of failing ("strict" or "partial")
    #[arg(long, default_value = "strict")]
    policy: LoadPolicy,

    /// Skip fsync when saving
    #[arg(long)]
    no_sync: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an empty store file
    Init,

    /// Show element counts and capacities
    Stats,

    /// Load the file strictly and report whether it is intact
    Verify,

    /// Append an article
    AddArticle {
        #[arg(long)]
        name: String,

        /// Base price in cents, before VAT
        #[arg(long)]
        price_cents: i64,

        #[arg(long, default_value = "0")]
        stock: i64,

        /// VAT class: normal, intermediate or reduced
        #[arg(long, default_value = "normal")]
        vat: VatRate,
    },

    /// Append a user
    AddUser {
        #[arg(long)]
        name: String,

        /// 9-character tax number
        #[arg(long)]
        nif: String,

        /// 12-character citizen card number
        #[arg(long)]
        cc: String,
    },

    /// List the records of one section
    List {
        #[arg(value_enum)]
        section: ListSection,
    },

    /// Disable the article at an index; orders keep referring to it
    RemoveArticle {
        index: usize,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ListSection {
    Articles,
    Orders,
    Users,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,seqstore=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .data_file(&args.file)
        .load_policy(args.policy)
        .sync_on_save(!args.no_sync)
        .build();

    if let Err(e) = run(&config, args.command) {
        tracing::error!("{}", e);
        process::exit(1);
    }
}

fn run(config: &Config, command: Commands) -> Result<()> {
    match command {
        Commands::Init => {
            Store::new().save(config)?;
            println!("created {}", config.data_file.display());
        }
        Commands::Stats => {
            let (store, report) = Store::open_or_create(config)?;
            println!(
                "articles: {} (capacity {})",
                store.articles.len(),
                store.articles.capacity()
            );
            println!(
                "orders:   {} (capacity {})",
                store.orders.len(),
                store.orders.capacity()
            );
            println!(
                "users:    {} (capacity {})",
                store.users.len(),
                store.users.capacity()
            );
            if !report.is_complete() {
                println!("incomplete load: {}", report.error.unwrap_or_default());
            }
        }
        Commands::Verify => {
            Store::load(&config.data_file, LoadPolicy::Strict)?;
            println!("OK");
        }
        Commands::AddArticle {
            name,
            price_cents,
            stock,
            vat,
        } => {
            let mut store = open_for_update(config)?;
            store
                .articles
                .push(Article::new(name, price_cents).with_stock(stock).with_vat(vat))?;
            store.save(config)?;
            println!("article #{}", store.articles.len() - 1);
        }
        Commands::AddUser { name, nif, cc } => {
            let mut store = open_for_update(config)?;
            store.users.push(User::new(name, &nif, &cc)?)?;
            store.save(config)?;
            println!("user #{}", store.users.len() - 1);
        }
        Commands::List { section } => {
            let (store, _) = Store::open_or_create(config)?;
            match section {
                ListSection::Articles => {
                    for (i, a) in store.articles.iter().enumerate() {
                        println!(
                            "{:>4}  {:<32} {:>10} {:>10} stock {}{}",
                            i,
                            a.name,
                            format_cents(a.price_cents),
                            format_cents(a.price_with_vat_cents()),
                            a.stock,
                            if a.meta.is_disabled() { "  [disabled]" } else { "" }
                        );
                    }
                }
                ListSection::Orders => {
                    for (i, o) in store.orders.iter().enumerate() {
                        println!(
                            "{:>4}  user {:<6} lines {:<4} total {}",
                            i,
                            o.user_id,
                            o.purchases.len(),
                            format_cents(o.total_cents(&store.articles))
                        );
                    }
                }
                ListSection::Users => {
                    for (i, u) in store.users.iter().enumerate() {
                        println!("{:>4}  {:<32} NIF {} CC {}", i, u.name, u.nif_str(), u.cc_str());
                    }
                }
            }
        }
        Commands::RemoveArticle { index } => {
            let mut store = open_for_update(config)?;
            let count = store.articles.len();
            let name = match store.disable_article(index) {
                Some(article) => article.name.clone(),
                None => {
                    println!("no article #{} ({} articles)", index, count);
                    return Ok(());
                }
            };
            store.save(config)?;
            println!("disabled '{}'", name);
        }
    }
    Ok(())
}

/// Load the store for a command that saves it again.
///
/// Saving a partially loaded store would drop every record past the damage,
/// so anything short of a complete load is refused.
fn open_for_update(config: &Config) -> Result<Store> {
    let (store, report) = Store::open_or_create(config)?;
    if !report.is_complete() {
        return Err(SeqError::Corrupt(format!(
            "refusing to modify a partially loaded store ({})",
            report.error.unwrap_or_default()
        )));
    }
    Ok(store)
}

fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}
