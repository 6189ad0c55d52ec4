use std::path::Path;

use anyhow::anyhow;
use clap::Parser;
use env_logger::Env;

use crate::profile::ProfileRegistry;
use crate::transaction::TransactionSet;

mod csv_reader;
mod error;
mod profile;
mod report;
mod transaction;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Transaction CSV file
    file: String,

    /// Profile used to map CSV columns onto transaction fields
    #[clap(short, long, default_value = "amex")]
    profile: String,

    /// TOML file with extra profile definitions
    #[clap(long)]
    profiles_file: Option<String>,

    /// Print every transaction instead of the one-line summary
    #[clap(long)]
    print: bool,

    /// Print count and subtotal per category
    #[clap(long)]
    by_category: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli: Cli = Cli::parse();

    let registry = match &cli.profiles_file {
        Some(file) => ProfileRegistry::load_from_file(file)?,
        None => ProfileRegistry::builtin(),
    };
    let profile = registry
        .get(&cli.profile)
        .ok_or_else(|| anyhow!("unknown profile '{}'", cli.profile))?
        .clone();

    let activity = TransactionSet::from_csv(profile, Path::new(&cli.file))?;

    if cli.print {
        report::print_transactions(&activity);
    } else if cli.by_category {
        report::print_category_summary(&activity);
    } else {
        println!("{activity}");
    }

    Ok(())
}
