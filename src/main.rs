use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod cache;
mod config;
mod group;
mod inventory;
mod provider;
mod region;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "ec2inv")]
#[command(about = "Generate EC2 inventory for Ansible", long_about = None)]
struct Cli {
    /// List the inventory (accepted for Ansible compatibility; this is the
    /// default and only behavior).
    #[arg(long)]
    list: bool,

    /// Config file path (default: ~/.ec2inv.toml when present).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the inventory payload.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();
    let _ = cli.list; // the tool always lists

    let config = config::load(cli.config.as_deref())?;

    let aws = provider::AwsCli::new(config.instance_filters.clone());
    let builder = inventory::InventoryBuilder::new(config, &aws, &aws)?;
    println!("{}", builder.generate()?);

    Ok(())
}
