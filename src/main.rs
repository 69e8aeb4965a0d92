//! vaultcmd - run note-vault commands from the terminal.
//!
//! Opens a directory as a vault, registers the built-in commands and drives
//! the palette and context menus the way a host application would.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vaultcmd::builtin::builtin_commands;
use vaultcmd::core::{AbstractFile, Command, CommandRegistry, Config};
use vaultcmd::host::{DiskVault, Menu, Vault};
use vaultcmd::PluginContext;

/// Run note-vault commands from the terminal
#[derive(Parser)]
#[command(name = "vaultcmd")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,

    /// Vault directory
    #[arg(long, global = true, default_value = ".", env = "VAULTCMD_VAULT")]
    vault: PathBuf,

    /// Vault-relative path of the active file
    #[arg(long, global = true)]
    active: Option<String>,

    /// Configuration file to use instead of the default locations
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List palette commands and whether they can run now
    List {
        /// Fuzzy filter
        #[arg(short, long)]
        query: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Run a palette command by id
    Run {
        /// Command id, short (`archive-note`) or full (`vaultcmd:archive-note`)
        id: String,
    },

    /// Show the context menu for one or more entries
    Menu {
        /// Vault-relative paths
        #[arg(required = true)]
        paths: Vec<String>,

        /// Where the menu was opened from
        #[arg(short, long, default_value = "file-explorer")]
        source: String,
    },

    /// Click a context menu entry
    Click {
        /// Menu item title
        title: String,

        /// Vault-relative paths
        #[arg(required = true)]
        paths: Vec<String>,

        /// Where the menu was opened from
        #[arg(short, long, default_value = "file-explorer")]
        source: String,
    },

    /// Show configuration
    Config {
        /// Show config file path
        #[arg(long, conflicts_with = "init")]
        path: bool,

        /// Write the default configuration file
        #[arg(long)]
        init: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Serialize)]
struct ListEntry<'a> {
    full_id: String,
    #[serde(flatten)]
    command: &'a Command,
    available: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose { EnvFilter::new("debug") } else { EnvFilter::new("warn") };

    tracing_subscriber::registry().with(fmt::layer().with_target(false)).with(filter).init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::List { query, format } => {
            let registry = open_registry(&cli.vault, cli.active.as_deref(), &config)?;
            cmd_list(&registry, query.as_deref(), format)?;
        }
        Commands::Run { id } => {
            let registry = open_registry(&cli.vault, cli.active.as_deref(), &config)?;
            cmd_run(&registry, &id).await?;
        }
        Commands::Menu { paths, source } => {
            let (registry, vault) = open_vault(&cli.vault, cli.active.as_deref(), &config)?;
            let menu = build_menu(&registry, vault.as_ref(), &paths, &source)?;
            print_menu(&menu);
        }
        Commands::Click { title, paths, source } => {
            let (registry, vault) = open_vault(&cli.vault, cli.active.as_deref(), &config)?;
            let menu = build_menu(&registry, vault.as_ref(), &paths, &source)?;
            cmd_click(&menu, &title).await?;
        }
        Commands::Config { path, init } => {
            cmd_config(&config, path, init)?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Config::load(),
    }
}

fn open_vault(
    root: &Path,
    active: Option<&str>,
    config: &Config,
) -> Result<(CommandRegistry, Arc<dyn Vault>)> {
    let disk = DiskVault::open(root)?;
    if let Some(active) = active {
        let file = disk
            .get_file_by_path(active)
            .ok_or_else(|| anyhow::anyhow!("Active file not found: {active}"))?;
        disk.set_active_file(Some(file));
    }
    let vault: Arc<dyn Vault> = Arc::new(disk);

    let context = PluginContext::from_config(config, Arc::clone(&vault));
    let mut registry = CommandRegistry::with_config(config);
    let registered = registry.register_all(builtin_commands(&context))?;
    tracing::debug!(registered, vault = %root.display(), "Opened vault");

    Ok((registry, vault))
}

fn open_registry(root: &Path, active: Option<&str>, config: &Config) -> Result<CommandRegistry> {
    open_vault(root, active, config).map(|(registry, _)| registry)
}

/// List palette commands.
fn cmd_list(registry: &CommandRegistry, query: Option<&str>, format: Format) -> Result<()> {
    let available: Vec<String> = registry.available(None).iter().map(|c| c.full_id()).collect();
    let entries: Vec<ListEntry<'_>> = registry
        .search(query.unwrap_or(""))
        .into_iter()
        .filter_map(|index| registry.get_by_index(index))
        .map(|registration| {
            let full_id = registration.command.full_id();
            let available = available.contains(&full_id);
            ListEntry { full_id, command: &registration.command, available }
        })
        .collect();

    match format {
        Format::Json => {
            let json = serde_json::to_string_pretty(&entries)?;
            println!("{json}");
        }
        Format::Text => {
            for entry in &entries {
                let marker = if entry.available { "*" } else { " " };
                println!("{marker} {} - {} [{}]", entry.full_id, entry.command.name, entry.command.kind);
            }
            println!("\nTotal: {} commands ({} available)", entries.len(), available.len());
        }
    }

    Ok(())
}

/// Run a palette command and wait for it.
async fn cmd_run(registry: &CommandRegistry, id: &str) -> Result<()> {
    let invoked = registry.check(id, false)?;
    if !invoked.wait().await? {
        anyhow::bail!("Command '{id}' cannot run right now");
    }
    println!("Ran {id}");
    Ok(())
}

/// Build the file menu for one entry or the files menu for several.
fn build_menu(
    registry: &CommandRegistry,
    vault: &dyn Vault,
    paths: &[String],
    source: &str,
) -> Result<Menu> {
    let entries = paths
        .iter()
        .map(|path| {
            vault
                .get_abstract_file_by_path(path)
                .ok_or_else(|| anyhow::anyhow!("No such file or folder: {path}"))
        })
        .collect::<Result<Vec<AbstractFile>>>()?;

    Ok(match entries.as_slice() {
        [entry] => registry.file_menu(entry, source),
        entries => registry.files_menu(entries, source),
    })
}

fn print_menu(menu: &Menu) {
    if menu.is_empty() {
        println!("No menu items");
        return;
    }
    for item in menu.items() {
        match item.section() {
            Some(section) => println!("[{section}] {}", item.title()),
            None => println!("{}", item.title()),
        }
    }
}

/// Click a menu item and wait for its command.
async fn cmd_click(menu: &Menu, title: &str) -> Result<()> {
    let invoked = menu
        .find(title)
        .and_then(|item| item.click())
        .ok_or_else(|| anyhow::anyhow!("No menu item titled '{title}'"))?;
    if !invoked.wait().await? {
        anyhow::bail!("'{title}' cannot run right now");
    }
    println!("Ran {title}");
    Ok(())
}

/// Show configuration.
fn cmd_config(config: &Config, show_path: bool, init: bool) -> Result<()> {
    if show_path {
        if let Some(path) = Config::config_path() {
            println!("{}", path.display());
        }
        return Ok(());
    }

    if init {
        let path = Config::default().save()?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let toml = toml::to_string_pretty(config)?;
    println!("{toml}");

    Ok(())
}
