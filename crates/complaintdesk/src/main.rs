//! `complaints` - CLI for complaintdesk
//!
//! This binary submits, lists, updates, exports, and imports complaints held
//! in the local complaint database.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::{bail, Context};
use chrono::Utc;
use clap::Parser;

use complaintdesk::cli::{
    Cli, Command, ConfigCommand, ExportCommand, ListCommand, OutputFormat, ShowCommand,
    StatusCommand,
};
use complaintdesk::{
    export_file_name, init_logging, Complaint, ComplaintStatus, ComplaintStore, Config,
    RandomIds, SqliteStore, SystemClock,
};

type Store = ComplaintStore<SqliteStore>;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    // Defaults, then the TOML file, then COMPLAINTDESK_ env overrides
    let config = Config::load_from(cli.config.clone())?;

    // Config commands never touch the database
    match cli.command {
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
        command => {
            let store = open_store(&config)?;
            run(&store, &config, command)
        }
    }
}

fn open_store(config: &Config) -> anyhow::Result<Store> {
    let path = config.database_path();
    let storage = SqliteStore::open(&path)
        .with_context(|| format!("opening complaint database {}", path.display()))?;
    Ok(ComplaintStore::new(
        storage,
        SystemClock,
        RandomIds,
        config.storage.slot_key.clone(),
    ))
}

fn run(store: &Store, config: &Config, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Add(add_cmd) => {
            let id = store.add(add_cmd.into())?;
            println!("Complaint submitted. Your complaint id: {id}");
        }
        Command::List(list_cmd) => handle_list(store, &list_cmd)?,
        Command::Show(show_cmd) => handle_show(store, &show_cmd)?,
        Command::Status(status_cmd) => handle_status(store, &status_cmd)?,
        Command::Delete(delete_cmd) => {
            // Require explicit confirmation
            if !delete_cmd.yes {
                println!("This will delete complaint {}.", delete_cmd.id);
                println!("Use --yes to confirm.");
                return Ok(());
            }
            if store.delete(&delete_cmd.id)? == 0 {
                println!("No complaint with id {}.", delete_cmd.id);
            } else {
                println!("Complaint {} deleted.", delete_cmd.id);
            }
        }
        Command::Export(export_cmd) => handle_export(store, config, &export_cmd)?,
        Command::Import(import_cmd) => {
            let text = std::fs::read_to_string(&import_cmd.file)
                .with_context(|| format!("reading {}", import_cmd.file.display()))?;
            // Rejected imports leave the stored collection untouched
            if !store.import_all(&text)? {
                bail!(
                    "{} is not a JSON array of complaints; nothing was imported",
                    import_cmd.file.display()
                );
            }
            println!("Imported {} complaints.", store.stats()?.total);
        }
        Command::Clear { yes } => {
            if yes {
                store.clear_all()?;
                println!("All complaints cleared.");
            } else {
                println!("This will delete every complaint and cannot be undone.");
                println!("Use --yes to confirm.");
            }
        }
        Command::Stats(stats_cmd) => {
            let stats = store.stats()?;
            if stats_cmd.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("Complaint Statistics");
                println!("====================");
                println!("Total:        {}", stats.total);
                println!("Registered:   {}", stats.registered);
                println!("In progress:  {}", stats.in_progress);
                println!("Resolved:     {}", stats.resolved);
                println!();
                println!("By type:");
                for (kind, count) in &stats.by_type {
                    println!("  {kind}: {count}");
                }
            }
        }
        Command::Check => {
            // Unlike every other read, fail loudly on corrupt data
            let complaints = store.load_strict()?;
            let storage = store.storage();
            println!(
                "Slot '{}' in {} holds {} complaints.",
                store.key(),
                storage.path().display(),
                complaints.len()
            );
            println!("Database size: {} bytes", storage.db_size_bytes());
        }
        Command::Config(config_cmd) => handle_config(config, config_cmd)?,
    }
    Ok(())
}

fn handle_list(store: &Store, cmd: &ListCommand) -> anyhow::Result<()> {
    let filter = cmd.filter();
    let complaints = store.list(&filter)?;

    if cmd.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&complaints)?);
        return Ok(());
    }

    if complaints.is_empty() {
        if filter.is_empty() {
            println!("No complaints found.");
        } else {
            println!("No complaints match your search criteria.");
        }
        return Ok(());
    }

    match cmd.format {
        OutputFormat::Plain => {
            for c in &complaints {
                println!(
                    "{} [{}] {} ({}) - {}",
                    c.id,
                    c.status.as_str().to_uppercase(),
                    c.subject,
                    c.kind,
                    c.date_created.format("%Y-%m-%d")
                );
            }
        }
        OutputFormat::Table | OutputFormat::Json => print_table(&complaints),
    }
    Ok(())
}

fn print_table(complaints: &[Complaint]) {
    let kind_width = complaints
        .iter()
        .map(|c| c.kind.chars().count())
        .max()
        .unwrap_or(0)
        .max("TYPE".len());
    println!(
        "{:<8} {:<10} {:<kind_width$} {:<10} SUBJECT",
        "ID", "STATUS", "TYPE", "CREATED"
    );
    for c in complaints {
        println!(
            "{:<8} {:<10} {:<kind_width$} {:<10} {}",
            c.id,
            c.status.as_str(),
            c.kind,
            c.date_created.format("%Y-%m-%d"),
            c.subject
        );
    }
}

fn handle_show(store: &Store, cmd: &ShowCommand) -> anyhow::Result<()> {
    let Some(c) = store.find_by_id(&cmd.id)? else {
        bail!("no complaint with id {}", cmd.id);
    };
    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&c)?);
    } else {
        println!("{}  {}", c.id, c.status.as_str().to_uppercase());
        println!("{}", c.subject);
        println!();
        println!("Type:        {}", c.kind);
        println!("Name:        {}", c.name);
        println!("Email:       {}", c.email);
        println!("Phone:       {}", c.phone);
        println!("Created:     {}", c.date_created.to_rfc3339());
        println!("Updated:     {}", c.date_updated.to_rfc3339());
        println!();
        println!("{}", c.description);
    }
    Ok(())
}

fn handle_status(store: &Store, cmd: &StatusCommand) -> anyhow::Result<()> {
    let status: ComplaintStatus = cmd.status.into();
    if !store.update_status(&cmd.id, status)? {
        bail!("no complaint with id {}", cmd.id);
    }
    println!("Complaint {} status updated to: {status}", cmd.id);
    Ok(())
}

fn handle_export(store: &Store, config: &Config, cmd: &ExportCommand) -> anyhow::Result<()> {
    let data = store.export_all()?;
    if cmd.stdout {
        println!("{data}");
        return Ok(());
    }

    let dir = cmd.output.clone().unwrap_or_else(|| config.export_dir());
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("creating export directory {}", dir.display()))?;
    let path = dir.join(export_file_name(Utc::now().date_naive()));
    std::fs::write(&path, data).with_context(|| format!("writing {}", path.display()))?;
    println!("Exported to {}", path.display());
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:  {}", config.database_path().display());
                println!("  Slot key:       {}", config.storage.slot_key);
                println!();
                println!("[Export]");
                println!("  Directory:      {}", config.export_dir().display());
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
