//! Command-line entry point for backup and restore.
//!
//! # Responsibility
//! - Wire a SQLite-backed store to the core backup service.
//! - Keep output deterministic for scripting.
//!
//! Usage: `kith_cli [ping|stats|export [FILE]|import FILE]`, configured via
//! `KITH_DB_PATH`, `KITH_LOG_DIR`, `KITH_LOG_LEVEL`, `KITH_STORAGE_QUOTA_BYTES`.

use kith_core::db::open_db;
use kith_core::{
    init_logging, BackupService, EntityCollection, KithConfig, Repository, SqliteStore,
    StoreCategoryRepository, StoreCheckInRepository, StoreContactRepository,
};
use log::info;
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<(), Box<dyn Error>> {
    let command = args.first().map(String::as_str).unwrap_or("ping");
    if command == "ping" {
        println!("kith_core ping={}", kith_core::ping());
        println!("kith_core version={}", kith_core::core_version());
        return Ok(());
    }

    let config = KithConfig::from_env()?;
    if let Some(logging) = &config.logging {
        init_logging(logging)?;
    }

    let conn = open_db(&config.db_path)?;
    let store = SqliteStore::with_quota(&conn, config.storage_quota_bytes);
    let contacts = StoreContactRepository::new(&store);
    let categories = StoreCategoryRepository::new(&store);
    let check_ins = StoreCheckInRepository::new(&store);
    info!("event=cli_command module=cli status=start command={command}");

    match command {
        "stats" => {
            println!("contacts={}", contacts.find_all()?.size());
            println!("categories={}", categories.find_all()?.size());
            println!("check_ins={}", check_ins.find_all()?.size());
        }
        "export" => {
            let backup = BackupService::new(&contacts, &categories, &check_ins).create_backup()?;
            match args.get(1) {
                Some(path) => std::fs::write(path, backup)?,
                None => println!("{backup}"),
            }
        }
        "import" => {
            let path = args.get(1).ok_or("import requires a backup file path")?;
            let raw = std::fs::read_to_string(path)?;
            let service = BackupService::new(&contacts, &categories, &check_ins);
            match service.import_from_str(&raw) {
                Ok(summary) => println!(
                    "imported contacts={} categories={} check_ins={}",
                    summary.contacts, summary.categories, summary.check_ins
                ),
                Err(err) => {
                    if !err.nothing_imported() {
                        eprintln!("warning: backup was partially imported");
                    }
                    return Err(err.into());
                }
            }
        }
        other => return Err(format!("unknown command `{other}`").into()),
    }

    Ok(())
}
