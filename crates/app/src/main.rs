use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context as _;
use directories::ProjectDirs;
use photodb_application::{AppContext, CatalogStore, LoadSource};
use photodb_ingest::IngestWorker;
use photodb_storage::Storage;
use photodb_ui::Ui;
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:?}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let project_dirs =
        ProjectDirs::from("dev", "photodb", "photodb").context("resolve project dirs")?;

    let config_dir = project_dirs.config_dir();
    fs::create_dir_all(config_dir)
        .with_context(|| format!("create config dir {}", config_dir.display()))?;
    let data_dir = project_dirs.data_dir();
    fs::create_dir_all(data_dir)
        .with_context(|| format!("create data dir {}", data_dir.display()))?;

    init_logging(&data_dir.join("photodb.log"))?;

    let db_path = database_path(config_dir);
    tracing::info!(db = %db_path.display(), "opening catalog database");
    let storage = Storage::open(&db_path)?;
    let settings = storage.load_settings()?;
    storage.save_settings(&settings)?;

    let store = CatalogStore::load(storage.into_slot(settings.storage_key.clone()));
    if store.source() == LoadSource::Samples {
        tracing::info!("starting from the sample catalog");
    }

    let worker = IngestWorker::spawn()?;
    let ctx = Ui::new(AppContext::new(settings, store), worker).run()?;
    ctx.store.slot().storage().save_settings(&ctx.settings)?;

    if let Some(err) = ctx.store.last_persist_error() {
        tracing::warn!(error = %err, "exiting with unsaved changes");
        eprintln!("warning: last change was not saved: {err}");
    }
    Ok(())
}

fn database_path(config_dir: &Path) -> PathBuf {
    match std::env::var_os("PHOTODB_DB") {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => config_dir.join("photodb.db"),
    }
}

fn init_logging(log_path: &Path) -> anyhow::Result<()> {
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("open log file {}", log_path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| anyhow::anyhow!("install log subscriber: {err}"))
}
