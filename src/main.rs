use anyhow::{Result, anyhow};
use clap::{Arg, Command};
use lotto_server::{HttpServer, Settings, service};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("lotto")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Lottery ticketing and settlement server")
        .arg(
            Arg::new("config-check")
                .long("config-check")
                .action(clap::ArgAction::SetTrue)
                .help("Check configuration and database, then exit"),
        )
        .arg(
            Arg::new("bind")
                .long("bind")
                .value_name("HOST:PORT")
                .help("Listen address, overrides LOTTO_HTTP_HOST and LOTTO_HTTP_PORT"),
        )
        .arg(
            Arg::new("database")
                .long("database")
                .value_name("URL")
                .help("SQLite database, overrides DATABASE_URL"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(clap::ArgAction::Count)
                .help("Set verbose output level"),
        )
        .get_matches();

    let log_level = match matches.get_count("verbose") {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    lotto_server::setup(Some(log_level));

    let mut settings = Settings::from_env();
    if let Some(bind) = matches.get_one::<String>("bind") {
        settings = settings.with_bind(bind)?;
    }
    if let Some(database) = matches.get_one::<String>("database") {
        settings.database_url.clone_from(database);
    }

    // check configuration if requested
    if matches.get_flag("config-check") {
        return config_check(&settings).await;
    }

    run_server(settings).await
}

async fn config_check(settings: &Settings) -> Result<()> {
    log::info!("Checking configuration...");

    let pool = lotto_server::build_pool(&settings.database_url, 1)?;
    match service::check_database(&pool).await {
        Ok(()) => log::debug!("Database connection: OK"),
        Err(e) => {
            log::error!("Database connection failed: {e}");
            return Err(anyhow!("Database connection failed: {e}"));
        }
    }

    println!("{settings}");
    log::info!("Configuration check completed successfully");
    Ok(())
}

async fn run_server(settings: Settings) -> Result<()> {
    log::info!("Starting lotto server...");

    let pool = lotto_server::build_pool(&settings.database_url, settings.db_pool_size)?;
    let seeded = service::ensure_default_categories(&pool).await?;
    if seeded > 0 {
        log::info!("Seeded prize tables for {seeded} games");
    }

    let handle = HttpServer::new(pool, &settings).start().await?;

    if let Err(e) = lotto_server::server::shutdown_signal().await {
        log::error!("Signal handler error: {e}");
    }

    handle.shutdown().await?;
    log::info!("Lotto server stopped");
    Ok(())
}
