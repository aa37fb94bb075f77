use actix_web::{middleware, web, App, HttpServer};
use clap::{Parser, Subcommand};
use grade_poller::api::{configure_routes, AppState};
use grade_poller::banner;
use grade_poller::config::PollerConfig;
use grade_poller::dom::Document;
use grade_poller::errors::{PollError, Result};
use grade_poller::navigation::{BrowserNavigator, RegradeControl};
use grade_poller::poller::{CycleOutcome, ResultsPoller};
use grade_poller::source::HttpSource;
use grade_poller::view::Endpoints;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(
    name = "grade-poller",
    version,
    about = "Poll a challenge server and show live grading results"
)]
struct Cli {
    /// TOML config file. Defaults to the user config dir; env vars override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Challenge server base URL, e.g. http://challenge.us
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Poll period in milliseconds
    #[arg(long, global = true)]
    interval_ms: Option<u64>,

    /// Referer header expected by the challenge server
    #[arg(long, global = true)]
    referer: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll continuously and serve the live results page (default)
    Watch {
        /// Address to serve the results page on
        #[arg(long)]
        listen: Option<String>,
    },
    /// Fetch once and print the rendered results HTML
    Once,
    /// Open the task list so tasks can be re-graded
    Regrade,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    // A missing .env is fine; settings may come from the real environment.
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = load_config(&cli).map_err(std::io::Error::other)?;

    match cli.command.unwrap_or(Command::Watch { listen: None }) {
        Command::Watch { listen } => {
            let config = PollerConfig {
                listen: listen.unwrap_or(config.listen.clone()),
                ..config
            };
            watch(config).await
        }
        Command::Once => once(&config).await.map_err(std::io::Error::other),
        Command::Regrade => RegradeControl::new(config.tasks_url())
            .activate(&BrowserNavigator)
            .map_err(std::io::Error::other),
    }
}

fn load_config(cli: &Cli) -> Result<PollerConfig> {
    let default_path = PollerConfig::default_path().filter(|p| p.is_file());
    let mut config = match cli.config.clone().or(default_path) {
        Some(path) => {
            log::info!("Loading configuration from {}", path.display());
            let mut config = PollerConfig::from_file(&path)?;
            // GRADE_POLLER_* variables still win over the file.
            config.apply_env()?;
            config
        }
        None => PollerConfig::from_env()?,
    };

    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(ms) = cli.interval_ms {
        config.interval_ms = ms;
    }
    if let Some(referer) = &cli.referer {
        config.referer = Some(referer.clone()).filter(|r| !r.trim().is_empty());
    }
    config.validate()?;
    Ok(config)
}

async fn watch(config: PollerConfig) -> std::io::Result<()> {
    banner::print_banner();

    let source = HttpSource::from_config(&config).map_err(std::io::Error::other)?;
    log::info!("Polling {}", source.url());

    let document = Document::with_container(&config.container_id);
    let poller = ResultsPoller::initialize(&document, &config, Arc::new(source))
        .await
        .ok_or_else(|| {
            std::io::Error::other(format!("no '#{}' container", config.container_id))
        })?;

    let listen = config.listen.clone();
    let state = AppState::new(config, poller);
    let poller = Arc::clone(&state.poller);

    println!("📊 Results page available at http://{}/results", listen);

    let result = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(middleware::Logger::default())
            .configure(configure_routes)
    })
    .bind(listen.as_str())?
    .run()
    .await;

    poller.stop();
    result
}

async fn once(config: &PollerConfig) -> Result<()> {
    let source = HttpSource::from_config(config)?;
    let document = Document::with_container(&config.container_id);
    let container = document
        .get_element_by_id(&config.container_id)
        .ok_or_else(|| PollError::Config(format!("no '#{}' container", config.container_id)))?;

    let poller = ResultsPoller::new(
        container,
        Arc::new(source),
        Endpoints::new(config.tasks_url()),
        config.interval(),
    );

    match poller.fetch_and_render().await {
        CycleOutcome::Failed(e) => Err(e),
        _ => {
            println!("{}", poller.container().read().await.outer_html());
            Ok(())
        }
    }
}
