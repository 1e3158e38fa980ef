//! cinedb - TMDB movie and TV metadata CLI.

/// Application configuration (TOML).
mod config;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use cinedb_api::tmdb::{
    CancellationToken, GenreList, LocalTmdbApi, MovieSummary, Options, Page, TmdbClient,
    TransportConfig, TvSummary,
};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{AppConfig, TmdbConfig, resolve_config_path};

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Response language (e.g. "ja-JP"). Falls back to config, then "en-US".
    #[arg(long, global = true)]
    language: Option<String>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Show movie details.
    Movie(IdArgs),
    /// Show TV series details.
    Tv(IdArgs),
    /// Show the episodes of a TV season.
    Season(SeasonArgs),
    /// Search movies by title.
    SearchMovie(SearchArgs),
    /// Search TV series by name.
    SearchTv(SearchArgs),
    /// List genres.
    Genres(GenresArgs),
    /// Rate a movie with the configured session.
    Rate(RateArgs),
    /// Remove a movie rating.
    Unrate(IdArgs),
    /// Create a request token to approve at themoviedb.org.
    Token,
    /// Manage the user session.
    Session(SessionCommand),
    /// Manage the config file.
    Config(ConfigCommand),
}

/// Arguments for subcommands taking a TMDB ID.
#[derive(clap::Args)]
struct IdArgs {
    /// TMDB ID.
    id: u64,
}

/// Arguments for the `season` subcommand.
#[derive(clap::Args)]
struct SeasonArgs {
    /// TMDB series ID.
    id: u64,

    /// Season number.
    season: u32,
}

/// Arguments for the `search-*` subcommands.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search query.
    query: String,

    /// Result page.
    #[arg(long)]
    page: Option<u32>,
}

/// Arguments for the `genres` subcommand.
#[derive(clap::Args)]
struct GenresArgs {
    /// List TV genres instead of movie genres.
    #[arg(long)]
    tv: bool,
}

/// Arguments for the `rate` subcommand.
#[derive(clap::Args)]
struct RateArgs {
    /// TMDB movie ID.
    id: u64,

    /// Rating from 0.5 to 10.0 in steps of 0.5.
    value: f32,
}

/// Arguments for the `session` subcommand.
#[derive(clap::Args)]
struct SessionCommand {
    /// Session subcommand to run.
    #[command(subcommand)]
    command: SessionSubcommands,
}

/// Available session subcommands.
#[derive(Subcommand)]
enum SessionSubcommands {
    /// Exchange an approved request token for a session id.
    Create {
        /// Approved request token.
        request_token: String,
    },
    /// Invalidate the configured session id.
    Delete,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Write a config template.
    Init,
}

/// Loads the app config from `--dir` or the default location.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let path = resolve_config_path(dir)?;
    AppConfig::load(&path)
}

/// Returns the environment variable value if set and non-empty.
fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Builds a `TmdbClient` from config, with `TMDB_API_KEY` and
/// `TMDB_SESSION_ID` taking precedence over file values.
///
/// # Errors
///
/// Returns an error if no API key is configured, the base URL is invalid,
/// or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(config: &TmdbConfig) -> Result<TmdbClient> {
    let api_key = non_empty_env("TMDB_API_KEY")
        .or_else(|| config.api_key.clone().filter(|k| !k.is_empty()))
        .context("TMDB API key is required (set TMDB_API_KEY or tmdb.api_key)")?;

    let mut transport = TransportConfig::new().user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(timeout) = config.timeout() {
        transport = transport.timeout(timeout);
    }

    let mut builder = TmdbClient::builder()
        .api_key(api_key)
        .transport(transport)
        .retry_limit(config.retry_limit());

    if let Some(base_url) = &config.base_url {
        builder = builder.base_url(
            base_url
                .parse()
                .with_context(|| format!("invalid tmdb.base_url: {base_url}"))?,
        );
    }
    if let Some(session_id) = non_empty_env("TMDB_SESSION_ID").or_else(|| config.session_id.clone())
    {
        builder = builder.session_id(session_id);
    }
    if config.auto_retry {
        builder = builder.auto_retry();
    }
    if config.context_propagation {
        builder = builder.context_propagation();
    }

    builder.build().context("failed to build TMDB client")
}

/// Binds `client` to a token cancelled on Ctrl-C.
///
/// Returns `client` unchanged when context propagation is off or no tokio
/// runtime is running.
fn cancel_on_interrupt(client: TmdbClient) -> TmdbClient {
    if !client.context_propagation() {
        return client;
    }
    let Ok(runtime) = tokio::runtime::Handle::try_current() else {
        return client;
    };

    let token = CancellationToken::new();
    let interrupt = token.clone();
    runtime.spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, cancelling TMDB request");
            interrupt.cancel();
        }
    });
    client.with_cancellation(token)
}

/// Builds the option map sent with read requests.
fn read_options(config: &TmdbConfig, language: Option<&str>, page: Option<u32>) -> Options {
    let mut options = Options::new();
    options.insert(
        String::from("language"),
        String::from(config.language(language)),
    );
    if let Some(page) = page {
        options.insert(String::from("page"), page.to_string());
    }
    options
}

/// Runs the `movie` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_movie(args: &IdArgs, config: &TmdbConfig, language: Option<&str>) -> Result<()> {
    let client = cancel_on_interrupt(build_tmdb_client(config)?);

    let details = client
        .movie_details(args.id, &read_options(config, language, None))
        .await
        .context("TMDB movie details request failed")?;

    tracing::info!("ID: {}", details.id);
    tracing::info!("Title: {}", details.title);
    tracing::info!("Original Title: {}", details.original_title);
    tracing::info!(
        "Release Date: {}",
        details.release_date.as_deref().unwrap_or("-")
    );
    if let Some(runtime) = details.runtime {
        tracing::info!("Runtime: {} min", runtime);
    }
    let genres: Vec<&str> = details.genres.iter().map(|g| g.name.as_str()).collect();
    tracing::info!("Genres: {}", genres.join(", "));
    tracing::info!(
        "Rating: {:.1} ({} votes)",
        details.vote_average,
        details.vote_count
    );
    if let Some(overview) = details.overview.as_deref().filter(|o| !o.is_empty()) {
        tracing::info!("Overview: {}", overview);
    }

    Ok(())
}

/// Runs the `tv` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_tv(args: &IdArgs, config: &TmdbConfig, language: Option<&str>) -> Result<()> {
    let client = cancel_on_interrupt(build_tmdb_client(config)?);

    let details = client
        .tv_details(args.id, &read_options(config, language, None))
        .await
        .context("TMDB tv details request failed")?;

    tracing::info!("ID: {}", details.id);
    tracing::info!("Name: {}", details.name);
    tracing::info!("Original Name: {}", details.original_name);
    tracing::info!(
        "First Air Date: {}",
        details.first_air_date.as_deref().unwrap_or("-")
    );
    tracing::info!("Status: {}", details.status.as_deref().unwrap_or("-"));
    tracing::info!(
        "Seasons: {} ({} episodes)",
        details.number_of_seasons,
        details.number_of_episodes
    );
    tracing::info!("Season\tEpisodes\tAirDate\t\tName");
    for season in &details.seasons {
        tracing::info!(
            "{}\t{}\t\t{}\t{}",
            season.season_number,
            season.episode_count,
            season.air_date.as_deref().unwrap_or("-"),
            season.name,
        );
    }

    Ok(())
}

/// Runs the `season` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_season(args: &SeasonArgs, config: &TmdbConfig, language: Option<&str>) -> Result<()> {
    let client = cancel_on_interrupt(build_tmdb_client(config)?);

    let season = client
        .tv_season(args.id, args.season, &read_options(config, language, None))
        .await
        .context("TMDB tv season request failed")?;

    tracing::info!(
        "Season {}: {}",
        season.season_number,
        season.name.as_deref().unwrap_or("-")
    );
    tracing::info!("Ep\tAirDate\t\tRuntime\tName");
    for episode in &season.episodes {
        tracing::info!(
            "{}\t{}\t{}\t{}",
            episode.episode_number,
            episode.air_date.as_deref().unwrap_or("-"),
            episode
                .runtime
                .map_or_else(|| String::from("-"), |r| format!("{r}m")),
            episode.name,
        );
    }

    Ok(())
}

/// Logs one page of movie search results.
fn log_movie_page(page: &Page<MovieSummary>) {
    tracing::info!(
        "Total results: {} (page {}/{})",
        page.total_results,
        page.page,
        page.total_pages
    );
    tracing::info!("ID\tTitle\t\t\tOrigLang\tReleaseDate");
    for result in &page.results {
        tracing::info!(
            "{}\t{}\t{}\t\t{}",
            result.id,
            result.title,
            result.original_language,
            result.release_date.as_deref().unwrap_or("-"),
        );
    }
}

/// Logs one page of TV search results.
fn log_tv_page(page: &Page<TvSummary>) {
    tracing::info!(
        "Total results: {} (page {}/{})",
        page.total_results,
        page.page,
        page.total_pages
    );
    tracing::info!("ID\tName\t\t\tOrigLang\tCountry\t\tFirstAirDate");
    for result in &page.results {
        tracing::info!(
            "{}\t{}\t{}\t\t{}\t\t{}",
            result.id,
            result.name,
            result.original_language,
            result.origin_country.join(","),
            result.first_air_date.as_deref().unwrap_or("-"),
        );
    }
}

/// Logs a genre list.
fn log_genres(list: &GenreList) {
    for genre in &list.genres {
        tracing::info!("{}\t{}", genre.id, genre.name);
    }
}

/// Runs the `search-movie` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_search_movie(
    args: &SearchArgs,
    config: &TmdbConfig,
    language: Option<&str>,
) -> Result<()> {
    let client = cancel_on_interrupt(build_tmdb_client(config)?);

    let page = client
        .search_movie(&args.query, &read_options(config, language, args.page))
        .await
        .context("TMDB search/movie request failed")?;

    log_movie_page(&page);
    Ok(())
}

/// Runs the `search-tv` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_search_tv(args: &SearchArgs, config: &TmdbConfig, language: Option<&str>) -> Result<()> {
    let client = cancel_on_interrupt(build_tmdb_client(config)?);

    let page = client
        .search_tv(&args.query, &read_options(config, language, args.page))
        .await
        .context("TMDB search/tv request failed")?;

    log_tv_page(&page);
    Ok(())
}

/// Runs the `genres` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_genres(args: &GenresArgs, config: &TmdbConfig, language: Option<&str>) -> Result<()> {
    let client = cancel_on_interrupt(build_tmdb_client(config)?);
    let options = read_options(config, language, None);

    let list = if args.tv {
        client.genre_tv_list(&options).await
    } else {
        client.genre_movie_list(&options).await
    }
    .context("TMDB genre list request failed")?;

    log_genres(&list);
    Ok(())
}

/// Checks a rating is within 0.5..=10.0 and a multiple of 0.5.
fn validate_rating(value: f32) -> Result<()> {
    if !(0.5..=10.0).contains(&value) || value.rem_euclid(0.5) > 0.0 {
        bail!("rating must be between 0.5 and 10.0 in steps of 0.5, got {value}");
    }
    Ok(())
}

/// Runs the `rate` subcommand.
///
/// # Errors
///
/// Returns an error if the rating is out of range, no session is configured,
/// or the API request fails.
#[instrument(skip_all)]
async fn run_rate(args: &RateArgs, config: &TmdbConfig) -> Result<()> {
    validate_rating(args.value)?;
    let client = cancel_on_interrupt(build_tmdb_client(config)?);

    let response = client
        .rate_movie(args.id, args.value)
        .await
        .context("TMDB rate movie request failed")?;

    tracing::info!("{}", response.status_message);
    Ok(())
}

/// Runs the `unrate` subcommand.
///
/// # Errors
///
/// Returns an error if no session is configured or the API request fails.
#[instrument(skip_all)]
async fn run_unrate(args: &IdArgs, config: &TmdbConfig) -> Result<()> {
    let client = cancel_on_interrupt(build_tmdb_client(config)?);

    let response = client
        .delete_movie_rating(args.id)
        .await
        .context("TMDB delete rating request failed")?;

    tracing::info!("{}", response.status_message);
    Ok(())
}

/// Runs the `token` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_token(config: &TmdbConfig) -> Result<()> {
    let client = cancel_on_interrupt(build_tmdb_client(config)?);

    let token = client
        .request_token()
        .await
        .context("TMDB request token request failed")?;

    tracing::info!("Request token: {}", token.request_token);
    tracing::info!("Expires at: {}", token.expires_at);
    tracing::info!(
        "Approve at https://www.themoviedb.org/authenticate/{}",
        token.request_token
    );
    Ok(())
}

/// Runs the `session` subcommands.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_session(command: &SessionSubcommands, config: &TmdbConfig) -> Result<()> {
    let client = cancel_on_interrupt(build_tmdb_client(config)?);

    match command {
        SessionSubcommands::Create { request_token } => {
            let session = client
                .create_session(request_token)
                .await
                .context("TMDB create session request failed")?;
            tracing::info!("Session id: {}", session.session_id);
            tracing::info!("Set tmdb.session_id or TMDB_SESSION_ID to use it");
        }
        SessionSubcommands::Delete => {
            let response = client
                .delete_session()
                .await
                .context("TMDB delete session request failed")?;
            tracing::info!("Session deleted: {}", response.success);
        }
    }
    Ok(())
}

/// Runs the `config init` subcommand.
///
/// # Errors
///
/// Returns an error if the config file already exists or cannot be written.
fn run_config_init(dir: Option<&PathBuf>) -> Result<()> {
    let path = resolve_config_path(dir)?;
    AppConfig::template().create(&path)?;
    tracing::info!("Wrote {}", path.display());
    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    let dir = cli.dir.as_ref();
    let language = cli.language.as_deref();

    let load = || load_config(dir).map(|config| config.tmdb);

    match &cli.command {
        Commands::Movie(args) => run_movie(args, &load()?, language).await,
        Commands::Tv(args) => run_tv(args, &load()?, language).await,
        Commands::Season(args) => run_season(args, &load()?, language).await,
        Commands::SearchMovie(args) => run_search_movie(args, &load()?, language).await,
        Commands::SearchTv(args) => run_search_tv(args, &load()?, language).await,
        Commands::Genres(args) => run_genres(args, &load()?, language).await,
        Commands::Rate(args) => run_rate(args, &load()?).await,
        Commands::Unrate(args) => run_unrate(args, &load()?).await,
        Commands::Token => run_token(&load()?).await,
        Commands::Session(cmd) => run_session(&cmd.command, &load()?).await,
        Commands::Config(cmd) => match cmd.command {
            ConfigSubcommands::Init => run_config_init(dir),
        },
    }
}
