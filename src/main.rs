use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

use tmdb_dashboard::apis::{parse_results, CatalogClient};
use tmdb_dashboard::app::{DashboardUseCase, ViewState};
use tmdb_dashboard::common::constants::{DEFAULT_CONFIG_PATH, DEFAULT_OUTPUT_DIR};
use tmdb_dashboard::config::{self, Config};
use tmdb_dashboard::infra::ReqwestHttp;
use tmdb_dashboard::logging;
use tmdb_dashboard::pipeline::processing::{FilterDimension, SortDirection, SortField, SortState};
use tmdb_dashboard::report;

#[derive(Parser)]
#[command(name = "tmdb_dashboard")]
#[command(about = "Movie/TV catalog analytics from the TMDB API")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the view configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch views and show their tables, distributions and rollups
    Show {
        /// Views to show (repeatable). Defaults to every configured view
        #[arg(long = "view")]
        views: Vec<String>,

        #[command(flatten)]
        controls: ViewControls,
    },
    /// List configured views
    Views,
    /// Run the pipeline over a saved `{ "results": [...] }` JSON file
    Analyze {
        /// Saved catalog response
        #[arg(long)]
        input: PathBuf,

        /// Name used for the view in output
        #[arg(long, default_value = "offline")]
        name: String,

        #[command(flatten)]
        controls: ViewControls,
    },
}

/// Filter and sort controls shared by `show` and `analyze`
#[derive(Args, Debug, Default)]
struct ViewControls {
    /// Case-insensitive match against title or cast
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    genre: Option<String>,
    #[arg(long)]
    year: Option<String>,
    #[arg(long)]
    country: Option<String>,
    /// movie, tv or unknown
    #[arg(long)]
    media_type: Option<String>,
    #[arg(long)]
    min_rating: Option<String>,

    /// Column to rank by (rating, year, title, votes, nominations, wins, media_type)
    #[arg(long)]
    sort: Option<String>,
    /// Rank ascending instead of descending
    #[arg(long)]
    asc: bool,
    /// Simulate header clicks, applied in order after --sort
    #[arg(long = "toggle-sort")]
    toggle_sort: Vec<String>,

    /// Print the view as JSON instead of text
    #[arg(long)]
    json: bool,
    /// Also write each view to <DIR>/<view>_<timestamp>.json
    #[arg(long, num_args = 0..=1, default_missing_value = DEFAULT_OUTPUT_DIR)]
    output: Option<PathBuf>,
}

impl ViewControls {
    fn apply(&self, use_case: &mut DashboardUseCase) -> anyhow::Result<()> {
        let filters = [
            (FilterDimension::Search, &self.search),
            (FilterDimension::Genre, &self.genre),
            (FilterDimension::Year, &self.year),
            (FilterDimension::Country, &self.country),
            (FilterDimension::MediaType, &self.media_type),
            (FilterDimension::MinRating, &self.min_rating),
        ];
        for (dimension, value) in filters {
            if let Some(value) = value {
                use_case.set_filter(dimension, value)?;
            }
        }

        if let Some(field) = &self.sort {
            let direction = if self.asc { SortDirection::Asc } else { SortDirection::Desc };
            use_case.set_sort(SortState { field: field.parse()?, direction });
        } else if self.asc {
            use_case.set_sort(SortState { direction: SortDirection::Asc, ..SortState::default() });
        }
        for field in &self.toggle_sort {
            use_case.toggle_sort(field.parse::<SortField>()?);
        }
        Ok(())
    }

    fn emit(&self, use_case: &DashboardUseCase) -> anyhow::Result<()> {
        match use_case.state() {
            ViewState::Ready => {}
            ViewState::Failed(message) => {
                println!("\n❌ {}: {}", use_case.view_name(), message);
                return Ok(());
            }
            ViewState::Loading => {
                println!("\n⏳ {}: still loading", use_case.view_name());
                return Ok(());
            }
        }

        let Some(view) = use_case.current_view() else {
            return Ok(());
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&view)?);
        } else {
            print!("{}", report::render_text(&view));
        }

        if let Some(dir) = &self.output {
            let path = report::persist_to_json(&view, dir)?;
            info!("Saved view {} to {}", view.view, path);
            println!("💾 Saved {}", path);
        }
        Ok(())
    }
}

async fn run_views(config: &Config, names: &[String], controls: &ViewControls) -> anyhow::Result<()> {
    let api_key = config::api_key().context("TMDB API key missing; set TMDB_API_KEY or add it to .env")?;
    let http = Arc::new(ReqwestHttp::new(config.api.timeout_seconds));

    let selected: Vec<_> = if names.is_empty() {
        config.views.iter().collect()
    } else {
        names
            .iter()
            .filter_map(|name| {
                let view = config.view(name);
                if view.is_none() {
                    warn!("Unknown view {}", name);
                    println!("⚠️  Unknown view: {}", name);
                }
                view
            })
            .collect()
    };

    for view_cfg in selected {
        info!("Refreshing view {} ({})", view_cfg.name, view_cfg.endpoint);
        let client = CatalogClient::new(http.clone(), config.base_url_for(view_cfg), api_key.clone());
        let mut use_case = DashboardUseCase::new(&view_cfg.name, &view_cfg.endpoint);
        controls.apply(&mut use_case)?;
        use_case.refresh(&client).await;

        if let Err(e) = controls.emit(&use_case) {
            error!("Failed to emit view {}: {}", view_cfg.name, e);
        }
    }
    Ok(())
}

fn analyze_file(input: &PathBuf, name: &str, controls: &ViewControls) -> anyhow::Result<()> {
    let bytes = std::fs::read(input).with_context(|| format!("Reading {}", input.display()))?;
    let source = input.display().to_string();

    let mut use_case = DashboardUseCase::new(name, source.clone());
    controls.apply(&mut use_case)?;
    use_case.apply_fetch(parse_results(&source, &bytes));
    controls.emit(&use_case)?;

    if let ViewState::Failed(message) = use_case.state() {
        bail!("could not analyze {}: {}", source, message);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Show { views, controls } => {
            info!("Showing {} view(s)", if views.is_empty() { config.views.len() } else { views.len() });
            run_views(&config, &views, &controls).await?;
        }
        Commands::Views => {
            for view in &config.views {
                println!("{:<16} {}/{}", view.name, config.base_url_for(view).trim_end_matches('/'), view.endpoint);
            }
        }
        Commands::Analyze { input, name, controls } => {
            analyze_file(&input, &name, &controls)?;
        }
    }
    Ok(())
}
