use std::io::{self, Write};
use std::path::PathBuf;
use std::rc::Rc;

use careermap_client::state::saved::{Category, DEFAULT_RETENTION_DAYS, export_file_name};
use careermap_client::util::clock::now_ms;
use careermap_client::{AppContext, ClientConfig, ClientError};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::Value;

mod file_storage;
mod transport;

use file_storage::FileStorage;
use transport::ReqwestTransport;


#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("http client setup failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Parser, Debug)]
#[command(name = "careermap", about = "CareerMap local data and API diagnostics")]
struct Cli {
    #[arg(long, env = "CAREERMAP_BASE_URL", default_value = "http://127.0.0.1:3000/api")]
    base_url: String,

    #[arg(long, env = "CAREERMAP_DATA_DIR", default_value = "./public", help = "Directory serving /data fallback files")]
    data_dir: PathBuf,

    #[arg(long, env = "CAREERMAP_STATE_FILE", default_value = "./careermap-state.json")]
    state_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the API health endpoint.
    Health,
    /// Fetch a catalogue through the API with static fallback.
    Fetch(FetchArgs),
    Saved(SavedCommand),
    Auth(AuthCommand),
    /// Resolve a translation key. The saved language preference is left as is.
    Translate {
        key: String,
        #[arg(long, default_value = "en")]
        lang: String,
        #[arg(long)]
        fallback: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Resource {
    Careers,
    Interests,
    Business,
    Jobs,
    Languages,
    Translations,
}

#[derive(Args, Debug)]
struct FetchArgs {
    resource: Resource,
    #[arg(long, default_value = "en")]
    lang: String,
}

#[derive(Args, Debug)]
struct SavedCommand {
    #[command(subcommand)]
    command: SavedSubcommand,
}

#[derive(Subcommand, Debug)]
enum SavedSubcommand {
    List {
        #[arg(long, value_parser = parse_category)]
        category: Option<Category>,
    },
    Export {
        #[arg(long, value_parser = parse_category)]
        category: Option<Category>,
        #[arg(long, help = "Output path; defaults to careermap-saved-<scope>-<ms>.json")]
        out: Option<PathBuf>,
    },
    Import {
        file: PathBuf,
    },
    Cleanup {
        #[arg(long, default_value_t = DEFAULT_RETENTION_DAYS)]
        days: u32,
    },
    Usage,
}

#[derive(Args, Debug)]
struct AuthCommand {
    #[command(subcommand)]
    command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
enum AuthSubcommand {
    Status,
    /// Email sign-in with both flags, the demo Google session without.
    SignIn {
        #[arg(long, requires = "password")]
        email: Option<String>,
        #[arg(long, requires = "email")]
        password: Option<String>,
    },
    SignOut,
}

fn parse_category(raw: &str) -> Result<Category, String> {
    Category::parse(raw).ok_or_else(|| format!("expected one of careers, jobs, business; got `{raw}`"))
}

fn build_context(cli: &Cli) -> Result<AppContext, CliError> {
    let config = ClientConfig::instant().with_api_base(&cli.base_url);
    let transport = ReqwestTransport::new(cli.data_dir.clone())?;
    tracing::debug!(state_file = %cli.state_file.display(), data_dir = %cli.data_dir.display(), "opening state");
    Ok(AppContext::with_detected_language(
        config,
        Rc::new(FileStorage::new(cli.state_file.clone())),
        Rc::new(transport),
        None,
    ))
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let ctx = build_context(&cli)?;
    let mut out = io::stdout().lock();
    run(cli.command, &ctx, &mut out).await
}

async fn run(command: Command, ctx: &AppContext, out: &mut impl Write) -> Result<(), CliError> {
    match command {
        Command::Health => {
            let online = ctx.api.check_health().await;
            writeln!(out, "{}", if online { "online" } else { "offline" })?;
            Ok(())
        }
        Command::Fetch(args) => run_fetch(ctx, args, out).await,
        Command::Saved(saved) => run_saved(ctx, saved, out),
        Command::Auth(auth) => run_auth(ctx, auth, out).await,
        Command::Translate { key, lang, fallback } => {
            ctx.i18n.preview_language_code(&lang).await?;
            writeln!(out, "{}", ctx.i18n.t_or(&key, fallback.as_deref().unwrap_or_default()))?;
            Ok(())
        }
    }
}

async fn run_fetch(ctx: &AppContext, args: FetchArgs, out: &mut impl Write) -> Result<(), CliError> {
    let api = &ctx.api;
    let value: Value = match args.resource {
        Resource::Careers => api.careers().placeholders().await?,
        Resource::Interests => api.interests().all().await?,
        Resource::Business => api.business().ideas().await?,
        Resource::Jobs => api.jobs().all().await?,
        Resource::Languages => api.language().languages().await?,
        Resource::Translations => api.language().translations(&args.lang).await?,
    };
    print_json(out, &value)
}

fn run_saved(ctx: &AppContext, saved: SavedCommand, out: &mut impl Write) -> Result<(), CliError> {
    match saved.command {
        SavedSubcommand::List { category } => {
            let store = ctx.saved.borrow();
            let categories = category.map_or(Category::ALL.to_vec(), |c| vec![c]);
            for category in categories {
                for item in store.items(category) {
                    writeln!(
                        out,
                        "{category}\t{}\t{}\t{}",
                        item.id,
                        item.title,
                        ctx.i18n.format_date(item.saved_at)
                    )?;
                }
            }
            Ok(())
        }
        SavedSubcommand::Export { category, out: path } => {
            let document = ctx.saved.borrow().export(category)?;
            let path = path.unwrap_or_else(|| PathBuf::from(export_file_name(category, now_ms())));
            std::fs::write(&path, document)?;
            tracing::info!(path = %path.display(), "exported saved items");
            writeln!(out, "{}", path.display())?;
            Ok(())
        }
        SavedSubcommand::Import { file } => {
            let contents = std::fs::read_to_string(&file)?;
            let imported = ctx.saved.borrow_mut().import(&contents)?;
            writeln!(out, "imported {imported} items")?;
            Ok(())
        }
        SavedSubcommand::Cleanup { days } => {
            let removed = ctx.saved.borrow_mut().cleanup(days);
            writeln!(out, "removed {removed} items older than {days} days")?;
            Ok(())
        }
        SavedSubcommand::Usage => {
            let usage = ctx.saved.borrow().storage_usage();
            #[allow(clippy::cast_precision_loss)]
            let (used, available) = (usage.used as f64, usage.available as f64);
            writeln!(
                out,
                "{} of {} bytes ({}%)",
                ctx.i18n.format_number(used),
                ctx.i18n.format_number(available),
                usage.percentage
            )?;
            Ok(())
        }
    }
}

async fn run_auth(ctx: &AppContext, auth: AuthCommand, out: &mut impl Write) -> Result<(), CliError> {
    match auth.command {
        AuthSubcommand::Status => match ctx.auth.current_user() {
            Some(user) => {
                writeln!(out, "signed in as {} <{}> ({})", user.name, user.email, user.id)?;
                Ok(())
            }
            None => {
                writeln!(out, "signed out")?;
                Ok(())
            }
        },
        AuthSubcommand::SignIn { email, password } => {
            let session = match (email, password) {
                (Some(email), Some(password)) => ctx.auth.sign_in_with_email(&email, &password).await?,
                _ => ctx.auth.sign_in_with_google().await?,
            };
            writeln!(out, "signed in as {} <{}>", session.name, session.email)?;
            Ok(())
        }
        AuthSubcommand::SignOut => {
            ctx.auth.sign_out().await;
            writeln!(out, "signed out")?;
            Ok(())
        }
    }
}

fn print_json(out: &mut impl Write, value: &Value) -> Result<(), CliError> {
    writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}
