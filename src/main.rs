use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::{Value, json};
use timeline::attachment::validate_attachment;
use timeline::settings::{SettingsStore, ThemeMode};
use timeline::{ErrorRecovery, JoinTracker, MoodTracker, Timeline, normalize_all};

mod api;
mod config;
mod replay;
mod storage;
mod view;

use config::ClientConfig;
use replay::Session;
use storage::FileStorage;
use view::{ViewOptions, build_view};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("missing session token; pass --session-token, set CHATLINE_SESSION_TOKEN, or run `prefs token`")]
    MissingSessionToken,
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    ServerError { status: u16, message: String },
    #[error("missing expected field `{0}`")]
    MissingField(&'static str),
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Timeline(#[from] timeline::TimelineError),
    #[error("invalid theme `{0}`; expected light, dark, or system")]
    InvalidTheme(String),
}

#[derive(Parser, Debug)]
#[command(name = "chatline", about = "Chat timeline reconciliation CLI")]
struct Cli {
    /// Overrides `CHATLINE_BASE_URL`.
    #[arg(long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a message dump (JSON array or `{messages}`) as a clustered view.
    Render {
        #[arg(long, default_value = "-")]
        input: String,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Replay a JSONL channel log and print the resulting view.
    Replay {
        #[arg(long, default_value = "-")]
        input: String,
        #[arg(long, value_enum, default_value_t = RecoveryArg::ClearAll)]
        recovery: RecoveryArg,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Fetch a room's history over REST and render it.
    Fetch {
        #[arg(long)]
        room: String,
        #[arg(long, env = "CHATLINE_SESSION_TOKEN")]
        session_token: Option<String>,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Check an upload before sending it.
    Attach {
        #[arg(long)]
        name: String,
        #[arg(long)]
        mime: String,
        #[arg(long)]
        size: u64,
    },
    Prefs(PrefsCommand),
}

#[derive(Args, Debug)]
struct ViewArgs {
    #[arg(long, env = "CHATLINE_USER", default_value = "")]
    user: String,
    /// Message id treated as hovered.
    #[arg(long)]
    hover: Option<String>,
    /// Show every user's reactions on every message.
    #[arg(long)]
    all_reactions: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RecoveryArg {
    ClearAll,
    Correlated,
}

impl From<RecoveryArg> for ErrorRecovery {
    fn from(value: RecoveryArg) -> Self {
        match value {
            RecoveryArg::ClearAll => Self::ClearAll,
            RecoveryArg::Correlated => Self::Correlated,
        }
    }
}

#[derive(Args, Debug)]
struct PrefsCommand {
    #[command(subcommand)]
    command: PrefsSubcommand,
}

#[derive(Subcommand, Debug)]
enum PrefsSubcommand {
    Show,
    Set {
        #[arg(long)]
        theme: Option<String>,
        #[arg(long)]
        mood_theme: Option<bool>,
        #[arg(long)]
        compact_reactions: Option<bool>,
        #[arg(long)]
        reaction_cap: Option<usize>,
    },
    /// Store the session token used by `fetch`.
    Token { token: String },
    /// Forget stored preferences and the session token.
    Reset,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env()?.with_base_url(cli.base_url.as_deref())?;
    let mut settings = SettingsStore::open(FileStorage::new(&config.state_dir));

    match cli.command {
        Command::Render { input, view } => run_render(&settings, &input, &view),
        Command::Replay { input, recovery, view } => run_replay(&settings, &input, recovery.into(), &view),
        Command::Fetch { room, session_token, view } => {
            run_fetch(&config, &settings, &room, session_token, &view).await
        }
        Command::Attach { name, mime, size } => {
            let kind = validate_attachment(&name, &mime, size)?;
            print_json(&json!({ "name": name, "kind": kind }))
        }
        Command::Prefs(prefs) => run_prefs(&mut settings, prefs),
    }
}

fn run_render(settings: &SettingsStore<FileStorage>, input: &str, args: &ViewArgs) -> Result<(), CliError> {
    let mut raw = String::new();
    open_input(input)?.read_to_string(&mut raw)?;
    let records = api::extract_messages(serde_json::from_str(&raw)?)?;
    render_records(settings, &records, args)
}

fn run_replay(
    settings: &SettingsStore<FileStorage>,
    input: &str,
    recovery: ErrorRecovery,
    args: &ViewArgs,
) -> Result<(), CliError> {
    let mut session = Session::new(&args.user, recovery);
    let mut applied = 0_usize;
    let mut skipped = 0_usize;

    for (number, line) in open_input(input)?.lines().enumerate() {
        match session.apply_line(&line?) {
            Ok(Some(_)) => applied += 1,
            Ok(None) => {}
            Err(error) => {
                skipped += 1;
                tracing::warn!(line = number + 1, %error, "skipping replay line");
            }
        }
    }
    tracing::info!(applied, skipped, "replay finished");

    let mut options = view_options(settings, args);
    options.typing = session.typing_users();
    let view = build_view(session.timeline.messages(), &session.joins, &session.moods, &options);
    print_json(&serde_json::to_value(&view)?)
}

async fn run_fetch(
    config: &ClientConfig,
    settings: &SettingsStore<FileStorage>,
    room: &str,
    session_token: Option<String>,
    args: &ViewArgs,
) -> Result<(), CliError> {
    let token = session_token
        .or_else(|| settings.session_token())
        .ok_or(CliError::MissingSessionToken)?;
    let records = api::fetch_room_messages(config, &token, room).await?;
    render_records(settings, &records, args)
}

fn run_prefs(settings: &mut SettingsStore<FileStorage>, prefs: PrefsCommand) -> Result<(), CliError> {
    match prefs.command {
        PrefsSubcommand::Show => print_serialized(settings.preferences()),
        PrefsSubcommand::Set { theme, mood_theme, compact_reactions, reaction_cap } => {
            let theme = theme
                .map(|raw| ThemeMode::parse(&raw).ok_or(CliError::InvalidTheme(raw)))
                .transpose()?;
            let updated = settings.update(|p| {
                if let Some(theme) = theme {
                    p.theme = theme;
                }
                if let Some(enabled) = mood_theme {
                    p.mood_theme = enabled;
                }
                if let Some(enabled) = compact_reactions {
                    p.compact_reactions = enabled;
                }
                if let Some(cap) = reaction_cap {
                    p.reaction_cap = cap;
                }
            })?;
            print_serialized(updated)
        }
        PrefsSubcommand::Token { token } => {
            settings.set_session_token(token.trim())?;
            eprintln!("session token stored in {}", settings.storage().dir().display());
            Ok(())
        }
        PrefsSubcommand::Reset => {
            settings.reset()?;
            print_serialized(settings.preferences())
        }
    }
}

fn render_records(
    settings: &SettingsStore<FileStorage>,
    records: &[Value],
    args: &ViewArgs,
) -> Result<(), CliError> {
    let messages = normalize_all(records);
    let timeline = Timeline::from_messages(messages);
    let mut moods = MoodTracker::new();
    for message in timeline.messages() {
        moods.observe(message.content());
    }

    let view = build_view(timeline.messages(), &JoinTracker::default(), &moods, &view_options(settings, args));
    print_json(&serde_json::to_value(&view)?)
}

fn view_options(settings: &SettingsStore<FileStorage>, args: &ViewArgs) -> ViewOptions {
    ViewOptions {
        current_user: args.user.clone(),
        hovered: args.hover.clone(),
        hover_all: args.all_reactions,
        preferences: settings.preferences().clone(),
        typing: Vec::new(),
    }
}

fn open_input(input: &str) -> Result<Box<dyn BufRead>, CliError> {
    if input == "-" {
        Ok(Box::new(BufReader::new(io::stdin())))
    } else {
        Ok(Box::new(BufReader::new(File::open(input)?)))
    }
}

fn print_serialized(value: &impl Serialize) -> Result<(), CliError> {
    print_json(&serde_json::to_value(value)?)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
