use clap::{error::ErrorKind, Args, CommandFactory, Parser, Subcommand};
use kicklog::{
    config::{Config, ConfigStore, FileConfigStore},
    kick::{keys, KickFields},
    render::ReportFormat,
    store::{SessionStore, SqliteSessionStore},
    KickError, SessionManager,
};
use std::{
    error::Error,
    fs::{self, File},
    io::{self, Write},
    path::PathBuf,
};
use tracing_subscriber::EnvFilter;

/// special-teams practice kick tracker
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Record field goals, kickoffs and punts during practice, derive kick distances from yard lines, and export a practice report."
)]
pub struct Cli {
    /// session database to use instead of the default location
    #[clap(long, global = true)]
    db: Option<PathBuf>,

    /// session key, for keeping more than one session at a time
    #[clap(short = 's', long, global = true)]
    session: Option<String>,

    /// config file to use instead of the default location
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// start a new session, discarding recorded kicks
    Start {
        /// workout date, defaults to today
        #[clap(long)]
        date: Option<String>,
    },
    /// record a kick
    Save(SaveArgs),
    /// list recorded kicks
    List,
    /// show one kick as JSON
    Show { id: u32 },
    /// change fields of a recorded kick
    Update {
        id: u32,
        /// field assignment such as YardLine=30, may be repeated
        #[clap(long = "set", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },
    /// print the remembered prefill values
    Defaults,
    /// write the practice report
    Export {
        #[clap(short = 'f', long, value_enum)]
        format: Option<ReportFormat>,

        /// output file; defaults to the configured report directory or stdout
        #[clap(short = 'o', long)]
        output: Option<PathBuf>,
    },
    /// discard the session entirely
    End,
    /// update persistent settings
    Configure(ConfigureArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct SaveArgs {
    /// field-goal, kickoff or punt
    kick_type: String,

    #[clap(long)]
    kicker: Option<String>,

    #[clap(long)]
    holder: Option<String>,

    /// long snapper
    #[clap(long)]
    snapper: Option<String>,

    /// yard line the ball was kicked from, negative for own side
    #[clap(long, allow_hyphen_values = true)]
    yard_line: Option<String>,

    /// hash or kick location
    #[clap(long)]
    hash: Option<String>,

    /// field goal result
    #[clap(long)]
    result: Option<String>,

    /// field goal operation time
    #[clap(long)]
    op_time: Option<String>,

    /// kickoff: yard line where the return was fielded
    #[clap(long, allow_hyphen_values = true)]
    result_yard_line: Option<String>,

    /// punt: yard line where the ball landed
    #[clap(long, allow_hyphen_values = true)]
    landed_yard_line: Option<String>,

    /// landing location
    #[clap(long)]
    location: Option<String>,

    #[clap(long)]
    hang_time: Option<String>,

    #[clap(long)]
    snap_time: Option<String>,

    #[clap(long)]
    hand_to_foot: Option<String>,
}

impl SaveArgs {
    /// Flags map onto every key they could mean; the kick type keeps its own.
    fn to_fields(&self) -> KickFields {
        let mut fields = KickFields::new();
        let mut put = |names: &[&str], value: &Option<String>| {
            if let Some(value) = value {
                for name in names {
                    fields.insert(name.to_string(), value.clone());
                }
            }
        };
        put(&[keys::KICKER], &self.kicker);
        put(&[keys::HOLDER], &self.holder);
        put(&[keys::LONG_SNAPPER], &self.snapper);
        put(&[keys::YARD_LINE, keys::KICK_YARD_LINE], &self.yard_line);
        put(&[keys::POSITION, keys::KICK_LOCATION], &self.hash);
        put(&[keys::RESULT], &self.result);
        put(&[keys::OP_TIME], &self.op_time);
        put(&[keys::RESULT_YARD_LINE], &self.result_yard_line);
        put(&[keys::LANDED_YARD_LINE], &self.landed_yard_line);
        put(&[keys::LANDING_LOCATION], &self.location);
        put(&[keys::HANG_TIME], &self.hang_time);
        put(&[keys::SNAP_TIME], &self.snap_time);
        put(&[keys::HAND_TO_FOOT_TIME], &self.hand_to_foot);
        fields
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct ConfigureArgs {
    #[clap(long)]
    session_key: Option<String>,

    #[clap(long, value_enum)]
    report_format: Option<ReportFormat>,

    #[clap(long)]
    report_dir: Option<PathBuf>,

    #[clap(long)]
    database_path: Option<PathBuf>,
}

fn parse_assignment(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got `{s}`")),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let cli = Cli::parse();

    let config_store = cli
        .config
        .as_ref()
        .map(FileConfigStore::with_path)
        .unwrap_or_default();
    let config = config_store.load();

    if let Command::Configure(args) = &cli.command {
        let updated = configure(config, args);
        config_store.save(&updated)?;
        println!("Settings saved to {}", config_store.path().display());
        return Ok(());
    }

    let db_path = cli
        .db
        .clone()
        .unwrap_or_else(|| config.resolve_database_path());
    let session_key = cli
        .session
        .clone()
        .unwrap_or_else(|| config.session_key.clone());

    let manager = SessionManager::new(SqliteSessionStore::open(&db_path)?);
    let mut stdout = io::stdout().lock();
    match run(&cli.command, &manager, &session_key, &config, &mut stdout) {
        Err(KickError::NotFound { id }) => {
            let mut cmd = Cli::command();
            cmd.error(
                ErrorKind::InvalidValue,
                format!("no kick with id {id} in session `{session_key}`"),
            )
            .exit();
        }
        other => Ok(other?),
    }
}

fn configure(mut config: Config, args: &ConfigureArgs) -> Config {
    if let Some(key) = &args.session_key {
        config.session_key = key.clone();
    }
    if let Some(format) = args.report_format {
        config.report_format = format;
    }
    if let Some(dir) = &args.report_dir {
        config.report_dir = Some(dir.clone());
    }
    if let Some(path) = &args.database_path {
        config.database_path = Some(path.clone());
    }
    config
}

fn run<S: SessionStore>(
    command: &Command,
    manager: &SessionManager<S>,
    key: &str,
    config: &Config,
    out: &mut dyn Write,
) -> kicklog::Result<()> {
    match command {
        Command::Start { date } => {
            manager.start_session(key, date.as_deref())?;
            writeln!(out, "Session started for {}.", manager.workout_date(key)?)?;
        }
        Command::Save(args) => {
            let kick = manager.save_kick(key, &args.kick_type, &args.to_fields())?;
            let distance = kick.distance().map(|d| d.to_string()).unwrap_or_default();
            writeln!(out, "Kick saved. #{} {} {}", kick.id(), kick.type_name(), distance)?;
        }
        Command::List => {
            for kick in manager.list_kicks(key)? {
                writeln!(
                    out,
                    "{:>3}  {:<10}  {:<12}  {}",
                    kick.id(),
                    kick.type_name(),
                    kick.header.kicker,
                    kick.distance().map(|d| d.to_string()).unwrap_or_default()
                )?;
            }
        }
        Command::Show { id } => {
            let kick = manager.get_kick(key, *id)?;
            serde_json::to_writer_pretty(&mut *out, &kick)?;
            writeln!(out)?;
        }
        Command::Update { id, set } => {
            let patch: KickFields = set.iter().cloned().collect();
            let kick = manager.update_kick(key, *id, &patch)?;
            let distance = kick.distance().map(|d| d.to_string()).unwrap_or_default();
            writeln!(out, "Kick updated. #{} {} {}", kick.id(), kick.type_name(), distance)?;
        }
        Command::Defaults => {
            for (name, value) in manager.last_used_defaults(key)? {
                writeln!(out, "{name}={value}")?;
            }
        }
        Command::Export { format, output } => {
            let Some(doc) = manager.export_report(key)? else {
                writeln!(out, "No data to export.")?;
                return Ok(());
            };
            let format = format.unwrap_or(config.report_format);
            let target = output
                .clone()
                .or_else(|| config.report_dir.as_ref().map(|dir| dir.join(format.file_name())));
            match target {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        if !parent.as_os_str().is_empty() {
                            fs::create_dir_all(parent)?;
                        }
                    }
                    let mut file = File::create(&path)?;
                    format.renderer().render(&doc, &mut file)?;
                    writeln!(out, "Report written to {}", path.display())?;
                }
                None => format.renderer().render(&doc, out)?,
            }
        }
        Command::End => {
            manager.end_session(key)?;
            writeln!(out, "Session ended.")?;
        }
        Command::Configure(_) => {}
    }
    Ok(())
}
