//! Clap derive structures for the `iwf-license` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. Also
//! compiled by `build.rs` for man page generation, so it depends on clap
//! and clap_complete only.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// iwf-license -- manage BIG-IP membership in iWorkflow license pools
#[derive(Debug, Parser)]
#[command(
    name = "iwf-license",
    version,
    about = "Manage BIG-IP membership in F5 iWorkflow license pools",
    long_about = "Declaratively license or unlicense BIG-IP devices by adding them to,\n\
        or removing them from, a named license pool on an iWorkflow controller.\n\n\
        Runs are idempotent: a device already in the requested state is left alone.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Controller profile to use
    #[arg(long, short = 'p', env = "IWF_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Controller URL (overrides profile)
    #[arg(long, short = 'c', env = "IWF_CONTROLLER", global = true)]
    pub controller: Option<String>,

    /// Controller username (overrides profile)
    #[arg(long, short = 'u', env = "IWF_USERNAME", global = true)]
    pub username: Option<String>,

    /// Controller password (prefer the keyring: `config set-password`)
    #[arg(long, env = "IWF_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Authentication mode (overrides profile)
    #[arg(long, env = "IWF_AUTH", global = true)]
    pub auth: Option<AuthMode>,

    /// Login provider for token auth
    #[arg(long, env = "IWF_LOGIN_PROVIDER", global = true)]
    pub login_provider: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "IWF_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "IWF_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "IWF_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Value Enums ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AuthMode {
    /// HTTP Basic on every request
    Basic,
    /// Token login, then X-F5-Auth-Token
    Token,
}

impl AuthMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Token => "token",
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain `key=value` lines (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StateArg {
    /// Devices are pool members (licensed)
    Present,
    /// Devices are not pool members (unlicensed)
    Absent,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Reconcile license pool membership for one or more devices
    #[command(alias = "m")]
    Member(MemberArgs),

    /// Inspect configuration and store credentials
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Member ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct MemberArgs {
    /// License pool name
    #[arg(long)]
    pub pool: String,

    /// Device hostname, address, management address, or device self-link
    /// (repeatable, or comma-separated)
    #[arg(long = "device", short = 'd', required = true, value_delimiter = ',')]
    pub devices: Vec<String>,

    /// Desired membership state
    #[arg(long, short = 's', default_value = "present")]
    pub state: StateArg,

    /// Report what would change without modifying the pool
    #[arg(long, alias = "dry-run")]
    pub check: bool,

    /// Seconds between license state checks (overrides profile)
    #[arg(long, env = "IWF_POLL_INTERVAL")]
    pub poll_interval: Option<u64>,

    /// License state checks before giving up (overrides profile)
    #[arg(long, env = "IWF_POLL_ATTEMPTS", value_parser = clap::value_parser!(u32).range(1..))]
    pub poll_attempts: Option<u32>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the loaded configuration (passwords redacted)
    Show,

    /// Print the config file path
    Path,

    /// Store a profile password in the system keyring
    SetPassword {
        /// Profile to store the password for (defaults to the active one)
        #[arg(long)]
        profile: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
