//! Clap derive structures for the `rokuly` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// rokuly -- remote control and UI inspection for Roku devices
#[derive(Debug, Parser)]
#[command(
    name = "rokuly",
    version,
    about = "Drive Roku devices over ECP from the command line",
    long_about = "Remote control, sideloading, screenshots and UI tree queries for Roku\n\
        devices in developer mode.\n\n\
        Talks to the External Control Protocol on port 8060 and to the\n\
        developer web server (digest auth) on port 80.",
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
    /// Device profile to use
    #[arg(long, short = 'p', env = "ROKULY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Device IP or hostname (overrides ROKU_IP and the profile)
    #[arg(long, short = 'H', global = true)]
    pub host: Option<String>,

    /// Developer web server username
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Developer web server password
    #[arg(long, global = true, hide = true)]
    pub password: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "ROKULY_OUTPUT",
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

    /// Request timeout in seconds (overrides the profile)
    #[arg(long, env = "ROKULY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

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
    /// Plain text, one value per line (scripting)
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

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the named remote keys
    Keys,

    /// Press, hold or release remote keys
    #[command(alias = "k")]
    Key(KeyArgs),

    /// Type text on the on-screen keyboard
    Type {
        /// Text to type, one literal key per character
        text: String,

        /// Press Enter after the text
        #[arg(long)]
        enter: bool,
    },

    /// Launch a channel, optionally deep-linking into content
    Launch(LaunchArgs),

    /// Send input parameters to the running channel
    Input {
        /// Parameter as key=value (repeatable)
        #[arg(long = "param", value_name = "KEY=VALUE", required = true)]
        params: Vec<String>,
    },

    /// Exit the running channel
    Exit,

    /// Query device state
    #[command(alias = "q")]
    Query(QueryArgs),

    /// Download a channel's icon
    Icon {
        /// Channel ID
        channel: String,

        /// Destination file
        #[arg(long, short = 'O')]
        out: PathBuf,
    },

    /// Install channels and sideload packages
    Install(InstallArgs),

    /// Capture the current frame
    #[command(alias = "shot")]
    Screenshot {
        /// Destination file (forced to .jpg; default roku-<timestamp>.jpg)
        path: Option<PathBuf>,
    },

    /// Poll the app UI until the channel reports ready
    WaitReady {
        /// Checks to make before giving up (default from config)
        #[arg(long)]
        retries: Option<u32>,
    },

    /// Inspect the on-device UI tree
    Ui(UiArgs),

    /// Start a test session: validate config and auto-install
    Session,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  REMOTE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct KeyArgs {
    #[command(subcommand)]
    pub command: KeyCommand,
}

#[derive(Debug, Subcommand)]
pub enum KeyCommand {
    /// Press keys in order, pausing between presses
    Press {
        /// Key names (Home, Select, ...) or Lit_<char>
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Hold a key down
    Down {
        /// Key name
        key: String,
    },

    /// Release a held key
    Up {
        /// Key name
        key: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CHANNELS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LaunchArgs {
    /// Channel ID (defaults to the profile's target channel)
    pub channel: Option<String>,

    /// Deep-link content ID
    #[arg(long)]
    pub content_id: Option<String>,

    /// Deep-link media type (movie, episode, ...)
    #[arg(long)]
    pub media_type: Option<String>,

    /// Extra deep-link parameter as key=value (repeatable)
    #[arg(long = "param", value_name = "KEY=VALUE")]
    pub params: Vec<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  QUERIES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct QueryArgs {
    #[command(subcommand)]
    pub command: QueryCommand,
}

#[derive(Debug, Subcommand)]
pub enum QueryCommand {
    /// Device model, firmware and network details
    #[command(alias = "info")]
    DeviceInfo,

    /// Installed channels
    Apps,

    /// The channel in the foreground
    ActiveApp,

    /// Media player state (raw XML)
    MediaPlayer,

    /// The current app UI tree (raw XML)
    AppUi,

    /// SceneGraph node counts (raw XML)
    SgNodes,

    /// SceneGraph nodes without a parent (raw XML)
    SgOrphans,

    /// Rendering frame rate (raw XML)
    FrameRate,

    /// CPU and memory use of the running channel (raw XML)
    #[command(alias = "perf")]
    Performance,

    /// Texture memory use (raw XML)
    Textures,

    /// Screen resolution as a viewport
    Resolution,

    /// State of a channel (raw XML)
    ChannelState {
        /// Channel ID (defaults to the profile's target channel)
        channel: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  INSTALL
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct InstallArgs {
    #[command(subcommand)]
    pub command: InstallCommand,
}

#[derive(Debug, Subcommand)]
pub enum InstallCommand {
    /// Sideload a zipped package and wait for it to start
    Archive {
        /// Path to the .zip package
        path: PathBuf,
    },

    /// Install a published channel, launch it and wait for it to start
    Id {
        /// Channel ID
        channel: String,
    },

    /// Remove the sideloaded dev channel
    Delete,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  UI TREE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct UiArgs {
    #[command(subcommand)]
    pub command: UiCommand,
}

#[derive(Debug, Subcommand)]
pub enum UiCommand {
    /// Print the current UI tree
    Dump {
        /// Also keep the XML at this path
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Find elements matching a selector
    Find {
        /// Selector: Tag, *, #name, [attr], [attr="v"], [attr*="v"], descendants
        selector: String,

        /// List every match instead of the first
        #[arg(long, short = 'a')]
        all: bool,
    },

    /// Print an element's label text
    Text {
        /// Selector
        selector: String,
    },

    /// Print one attribute of an element
    Attr {
        /// Selector
        selector: String,

        /// Attribute name
        name: String,
    },

    /// Report whether an element is displayed
    Displayed {
        /// Selector
        selector: String,

        /// Also require the element to be inside the screen
        #[arg(long)]
        viewport: bool,
    },

    /// Wait for an element to be displayed (or to disappear)
    Wait {
        /// Selector
        selector: String,

        /// Wait for the element to go away instead
        #[arg(long)]
        gone: bool,

        /// Only require the element to exist, displayed or not
        #[arg(long)]
        exist: bool,

        /// Give up after this long
        #[arg(long, default_value = "5s", value_parser = humantime::parse_duration)]
        max_wait: Duration,

        /// Pause between checks
        #[arg(long, default_value = "250ms", value_parser = humantime::parse_duration)]
        interval: Duration,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create a profile with guided setup
    Init,

    /// Display current configuration
    Show,

    /// Print the config file location
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store the developer password in the system keyring
    SetPassword {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
