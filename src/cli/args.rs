use clap::{ArgAction, Parser};

use crate::signing::{ENV_ACCOUNT_KEY, ENV_ACCOUNT_NAME, ENV_CONTAINER_NAME};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "showcase",
    version,
    about = "AI application marketplace page renderer",
    long_about = "Showcase renders a branded marketplace page from a saved web archive and an application catalog.\n\nExamples:\n  showcase --archive \"UBS website.webarchive\" --catalog apps.json -o showcase.html\n  showcase --catalog apps.json --search kyc --business-line \"Wealth Management\"\n  showcase --catalog apps.json --format json\n\nTip: Use --init-config to write a commented default config to ~/.showcase/config.yml."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'n',
        long = "nc",
        visible_alias = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the page to a file instead of stdout."
    )]
    pub output: Option<String>,

    #[arg(
        short = 'F',
        long = "fmt",
        visible_alias = "format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output format (html or json). Inferred from --output when omitted."
    )]
    pub output_format: Option<String>,

    #[arg(
        short = 'a',
        long = "arc",
        visible_alias = "archive",
        value_name = "FILE",
        help_heading = "Input",
        help = "Saved web archive holding brand assets."
    )]
    pub archive: Option<String>,

    #[arg(
        short = 'k',
        long = "cat",
        visible_alias = "catalog",
        value_name = "FILE",
        help_heading = "Input",
        help = "Application catalog (JSON array of cards)."
    )]
    pub catalog: Option<String>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.showcase/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "ic",
        visible_alias = "init-config",
        help_heading = "Input",
        help = "Write a default config file if none exists, then exit."
    )]
    pub init_config: bool,

    #[arg(
        long = "to",
        visible_alias = "timeout",
        value_name = "SECONDS",
        help_heading = "Input",
        help = "Timeout for each remote icon fetch."
    )]
    pub timeout: Option<usize>,

    #[arg(
        short = 's',
        long = "q",
        visible_alias = "search",
        value_name = "TEXT",
        help_heading = "Filters",
        help = "Case-insensitive title search."
    )]
    pub search: Option<String>,

    #[arg(
        short = 't',
        long = "at",
        visible_alias = "ai-type",
        value_name = "TYPE",
        action = ArgAction::Append,
        help_heading = "Filters",
        help = "Allowed AI types (repeatable or comma-separated)."
    )]
    pub ai_type: Vec<String>,

    #[arg(
        short = 'b',
        long = "bl",
        visible_alias = "business-line",
        value_name = "LINE",
        action = ArgAction::Append,
        help_heading = "Filters",
        help = "Allowed business lines (repeatable or comma-separated)."
    )]
    pub business_line: Vec<String>,

    #[arg(
        short = 'f',
        long = "fn",
        visible_alias = "function",
        value_name = "FUNCTION",
        action = ArgAction::Append,
        help_heading = "Filters",
        help = "Allowed functions (repeatable or comma-separated)."
    )]
    pub function: Vec<String>,

    #[arg(
        long = "sa",
        visible_alias = "storage-account",
        value_name = "NAME",
        env = ENV_ACCOUNT_NAME,
        help_heading = "Storage",
        help = "Blob storage account used to sign demo links."
    )]
    pub storage_account: Option<String>,

    #[arg(
        long = "sk",
        visible_alias = "storage-key",
        value_name = "KEY",
        env = ENV_ACCOUNT_KEY,
        hide_env_values = true,
        help_heading = "Storage",
        help = "Base64 account key for the storage account."
    )]
    pub storage_key: Option<String>,

    #[arg(
        long = "sc",
        visible_alias = "storage-container",
        value_name = "NAME",
        env = ENV_CONTAINER_NAME,
        help_heading = "Storage",
        help = "Container holding demo recordings."
    )]
    pub storage_container: Option<String>,

    #[arg(
        long = "lv",
        visible_alias = "link-validity",
        value_name = "SECONDS",
        help_heading = "Storage",
        help = "Lifetime of signed demo links."
    )]
    pub link_validity: Option<i64>,
}
