use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Debug, Parser)]
#[command(
    name = "rathe",
    version,
    about = "Query a Flesh and Blood card snapshot from the terminal or over MCP"
)]
pub struct Cli {
    /// Read the card snapshot from this directory instead of the bundled one
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search cards by name, type, class, set, pitch, keyword or text
    Search(SearchArgs),
    /// Show a card by unique ID or exact name
    Card(CardArgs),
    /// Show a card's legality in every format
    Legality(CardArgs),
    /// List or search sets
    Sets(SetsArgs),
    /// Show a set, optionally with its cards
    Set(SetArgs),
    /// Show a keyword's description
    Keyword(KeywordArgs),
    /// List all keywords
    Keywords(JsonArgs),
    /// List all abilities
    Abilities(JsonArgs),
    /// Show catalog and index statistics
    Status(JsonArgs),
    /// Start MCP server for AI agent integration
    Mcp,
    /// Generate shell completions
    #[command(hide = true)]
    Completions(CompletionsArgs),
}

// -- Search --

#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// Card name (partial match)
    #[arg(long)]
    pub name: Option<String>,

    /// Type tag (e.g. Action, Attack, Equipment)
    #[arg(short = 't', long = "type")]
    pub type_name: Option<String>,

    /// Class (e.g. Ninja, Warrior, Wizard)
    #[arg(short = 'c', long)]
    pub class: Option<String>,

    /// Set code (e.g. WTR, ARC)
    #[arg(short = 's', long)]
    pub set: Option<String>,

    /// Pitch value
    #[arg(short = 'p', long)]
    pub pitch: Option<String>,

    /// Keyword (partial match)
    #[arg(short = 'k', long)]
    pub keyword: Option<String>,

    /// Text in the card's abilities (partial match)
    #[arg(long)]
    pub text: Option<String>,

    /// Only cards legal in this format (blitz, cc, commoner, ll,
    /// silver_age, upf)
    #[arg(short = 'f', long)]
    pub format: Option<String>,

    /// Number of results to return (0 for all)
    #[arg(short = 'n', long, default_value = "20", allow_negative_numbers = true)]
    pub limit: i64,

    /// Number of results to skip
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    pub offset: i64,

    /// Print the index the search starts from
    #[arg(long)]
    pub explain: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Lookups --

#[derive(Debug, Parser)]
pub struct CardArgs {
    /// Card unique ID or exact name
    pub reference: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Parser)]
pub struct SetsArgs {
    /// Match against set name or code
    pub query: Option<String>,

    /// Set name (partial match)
    #[arg(long)]
    pub name: Option<String>,

    /// Set code (partial match)
    #[arg(long)]
    pub code: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Parser)]
pub struct SetArgs {
    /// Set code (e.g. WTR)
    pub code: String,

    /// Include the cards printed in the set
    #[arg(long)]
    pub cards: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Parser)]
pub struct KeywordArgs {
    /// Exact keyword name
    pub name: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Parser)]
pub struct JsonArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Completions --

#[derive(Debug, Parser)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsArgs {
    /// Generate shell completions and print to stdout.
    pub fn generate(&self) {
        let mut cmd = Cli::command();
        clap_complete::generate(
            self.shell,
            &mut cmd,
            "rathe",
            &mut std::io::stdout(),
        );
    }
}
