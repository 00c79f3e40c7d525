//! Command-line interface.
//!
//! Option combinations are validated up front (mutually exclusive flags
//! conflict, direction flags require a filename) instead of being
//! reconciled later from accumulated state.

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config;
use crate::notes::query::{LinkDirection, ListOptions, NoteFilter, SortOrder, TitlePrefix};

#[derive(Parser)]
#[command(name = "notegraph", version, about = "Link graph over timestamp-named markdown notes")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the path for a new note
    New,
    /// Print the resolved notes directory
    Home,
    /// Print the list of notes
    List(ListArgs),
    /// Print the list of links
    Links(LinksArgs),
    /// Run the HTTP API server
    Serve(ServeArgs),
}

#[derive(Args)]
pub struct ListArgs {
    /// Limit list to label notes (one-word titles)
    #[arg(long, conflicts_with = "orphans")]
    pub labels: bool,

    /// Limit list to notes without outgoing or incoming links
    #[arg(long)]
    pub orphans: bool,

    /// Sort list by date or alphabetically
    #[arg(long, value_enum)]
    pub sort: Option<SortArg>,

    /// Prefix titles with a date or linked label
    #[arg(long, value_enum, conflicts_with_all = ["labels", "orphans"])]
    pub prefix: Option<PrefixArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    Ctime,
    Mtime,
    Alpha,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PrefixArg {
    Ctime,
    Mtime,
    Label,
}

impl ListArgs {
    pub fn to_options(&self) -> ListOptions {
        ListOptions {
            sort: match self.sort {
                None => SortOrder::None,
                Some(SortArg::Ctime) => SortOrder::Ctime,
                Some(SortArg::Mtime) => SortOrder::Mtime,
                Some(SortArg::Alpha) => SortOrder::Title,
            },
            filter: if self.labels {
                NoteFilter::Labels
            } else if self.orphans {
                NoteFilter::Orphans
            } else {
                NoteFilter::None
            },
            prefix: match self.prefix {
                None => TitlePrefix::None,
                Some(PrefixArg::Ctime) => TitlePrefix::Ctime,
                Some(PrefixArg::Mtime) => TitlePrefix::Mtime,
                Some(PrefixArg::Label) => TitlePrefix::Label,
            },
        }
    }
}

#[derive(Args)]
pub struct LinksArgs {
    /// Note filename, e.g. 5f000001.md
    pub filename: Option<String>,

    /// Limit list to outgoing links related to FILENAME
    #[arg(long, requires = "filename", conflicts_with_all = ["incoming", "dangling"])]
    pub outgoing: bool,

    /// Limit list to incoming links related to FILENAME
    #[arg(long, requires = "filename", conflicts_with = "dangling")]
    pub incoming: bool,

    /// Limit list to broken links
    #[arg(long, conflicts_with = "filename")]
    pub dangling: bool,
}

impl LinksArgs {
    pub fn direction(&self) -> LinkDirection {
        if self.outgoing {
            LinkDirection::Outgoing
        } else if self.incoming {
            LinkDirection::Incoming
        } else {
            LinkDirection::Both
        }
    }
}

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, env = config::env_vars::PORT, default_value_t = config::defaults::PORT)]
    pub port: u16,

    /// Reject note updates over the API
    #[arg(long)]
    pub read_only: bool,
}
