use anyhow::Result;
use clap::{Args, Subcommand};
use snipdoc_api::ApiClient;
use snipdoc_output::OutputRenderer;
use std::path::PathBuf;

pub mod gists;
pub mod utils;

use utils::GistContext;

#[derive(Args, Debug, Clone)]
pub struct GistArgs {
    #[command(subcommand)]
    command: GistCommands,
}

#[derive(Subcommand, Debug, Clone)]
enum GistCommands {
    /// List your gists
    List {
        /// Maximum number of results
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Get gist details as JSON
    Get {
        /// Gist ID
        gist_id: String,
    },
    /// Print the content of a gist file
    Read {
        /// Gist ID
        gist_id: String,
        /// File name (optional when the gist has a single file)
        filename: Option<String>,
    },
    /// Create a gist from files or stdin
    Create {
        /// Gist description
        description: String,
        /// Files to include; omit to read one file from stdin
        files: Vec<PathBuf>,
        /// Create a public gist (secret by default)
        #[arg(long)]
        public: bool,
        /// File name used for stdin content
        #[arg(long, default_value = "gistfile1.txt")]
        filename: String,
    },
    /// Replace the content of a gist file from a local file
    Update {
        /// Gist ID
        gist_id: String,
        /// Local file (its name selects the gist file; `-` reads stdin)
        file: PathBuf,
        /// Gist file name when reading from stdin
        #[arg(long)]
        filename: Option<String>,
    },
    /// Rename a file within a gist
    Rename {
        /// Gist ID
        gist_id: String,
        /// Current file name
        old_name: String,
        /// New file name
        new_name: String,
    },
    /// Delete a gist
    Delete {
        /// Gist ID
        gist_id: String,
        /// Force deletion without confirmation
        #[arg(long)]
        force: bool,
    },
    /// Add a file to a gist
    Add {
        /// Gist ID
        gist_id: String,
        /// Local file to add (`-` reads stdin)
        file: PathBuf,
        /// Gist file name when reading from stdin
        #[arg(long)]
        filename: Option<String>,
    },
    /// Remove a file from a gist
    Rm {
        /// Gist ID
        gist_id: String,
        /// File name to remove
        filename: String,
    },
    /// Set the gist description
    Desc {
        /// Gist ID
        gist_id: String,
        /// New description
        description: String,
    },
    /// Search your gists by description and file names
    Search {
        /// Query (case-insensitive substring)
        query: String,
        /// Number of gists to scan (single page)
        #[arg(long)]
        limit: Option<usize>,
    },
}

pub async fn execute(args: GistArgs, client: ApiClient, renderer: &OutputRenderer) -> Result<()> {
    let ctx = GistContext { client, renderer };

    match args.command {
        GistCommands::List { limit } => gists::list_gists(&ctx, limit).await,
        GistCommands::Get { gist_id } => gists::get_gist(&ctx, &gist_id).await,
        GistCommands::Read { gist_id, filename } => {
            gists::read_gist_file(&ctx, &gist_id, filename.as_deref()).await
        }
        GistCommands::Create {
            description,
            files,
            public,
            filename,
        } => gists::create_gist(&ctx, &description, &files, public, &filename).await,
        GistCommands::Update {
            gist_id,
            file,
            filename,
        } => gists::update_gist_file(&ctx, &gist_id, &file, filename.as_deref()).await,
        GistCommands::Rename {
            gist_id,
            old_name,
            new_name,
        } => gists::rename_gist_file(&ctx, &gist_id, &old_name, &new_name).await,
        GistCommands::Delete { gist_id, force } => gists::delete_gist(&ctx, &gist_id, force).await,
        GistCommands::Add {
            gist_id,
            file,
            filename,
        } => gists::add_gist_file(&ctx, &gist_id, &file, filename.as_deref()).await,
        GistCommands::Rm { gist_id, filename } => {
            gists::remove_gist_file(&ctx, &gist_id, &filename).await
        }
        GistCommands::Desc {
            gist_id,
            description,
        } => gists::set_gist_description(&ctx, &gist_id, &description).await,
        GistCommands::Search { query, limit } => gists::search_gists(&ctx, &query, limit).await,
    }
}
