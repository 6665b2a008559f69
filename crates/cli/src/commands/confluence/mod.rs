use anyhow::Result;
use clap::{Args, Subcommand};
use snipdoc_api::ApiClient;
use snipdoc_output::OutputRenderer;
use std::path::PathBuf;

pub mod pages;
pub mod search;
pub mod spaces;
pub mod utils;

use utils::ConfluenceContext;

#[derive(Args, Debug, Clone)]
pub struct ConfluenceArgs {
    #[command(subcommand)]
    command: ConfluenceCommands,
}

#[derive(Subcommand, Debug, Clone)]
enum ConfluenceCommands {
    /// List spaces
    #[command(alias = "list-spaces")]
    Spaces {
        /// Maximum number of results
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List pages
    #[command(alias = "list-pages")]
    Pages {
        /// Filter by space ID
        #[arg(long)]
        space_id: Option<String>,
        /// Maximum number of results
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Get page details as JSON
    Get {
        /// Page ID
        page_id: String,
    },
    /// Print a page body in storage format
    Read {
        /// Page ID
        page_id: String,
    },
    /// Create a new page
    Create {
        /// Space ID
        #[arg(long)]
        space: String,
        /// Page title
        #[arg(long)]
        title: String,
        /// Body file in storage format (`-` or omitted reads stdin)
        #[arg(long)]
        body: Option<PathBuf>,
        /// Parent page ID
        #[arg(long)]
        parent: Option<String>,
    },
    /// Update a page (fetches the current version and submits N+1)
    Update {
        /// Page ID
        page_id: String,
        /// New page title
        #[arg(long)]
        title: Option<String>,
        /// New body file in storage format (`-` reads stdin)
        #[arg(long)]
        body: Option<PathBuf>,
    },
    /// Delete a page
    Delete {
        /// Page ID
        page_id: String,
        /// Force deletion without confirmation
        #[arg(long)]
        force: bool,
    },
    /// Search content with CQL
    Search {
        /// CQL query
        query: String,
        /// Maximum number of results
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List child pages
    Children {
        /// Page ID
        page_id: String,
        /// Maximum number of results
        #[arg(long)]
        limit: Option<usize>,
    },
}

pub async fn execute(
    args: ConfluenceArgs,
    client: ApiClient,
    renderer: &OutputRenderer,
) -> Result<()> {
    let ctx = ConfluenceContext { client, renderer };

    match args.command {
        ConfluenceCommands::Spaces { limit } => spaces::list_spaces(&ctx, limit).await,
        ConfluenceCommands::Pages { space_id, limit } => {
            pages::list_pages(&ctx, space_id.as_deref(), limit).await
        }
        ConfluenceCommands::Get { page_id } => pages::get_page(&ctx, &page_id).await,
        ConfluenceCommands::Read { page_id } => pages::read_page(&ctx, &page_id).await,
        ConfluenceCommands::Create {
            space,
            title,
            body,
            parent,
        } => pages::create_page(&ctx, &space, &title, body.as_deref(), parent.as_deref()).await,
        ConfluenceCommands::Update {
            page_id,
            title,
            body,
        } => pages::update_page(&ctx, &page_id, title.as_deref(), body.as_deref()).await,
        ConfluenceCommands::Delete { page_id, force } => {
            pages::delete_page(&ctx, &page_id, force).await
        }
        ConfluenceCommands::Search { query, limit } => {
            search::search_cql(&ctx, &query, limit).await
        }
        ConfluenceCommands::Children { page_id, limit } => {
            pages::list_children(&ctx, &page_id, limit).await
        }
    }
}
