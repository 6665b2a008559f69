use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::utils::ConfluenceContext;

// List spaces
pub async fn list_spaces(ctx: &ConfluenceContext<'_>, limit: Option<usize>) -> Result<()> {
    #[derive(Deserialize)]
    struct SpacesResponse {
        results: Vec<Space>,
    }

    #[derive(Deserialize)]
    struct Space {
        id: String,
        key: String,
        name: String,
        #[serde(rename = "type")]
        space_type: String,
        status: String,
    }

    let path = match limit {
        Some(l) => format!("/wiki/api/v2/spaces?limit={}", l),
        None => "/wiki/api/v2/spaces".to_string(),
    };

    let response: SpacesResponse = ctx
        .client
        .get(&path)
        .await
        .context("Failed to list spaces")?;

    #[derive(Serialize)]
    struct Row<'a> {
        id: &'a str,
        key: &'a str,
        name: &'a str,
        space_type: &'a str,
        status: &'a str,
    }

    let rows: Vec<Row<'_>> = response
        .results
        .iter()
        .map(|s| Row {
            id: s.id.as_str(),
            key: s.key.as_str(),
            name: s.name.as_str(),
            space_type: s.space_type.as_str(),
            status: s.status.as_str(),
        })
        .collect();

    ctx.renderer.render(&rows)
}
