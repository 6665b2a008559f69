use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::utils::ConfluenceContext;

// Search content using CQL against the v1 search endpoint
pub async fn search_cql(
    ctx: &ConfluenceContext<'_>,
    cql: &str,
    limit: Option<usize>,
) -> Result<()> {
    #[derive(Deserialize)]
    struct SearchResponse {
        results: Vec<SearchResult>,
    }

    #[derive(Deserialize)]
    struct SearchResult {
        // Space results carry no content object, only a title.
        content: Option<Content>,
        title: Option<String>,
    }

    #[derive(Deserialize)]
    struct Content {
        id: String,
        title: String,
        #[serde(rename = "type")]
        content_type: String,
    }

    let mut query_params = vec![format!("cql={}", urlencoding::encode(cql))];

    if let Some(l) = limit {
        query_params.push(format!("limit={}", l));
    }

    let response: SearchResponse = ctx
        .client
        .get(&format!(
            "/wiki/rest/api/search?{}",
            query_params.join("&")
        ))
        .await
        .context("Failed to search with CQL")?;

    #[derive(Serialize)]
    struct Row<'a> {
        id: &'a str,
        title: &'a str,
        content_type: &'a str,
    }

    let rows: Vec<Row<'_>> = response
        .results
        .iter()
        .map(|r| match &r.content {
            Some(c) => Row {
                id: c.id.as_str(),
                title: c.title.as_str(),
                content_type: c.content_type.as_str(),
            },
            None => Row {
                id: "",
                title: r.title.as_deref().unwrap_or(""),
                content_type: "",
            },
        })
        .collect();

    ctx.renderer.render(&rows)
}
