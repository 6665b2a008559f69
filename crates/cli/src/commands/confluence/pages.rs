use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::Path;

use super::utils::ConfluenceContext;
use crate::commands::content;

// List pages
pub async fn list_pages(
    ctx: &ConfluenceContext<'_>,
    space_id: Option<&str>,
    limit: Option<usize>,
) -> Result<()> {
    #[derive(Deserialize)]
    struct PagesResponse {
        results: Vec<Page>,
    }

    #[derive(Deserialize)]
    struct Page {
        id: String,
        title: String,
        status: String,
        #[serde(rename = "spaceId")]
        space_id: Option<String>,
    }

    let mut query_params = Vec::new();

    if let Some(sid) = space_id {
        query_params.push(format!("space-id={}", sid));
    }

    if let Some(l) = limit {
        query_params.push(format!("limit={}", l));
    }

    let query_string = if query_params.is_empty() {
        String::new()
    } else {
        format!("?{}", query_params.join("&"))
    };

    let response: PagesResponse = ctx
        .client
        .get(&format!("/wiki/api/v2/pages{}", query_string))
        .await
        .context("Failed to list pages")?;

    #[derive(Serialize)]
    struct Row<'a> {
        id: &'a str,
        title: &'a str,
        status: &'a str,
        space_id: &'a str,
    }

    let rows: Vec<Row<'_>> = response
        .results
        .iter()
        .map(|p| Row {
            id: p.id.as_str(),
            title: p.title.as_str(),
            status: p.status.as_str(),
            space_id: p.space_id.as_deref().unwrap_or(""),
        })
        .collect();

    ctx.renderer.render(&rows)
}

// Get page details
pub async fn get_page(ctx: &ConfluenceContext<'_>, page_id: &str) -> Result<()> {
    let page: Value = ctx
        .client
        .get(&format!(
            "/wiki/api/v2/pages/{}?body-format=storage",
            page_id
        ))
        .await
        .with_context(|| format!("Failed to get page {}", page_id))?;

    println!("{}", serde_json::to_string_pretty(&page)?);
    Ok(())
}

// Print the page body (storage format) to stdout
pub async fn read_page(ctx: &ConfluenceContext<'_>, page_id: &str) -> Result<()> {
    let page: Value = ctx
        .client
        .get(&format!(
            "/wiki/api/v2/pages/{}?body-format=storage",
            page_id
        ))
        .await
        .with_context(|| format!("Failed to get page {}", page_id))?;

    let body = page
        .pointer("/body/storage/value")
        .and_then(|v| v.as_str())
        .with_context(|| format!("Page {} has no storage body", page_id))?;

    println!("{}", body);
    Ok(())
}

// Create page
pub async fn create_page(
    ctx: &ConfluenceContext<'_>,
    space_id: &str,
    title: &str,
    body_file: Option<&Path>,
    parent_id: Option<&str>,
) -> Result<()> {
    let body_content = match body_file {
        Some(file) => content::read_body(file)?,
        None => content::read_stdin()?,
    };

    let mut payload = json!({
        "spaceId": space_id,
        "status": "current",
        "title": title,
        "body": {
            "representation": "storage",
            "value": body_content
        }
    });

    if let Some(pid) = parent_id {
        payload["parentId"] = json!(pid);
    }

    #[derive(Deserialize)]
    struct CreateResponse {
        id: String,
        title: String,
    }

    let response: CreateResponse = ctx
        .client
        .post("/wiki/api/v2/pages", &payload)
        .await
        .context("Failed to create page")?;

    tracing::info!(id = %response.id, title = %response.title, "Page created successfully");
    println!("✅ Created page: {} (ID: {})", response.title, response.id);
    Ok(())
}

/// Build the PUT payload for a page update from the currently stored
/// page. The remote API enforces optimistic concurrency: the submitted
/// version must be exactly current + 1, and title/space carry over when
/// not overridden.
fn update_payload(page_id: &str, current: &Value, title: Option<&str>, body: Option<&str>) -> Value {
    let current_version = current
        .pointer("/version/number")
        .and_then(Value::as_i64)
        .unwrap_or(1);

    let mut payload = json!({
        "id": page_id,
        "status": "current",
        "version": {
            "number": current_version + 1
        }
    });

    payload["title"] = match title {
        Some(t) => json!(t),
        None => current.get("title").cloned().unwrap_or(json!("Untitled")),
    };

    if let Some(space_id) = current.get("spaceId") {
        payload["spaceId"] = space_id.clone();
    }

    if let Some(value) = body {
        payload["body"] = json!({
            "representation": "storage",
            "value": value
        });
    }

    payload
}

// Update page: fetch-then-write with version increment
pub async fn update_page(
    ctx: &ConfluenceContext<'_>,
    page_id: &str,
    title: Option<&str>,
    body_file: Option<&Path>,
) -> Result<()> {
    if title.is_none() && body_file.is_none() {
        bail!("Nothing to update: pass --title and/or --body");
    }

    let current: Value = ctx
        .client
        .get(&format!("/wiki/api/v2/pages/{}", page_id))
        .await
        .with_context(|| format!("Failed to get page {}", page_id))?;

    let body_content = match body_file {
        Some(file) => Some(content::read_body(file)?),
        None => None,
    };

    let payload = update_payload(page_id, &current, title, body_content.as_deref());

    let _: Value = ctx
        .client
        .put(&format!("/wiki/api/v2/pages/{}", page_id), &payload)
        .await
        .with_context(|| format!("Failed to update page {}", page_id))?;

    tracing::info!(%page_id, "Page updated successfully");
    println!("✅ Updated page: {}", page_id);
    Ok(())
}

// Delete page
pub async fn delete_page(ctx: &ConfluenceContext<'_>, page_id: &str, force: bool) -> Result<()> {
    if !force {
        println!(
            "⚠️  This will permanently delete page {}. Use --force to confirm.",
            page_id
        );
        return Ok(());
    }

    let _: Value = ctx
        .client
        .delete(&format!("/wiki/api/v2/pages/{}", page_id))
        .await
        .with_context(|| format!("Failed to delete page {}", page_id))?;

    tracing::info!(%page_id, "Page deleted successfully");
    println!("✅ Deleted page: {}", page_id);
    Ok(())
}

// List child pages
pub async fn list_children(
    ctx: &ConfluenceContext<'_>,
    page_id: &str,
    limit: Option<usize>,
) -> Result<()> {
    #[derive(Deserialize)]
    struct ChildrenResponse {
        results: Vec<Child>,
    }

    #[derive(Deserialize)]
    struct Child {
        id: String,
        title: String,
        status: String,
    }

    let path = match limit {
        Some(l) => format!("/wiki/api/v2/pages/{}/children?limit={}", page_id, l),
        None => format!("/wiki/api/v2/pages/{}/children", page_id),
    };

    let response: ChildrenResponse = ctx
        .client
        .get(&path)
        .await
        .with_context(|| format!("Failed to list children of page {}", page_id))?;

    #[derive(Serialize)]
    struct Row<'a> {
        id: &'a str,
        title: &'a str,
        status: &'a str,
    }

    let rows: Vec<Row<'_>> = response
        .results
        .iter()
        .map(|c| Row {
            id: c.id.as_str(),
            title: c.title.as_str(),
            status: c.status.as_str(),
        })
        .collect();

    ctx.renderer.render(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_payload_increments_version() {
        let current = json!({
            "id": "100001",
            "title": "Current Title",
            "spaceId": "777",
            "version": { "number": 4 }
        });

        let payload = update_payload("100001", &current, None, None);
        assert_eq!(payload["version"]["number"], 5);
        assert_eq!(payload["title"], "Current Title");
        assert_eq!(payload["spaceId"], "777");
        assert!(payload.get("body").is_none());
    }

    #[test]
    fn test_update_payload_overrides_title_and_body() {
        let current = json!({
            "title": "Old",
            "version": { "number": 1 }
        });

        let payload = update_payload("42", &current, Some("New"), Some("<p>fresh</p>"));
        assert_eq!(payload["version"]["number"], 2);
        assert_eq!(payload["title"], "New");
        assert_eq!(payload["body"]["value"], "<p>fresh</p>");
        assert_eq!(payload["body"]["representation"], "storage");
    }

    #[test]
    fn test_update_payload_defaults_when_version_missing() {
        let payload = update_payload("42", &json!({}), None, None);
        assert_eq!(payload["version"]["number"], 2);
        assert_eq!(payload["title"], "Untitled");
    }
}
