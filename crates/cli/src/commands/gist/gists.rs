use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::utils::GistContext;
use crate::commands::content;

/// Gist summary as returned by `GET /gists` and `GET /gists/{id}`.
#[derive(Deserialize)]
pub struct Gist {
    pub id: String,
    pub description: Option<String>,
    pub public: bool,
    pub updated_at: String,
    pub files: HashMap<String, GistFile>,
}

#[derive(Debug, Deserialize)]
pub struct GistFile {
    pub filename: String,
    #[serde(default)]
    pub truncated: bool,
    pub content: Option<String>,
    pub raw_url: Option<String>,
}

#[derive(Serialize)]
struct GistRow<'a> {
    id: &'a str,
    description: &'a str,
    files: String,
    public: bool,
    updated: &'a str,
}

fn gist_rows(gists: &[Gist]) -> Vec<GistRow<'_>> {
    gists
        .iter()
        .map(|g| GistRow {
            id: g.id.as_str(),
            description: g.description.as_deref().unwrap_or(""),
            files: g.files.keys().cloned().collect::<Vec<_>>().join(", "),
            public: g.public,
            updated: g.updated_at.as_str(),
        })
        .collect()
}

// List gists
pub async fn list_gists(ctx: &GistContext<'_>, limit: Option<usize>) -> Result<()> {
    let path = match limit {
        Some(l) => format!("/gists?per_page={}", l),
        None => "/gists".to_string(),
    };

    let gists: Vec<Gist> = ctx.client.get(&path).await.context("Failed to list gists")?;

    ctx.renderer.render(&gist_rows(&gists))
}

// Get gist details
pub async fn get_gist(ctx: &GistContext<'_>, gist_id: &str) -> Result<()> {
    let gist: Value = ctx
        .client
        .get(&format!("/gists/{}", gist_id))
        .await
        .with_context(|| format!("Failed to get gist {}", gist_id))?;

    println!("{}", serde_json::to_string_pretty(&gist)?);
    Ok(())
}

/// Pick the file to read: the named one, or the only one when the gist
/// holds a single file.
fn select_file<'a>(
    files: &'a HashMap<String, GistFile>,
    requested: Option<&str>,
) -> Result<&'a GistFile> {
    if let Some(name) = requested {
        return files
            .get(name)
            .with_context(|| format!("No file named '{}' in this gist", name));
    }

    if files.len() == 1 {
        return Ok(files.values().next().expect("len checked above"));
    }

    let mut names: Vec<&str> = files.keys().map(String::as_str).collect();
    names.sort_unstable();
    bail!(
        "Gist has {} files; specify one of: {}",
        files.len(),
        names.join(", ")
    );
}

// Read one gist file, following the raw URL when the inline content
// is flagged as truncated by the API.
pub async fn read_gist_file(
    ctx: &GistContext<'_>,
    gist_id: &str,
    filename: Option<&str>,
) -> Result<()> {
    let gist: Gist = ctx
        .client
        .get(&format!("/gists/{}", gist_id))
        .await
        .with_context(|| format!("Failed to get gist {}", gist_id))?;

    let file = select_file(&gist.files, filename)?;

    let content = if file.truncated {
        let raw_url = file
            .raw_url
            .as_deref()
            .with_context(|| format!("File '{}' is truncated but has no raw URL", file.filename))?;
        ctx.client
            .get_absolute_text(raw_url)
            .await
            .with_context(|| format!("Failed to fetch raw content for '{}'", file.filename))?
    } else {
        file.content
            .clone()
            .with_context(|| format!("File '{}' has no inline content", file.filename))?
    };

    print!("{}", content);
    Ok(())
}

// Create gist
pub async fn create_gist(
    ctx: &GistContext<'_>,
    description: &str,
    files: &[std::path::PathBuf],
    public: bool,
    stdin_name: &str,
) -> Result<()> {
    let mut file_entries = serde_json::Map::new();

    if files.is_empty() {
        file_entries.insert(
            stdin_name.to_string(),
            json!({ "content": content::read_stdin()? }),
        );
    } else {
        for path in files {
            let name = create_entry_name(path, stdin_name)?;
            file_entries.insert(name, json!({ "content": content::read_body(path)? }));
        }
    }

    let payload = json!({
        "description": description,
        "public": public,
        "files": file_entries,
    });

    #[derive(Deserialize)]
    struct CreateResponse {
        id: String,
        html_url: String,
    }

    let response: CreateResponse = ctx
        .client
        .post("/gists", &payload)
        .await
        .context("Failed to create gist")?;

    tracing::info!(id = %response.id, "Gist created successfully");
    println!("✅ Created gist {} ({})", response.id, response.html_url);
    Ok(())
}

/// Gist file name for one create argument: `-` takes the stdin name,
/// anything else its base name.
fn create_entry_name(path: &Path, stdin_name: &str) -> Result<String> {
    if path.as_os_str() == "-" {
        return Ok(stdin_name.to_string());
    }
    content::entry_name(path)
}

/// Resolve the gist file name for a local path: explicit `--filename`,
/// or the path's base name. stdin (`-`) requires an explicit name.
fn target_name(file: &Path, filename: Option<&str>) -> Result<String> {
    if let Some(name) = filename {
        return Ok(name.to_string());
    }
    if file.as_os_str() == "-" {
        bail!("Reading from stdin requires --filename");
    }
    content::entry_name(file)
}

async fn patch_file_content(
    ctx: &GistContext<'_>,
    gist_id: &str,
    file: &Path,
    filename: Option<&str>,
    verb: &str,
    done: &str,
) -> Result<()> {
    let name = target_name(file, filename)?;
    let body = content::read_body(file)?;

    let payload = json!({
        "files": { &name: { "content": body } }
    });

    let _: Value = ctx
        .client
        .patch(&format!("/gists/{}", gist_id), &payload)
        .await
        .with_context(|| format!("Failed to {} '{}' in gist {}", verb, name, gist_id))?;

    tracing::info!(%gist_id, file = %name, "{} gist file", done);
    println!("✅ {} '{}' in gist {}", done, name, gist_id);
    Ok(())
}

// Update an existing file's content
pub async fn update_gist_file(
    ctx: &GistContext<'_>,
    gist_id: &str,
    file: &Path,
    filename: Option<&str>,
) -> Result<()> {
    patch_file_content(ctx, gist_id, file, filename, "update", "Updated").await
}

// Add a new file
pub async fn add_gist_file(
    ctx: &GistContext<'_>,
    gist_id: &str,
    file: &Path,
    filename: Option<&str>,
) -> Result<()> {
    patch_file_content(ctx, gist_id, file, filename, "add", "Added").await
}

// Remove a file (a null file entry deletes it)
pub async fn remove_gist_file(ctx: &GistContext<'_>, gist_id: &str, filename: &str) -> Result<()> {
    let payload = json!({
        "files": { filename: Value::Null }
    });

    let _: Value = ctx
        .client
        .patch(&format!("/gists/{}", gist_id), &payload)
        .await
        .with_context(|| format!("Failed to remove '{}' from gist {}", filename, gist_id))?;

    tracing::info!(%gist_id, file = %filename, "Gist file removed successfully");
    println!("✅ Removed '{}' from gist {}", filename, gist_id);
    Ok(())
}

// Rename a file
pub async fn rename_gist_file(
    ctx: &GistContext<'_>,
    gist_id: &str,
    old_name: &str,
    new_name: &str,
) -> Result<()> {
    let payload = json!({
        "files": { old_name: { "filename": new_name } }
    });

    let _: Value = ctx
        .client
        .patch(&format!("/gists/{}", gist_id), &payload)
        .await
        .with_context(|| format!("Failed to rename '{}' in gist {}", old_name, gist_id))?;

    tracing::info!(%gist_id, from = %old_name, to = %new_name, "Gist file renamed successfully");
    println!("✅ Renamed '{}' to '{}' in gist {}", old_name, new_name, gist_id);
    Ok(())
}

// Set description
pub async fn set_gist_description(
    ctx: &GistContext<'_>,
    gist_id: &str,
    description: &str,
) -> Result<()> {
    let payload = json!({ "description": description });

    let _: Value = ctx
        .client
        .patch(&format!("/gists/{}", gist_id), &payload)
        .await
        .with_context(|| format!("Failed to update description of gist {}", gist_id))?;

    tracing::info!(%gist_id, "Gist description updated successfully");
    println!("✅ Updated description of gist {}", gist_id);
    Ok(())
}

// Delete gist
pub async fn delete_gist(ctx: &GistContext<'_>, gist_id: &str, force: bool) -> Result<()> {
    if !force {
        println!(
            "⚠️  This will permanently delete gist {}. Use --force to confirm.",
            gist_id
        );
        return Ok(());
    }

    let _: Value = ctx
        .client
        .delete(&format!("/gists/{}", gist_id))
        .await
        .with_context(|| format!("Failed to delete gist {}", gist_id))?;

    tracing::info!(%gist_id, "Gist deleted successfully");
    println!("✅ Deleted gist {}", gist_id);
    Ok(())
}

/// Case-insensitive substring match over description and file names.
fn matches_query(gist: &Gist, needle: &str) -> bool {
    let needle = needle.to_lowercase();

    if let Some(description) = &gist.description {
        if description.to_lowercase().contains(&needle) {
            return true;
        }
    }

    gist.files
        .keys()
        .any(|name| name.to_lowercase().contains(&needle))
}

// Search gists client-side: the Gists API has no search endpoint, so
// one listing page is fetched and filtered locally.
pub async fn search_gists(ctx: &GistContext<'_>, query: &str, limit: Option<usize>) -> Result<()> {
    let per_page = limit.unwrap_or(100);

    let gists: Vec<Gist> = ctx
        .client
        .get(&format!("/gists?per_page={}", per_page))
        .await
        .context("Failed to list gists for search")?;

    let matches: Vec<Gist> = gists.into_iter().filter(|g| matches_query(g, query)).collect();

    ctx.renderer.render(&gist_rows(&matches))
}
