//! Document category management commands.

use console::style;

use crate::api::GedClient;
use crate::cli::helpers::{confirm, truncate};
use crate::models::CategoryInput;

/// List document categories.
pub async fn cmd_categories_list(client: &GedClient) -> anyhow::Result<()> {
    let categories = client.list_categories().await?;

    if categories.is_empty() {
        println!("{} No categories defined", style("!").yellow());
        return Ok(());
    }

    println!("\n{}", style("Document categories").bold());
    println!("{}", "-".repeat(70));
    println!("{:<6} {:<25} {:<8} Description", "ID", "Name", "Parent");
    println!("{}", "-".repeat(70));

    for category in categories {
        println!(
            "{:<6} {:<25} {:<8} {}",
            category.id,
            truncate(&category.name, 24),
            category
                .parent
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".to_string()),
            category.description.as_deref().unwrap_or("")
        );
    }

    Ok(())
}

/// Create a category.
pub async fn cmd_categories_add(
    client: &GedClient,
    name: &str,
    description: Option<String>,
    parent: Option<i64>,
) -> anyhow::Result<()> {
    if name.trim().is_empty() {
        anyhow::bail!("Category name cannot be empty");
    }

    let input = CategoryInput {
        name: name.trim().to_string(),
        description,
        parent,
    };
    let created = client.create_category(&input).await?;
    println!(
        "{} Created category #{} {}",
        style("✓").green(),
        created.id,
        style(&created.name).bold()
    );
    Ok(())
}

/// Rename a category, keeping its description and parent.
pub async fn cmd_categories_rename(client: &GedClient, id: i64, name: &str) -> anyhow::Result<()> {
    if name.trim().is_empty() {
        anyhow::bail!("Category name cannot be empty");
    }

    let existing = client
        .list_categories()
        .await?
        .into_iter()
        .find(|c| c.id == id)
        .ok_or_else(|| anyhow::anyhow!("Category not found: {}", id))?;

    let input = CategoryInput {
        name: name.trim().to_string(),
        description: existing.description.clone(),
        parent: existing.parent,
    };
    let updated = client.update_category(id, &input).await?;
    println!(
        "{} Renamed category #{}: {} → {}",
        style("✓").green(),
        id,
        existing.name,
        style(&updated.name).bold()
    );
    Ok(())
}

/// Delete a category after confirmation.
pub async fn cmd_categories_rm(client: &GedClient, id: i64, yes: bool) -> anyhow::Result<()> {
    if !yes && !confirm(&format!("Delete category #{}?", id))? {
        println!("{} Cancelled", style("!").yellow());
        return Ok(());
    }

    client.delete_category(id).await?;
    println!("{} Deleted category #{}", style("✓").green(), id);
    Ok(())
}
