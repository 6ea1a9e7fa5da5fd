//! Document statistics command.

use console::style;

use crate::api::GedClient;
use crate::cli::helpers::{format_number, truncate, type_label};

/// Show totals per document type and the most recent uploads.
pub async fn cmd_stats(client: &GedClient) -> anyhow::Result<()> {
    let stats = client.stats().await?;

    println!("\n{}", style("Document library").bold());
    println!("{}", "-".repeat(50));
    println!(
        "{:<30} {:>10}",
        "Total documents",
        format_number(stats.total_documents)
    );

    if !stats.documents_by_type.is_empty() {
        println!("\n{}", style("By type").bold());
        for (key, count) in &stats.documents_by_type {
            println!("  {:<28} {:>10}", type_label(key), format_number(*count));
        }
    }

    if !stats.recent_documents.is_empty() {
        println!("\n{}", style("Recent uploads").bold());
        for doc in &stats.recent_documents {
            let date = doc
                .upload_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  {:<6} {:<35} {:<14} {}",
                doc.id,
                truncate(&doc.title, 34),
                doc.document_type.as_deref().map(type_label).unwrap_or_default(),
                style(date).dim()
            );
        }
    }

    Ok(())
}
