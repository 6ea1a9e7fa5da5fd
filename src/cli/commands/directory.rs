//! Tender and consultant listings used when linking documents.

use console::style;

use crate::api::GedClient;
use crate::cli::helpers::truncate;

/// List tenders.
pub async fn cmd_tenders(client: &GedClient) -> anyhow::Result<()> {
    let tenders = client.list_tenders().await;

    if tenders.is_empty() {
        println!("{} No tenders available", style("!").yellow());
        return Ok(());
    }

    println!("\n{}", style("Tenders").bold());
    println!("{}", "-".repeat(80));
    println!(
        "{:<6} {:<35} {:<20} {:<12} Status",
        "ID", "Project", "Client", "Deadline"
    );
    println!("{}", "-".repeat(80));

    for tender in tenders {
        println!(
            "{:<6} {:<35} {:<20} {:<12} {}",
            tender.id,
            truncate(tender.nom_projet.as_deref().unwrap_or("-"), 34),
            truncate(tender.client.as_deref().unwrap_or("-"), 19),
            tender.date_limite.as_deref().unwrap_or("-"),
            tender.statut.as_deref().unwrap_or("")
        );
    }

    Ok(())
}

/// List consultants.
pub async fn cmd_consultants(client: &GedClient) -> anyhow::Result<()> {
    let consultants = client.list_consultants().await;

    if consultants.is_empty() {
        println!("{} No consultants available", style("!").yellow());
        return Ok(());
    }

    println!("\n{}", style("Consultants").bold());
    println!("{}", "-".repeat(70));
    println!("{:<6} {:<30} Email", "ID", "Name");
    println!("{}", "-".repeat(70));

    for consultant in consultants {
        println!(
            "{:<6} {:<30} {}",
            consultant.id,
            truncate(&consultant.display_name(), 29),
            consultant.email.as_deref().unwrap_or("")
        );
    }

    Ok(())
}
