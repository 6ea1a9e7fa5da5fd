//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod categories;
mod config_cmd;
mod directory;
mod documents;
mod stats;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::api::{DocumentForm, GedClient};
use crate::config::{load_settings_with_options, LoadOptions};
use crate::filter::{FilterField, FilterState};
use crate::models::{DocumentType, FolderType};

#[derive(Parser)]
#[command(name = "ged")]
#[command(about = "Document library (GED) of the consultant staffing platform")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Resolve relative paths from current working directory instead of config file location
    #[arg(long, global = true)]
    cwd: bool,

    /// API root URL (overrides config and GED_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

/// Output format for listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    /// One document id per line
    Ids,
}

/// Filters of the flat document list.
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Document type (CV, RAPPORT, ...; "tous" for any)
    #[arg(long = "type")]
    document_type: Option<String>,
    /// Category id
    #[arg(long)]
    category: Option<String>,
    /// Folder type (ADMIN, TECHNIQUE, ...)
    #[arg(long)]
    folder: Option<String>,
    /// Tender (appel d'offre) id
    #[arg(long)]
    tender: Option<String>,
    /// Free-text search
    #[arg(short, long)]
    search: Option<String>,
}

impl FilterArgs {
    fn values(&self) -> [(FilterField, Option<&str>); 5] {
        [
            (FilterField::DocumentType, self.document_type.as_deref()),
            (FilterField::CategoryId, self.category.as_deref()),
            (FilterField::FolderType, self.folder.as_deref()),
            (FilterField::AppelOffreId, self.tender.as_deref()),
            (FilterField::Search, self.search.as_deref()),
        ]
    }

    fn to_filter(&self) -> FilterState {
        self.values()
            .into_iter()
            .fold(FilterState::new(), |filter, (field, value)| {
                filter.with(field, value)
            })
    }
}

/// Editable document fields shared by `upload` and `edit`.
#[derive(Args, Debug, Default)]
pub struct DocumentFields {
    #[arg(long)]
    description: Option<String>,
    /// Document type (APPEL_OFFRE, ETUDE, RAPPORT, CV, METHODOLOGIE, CONTRAT, AUTRE)
    #[arg(long = "type")]
    document_type: Option<String>,
    /// Folder (ADMIN, TECHNIQUE, FINANCE, CONTEXTE, OUTREACH, GENERAL)
    #[arg(long)]
    folder: Option<String>,
    /// Comma-separated tags
    #[arg(long)]
    tags: Option<String>,
    /// Make the document public
    #[arg(long, conflicts_with = "private")]
    public: bool,
    /// Make the document private
    #[arg(long)]
    private: bool,
    /// Also store the file on kDrive
    #[arg(long)]
    kdrive: bool,
    /// Consultant id ("" to unlink)
    #[arg(long)]
    consultant: Option<String>,
    /// Tender id ("" to unlink)
    #[arg(long)]
    tender: Option<String>,
    /// Category id ("" to unlink)
    #[arg(long)]
    category: Option<String>,
}

impl DocumentFields {
    /// Write the given flags onto `form`, leaving unset fields alone.
    fn apply(&self, form: &mut DocumentForm) -> anyhow::Result<()> {
        if let Some(ref description) = self.description {
            form.description = description.clone();
        }
        if let Some(ref raw) = self.document_type {
            form.document_type = DocumentType::from_str(raw)
                .ok_or_else(|| {
                    let valid: Vec<&str> = DocumentType::ALL.iter().map(|t| t.as_str()).collect();
                    anyhow::anyhow!(
                        "Unknown document type: {} (expected one of {})",
                        raw,
                        valid.join(", ")
                    )
                })?;
        }
        if let Some(ref raw) = self.folder {
            form.folder_type = FolderType::from_str(raw)
                .ok_or_else(|| anyhow::anyhow!("Unknown folder: {}", raw))?;
        }
        if let Some(ref tags) = self.tags {
            form.tags = tags.clone();
        }
        if self.public {
            form.is_public = true;
        } else if self.private {
            form.is_public = false;
        }
        if self.kdrive {
            form.use_kdrive = true;
        }
        if let Some(ref consultant) = self.consultant {
            form.consultant = consultant.clone();
        }
        if let Some(ref tender) = self.tender {
            form.appel_offre = tender.clone();
        }
        if let Some(ref category) = self.category {
            form.category = category.clone();
        }
        Ok(())
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List documents (flat view)
    Ls {
        #[command(flatten)]
        filters: FilterArgs,
        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Show documents grouped by folder
    Folders {
        /// Scope to one tender (server-side grouping)
        #[arg(long)]
        tender: Option<String>,
        /// Document type (not applied by the folder view)
        #[arg(long = "type")]
        document_type: Option<String>,
        /// Free-text search (not applied by the folder view)
        #[arg(short, long)]
        search: Option<String>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Upload a new document
    Upload {
        /// File to upload
        file: PathBuf,
        /// Document title
        #[arg(long)]
        title: String,
        #[command(flatten)]
        fields: DocumentFields,
    },

    /// Edit an existing document
    Edit {
        /// Document id
        id: i64,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// Replace the stored file
        #[arg(long)]
        file: Option<PathBuf>,
        #[command(flatten)]
        fields: DocumentFields,
    },

    /// Delete a document
    Rm {
        /// Document id
        id: i64,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Download a document file
    Download {
        /// Document id
        id: i64,
        /// Output file or directory (defaults to the download directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Only print the download URL
        #[arg(long)]
        url_only: bool,
    },

    /// Manage document categories
    Categories {
        #[command(subcommand)]
        command: CategoryCommands,
    },

    /// Show document statistics
    Stats,

    /// List tenders available for linking
    Tenders,

    /// List consultants available for linking
    Consultants,

    /// Show configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum CategoryCommands {
    /// List categories
    List,
    /// Add a category
    Add {
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Parent category id
        #[arg(long)]
        parent: Option<i64>,
    },
    /// Rename a category
    Rename { id: i64, name: String },
    /// Delete a category
    Rm {
        id: i64,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show resolved settings and where they came from
    Show,
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config,
        use_cwd: cli.cwd,
        api_url: cli.api_url,
    };
    let (settings, config) = load_settings_with_options(options).await;

    // Config commands work without a reachable API
    if let Commands::Config {
        command: ConfigCommands::Show,
    } = cli.command
    {
        return config_cmd::cmd_config_show(&settings, &config);
    }

    let client = GedClient::from_settings(&settings)?;

    match cli.command {
        Commands::Ls { filters, format } => documents::cmd_ls(&client, &filters, format).await,
        Commands::Folders {
            tender,
            document_type,
            search,
            format,
        } => {
            let filters = FilterArgs {
                document_type,
                tender,
                search,
                ..Default::default()
            };
            documents::cmd_folders(&client, &filters, format).await
        }
        Commands::Upload {
            file,
            title,
            fields,
        } => documents::cmd_upload(&client, &settings, &file, &title, &fields).await,
        Commands::Edit {
            id,
            title,
            file,
            fields,
        } => {
            documents::cmd_edit(
                &client,
                &settings,
                id,
                title.as_deref(),
                file.as_deref(),
                &fields,
            )
            .await
        }
        Commands::Rm { id, yes } => documents::cmd_rm(&client, id, yes).await,
        Commands::Download {
            id,
            output,
            url_only,
        } => documents::cmd_download(&client, &settings, id, output.as_deref(), url_only).await,
        Commands::Categories { command } => match command {
            CategoryCommands::List => categories::cmd_categories_list(&client).await,
            CategoryCommands::Add {
                name,
                description,
                parent,
            } => categories::cmd_categories_add(&client, &name, description, parent).await,
            CategoryCommands::Rename { id, name } => {
                categories::cmd_categories_rename(&client, id, &name).await
            }
            CategoryCommands::Rm { id, yes } => {
                categories::cmd_categories_rm(&client, id, yes).await
            }
        },
        Commands::Stats => stats::cmd_stats(&client).await,
        Commands::Tenders => directory::cmd_tenders(&client).await,
        Commands::Consultants => directory::cmd_consultants(&client).await,
        Commands::Config { .. } => Ok(()),
    }
}
