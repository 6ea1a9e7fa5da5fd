//! Data models for the GED document library.

mod category;
mod directory;
mod document;
mod folder;
mod stats;

pub use category::{CategoryInput, DocumentCategory};
pub use directory::{ConsultantSummary, ServerFolder, TenderFolders, TenderSummary};
pub use document::{parse_tags, Document, DocumentType, FileKind};
pub use folder::{FolderKey, FolderType};
pub use stats::{DocumentStats, RecentDocument};
