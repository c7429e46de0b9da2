//! Vault index, structural validator and operation engine
//!
//! A [`Vault`] lazily indexes a flat directory of markdown notes. The
//! [`Operations`] engine sits on top of it and runs every read, write,
//! rename, delete, section edit, search and tag change against that index.

pub mod context;
pub mod error;
pub mod note;
pub mod operations;
pub mod results;
pub mod scanner;
pub mod sections;
pub mod storage;
pub mod tags;
pub mod validation;
pub mod vault;

pub use context::{context_block, ContextInjector};
pub use error::{ErrorKind, VaultError, VaultResult};
pub use note::Note;
pub use operations::{Operations, SearchMode};
pub use results::{
    BatchFailure, BatchResult, BrokenLink, DeleteResult, InsertPosition, InsertResult,
    LinkDirection, LinksResult, NoteList, NoteMetadata, RenameResult, ReplaceResult,
    SearchResult, TagUpdate, WriteResult,
};
pub use scanner::VaultScanner;
pub use tags::{TagLogic, TagPolicy, TagRule};
pub use validation::{ValidationWarning, Validator, WarningRule};
pub use vault::{ScanDiagnostic, Vault, VaultIndex};

// Re-exported so adapters need only this crate
pub use notegraph_config::{init_logging, NotegraphConfig};
pub use notegraph_parser::Heading;
