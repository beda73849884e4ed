//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use tagaudit_core::prelude::*;
//! ```

pub use crate::audit::{AuditReport, TagUsage};
pub use crate::builder::{IdentifierSource, TagAudit};
pub use crate::config::{load_config, TagauditConfig};
pub use crate::error::{TagauditError, TagauditResult};
pub use crate::scan::FileType;
pub use crate::search::{Backend, SearchProvider, SearchRequest};
