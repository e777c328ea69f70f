//! Public API for external capabilities and their adapters

pub use crate::backend::directory::DirectoryDatabase;
pub use crate::backend::error::{BackendError, BackendResult};
pub use crate::backend::github::{GitHubHost, DEFAULT_API_BASE};
pub use crate::backend::memory::MemoryDatabase;
pub use crate::backend::process::ProcessTaskRunner;
pub use crate::backend::promoter::{ChannelPromoter, LogPromoter};
pub use crate::backend::traits::{Database, Promoter, RepositoryHost, TaskRunner};
