//! Extension seam for document stores.
//!
//! The knowledge base service talks to its backing store only through
//! [`DocumentStore`]. [`NotionClient`](crate::notion::NotionClient) is the
//! production implementation; tests plug in an in-memory store.
//!
//! ```text
//! ┌───────────────────────────────────────────┐
//! │              KnowledgeBase                │
//! │   query / article_count / load_document   │
//! └──────────────┬────────────────────────────┘
//!                ▼
//!     Arc<dyn DocumentStore>
//!     ┌──────────────┐  ┌────────────────┐
//!     │ NotionClient │  │ custom (Rust)  │
//!     └──────────────┘  └────────────────┘
//! ```

use async_trait::async_trait;

use crate::blocks::ContentBlock;
use crate::error::StoreError;
use crate::models::{PageDetails, RawRecord};

// ═══════════════════════════════════════════════════════════════════════
// DocumentStore Trait
// ═══════════════════════════════════════════════════════════════════════

/// A searchable collection of block-structured documents.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use kb_harness::blocks::ContentBlock;
/// use kb_harness::error::StoreError;
/// use kb_harness::models::{PageDetails, RawRecord};
/// use kb_harness::traits::DocumentStore;
///
/// struct EmptyStore;
///
/// #[async_trait]
/// impl DocumentStore for EmptyStore {
///     fn name(&self) -> &str { "empty" }
///     async fn search(&self, _query: &str) -> Result<Vec<RawRecord>, StoreError> { Ok(vec![]) }
///     async fn count_all(&self) -> Result<usize, StoreError> { Ok(0) }
///     async fn fetch_blocks(&self, _id: &str) -> Result<Vec<ContentBlock>, StoreError> { Ok(vec![]) }
///     async fn fetch_details(&self, _id: &str) -> Result<PageDetails, StoreError> {
///         Ok(PageDetails::default())
///     }
/// }
/// ```
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short name used in log fields.
    fn name(&self) -> &str;

    /// Records whose title contains `query`. One page, no pagination.
    async fn search(&self, query: &str) -> Result<Vec<RawRecord>, StoreError>;

    /// Number of records in the first stats page. Capped by the page size.
    async fn count_all(&self) -> Result<usize, StoreError>;

    /// Direct children of `block_id`, one level, in document order.
    /// Returned blocks have empty `children`.
    async fn fetch_blocks(&self, block_id: &str) -> Result<Vec<ContentBlock>, StoreError>;

    /// Page-level metadata: cover, icon and properties.
    async fn fetch_details(&self, page_id: &str) -> Result<PageDetails, StoreError>;
}
