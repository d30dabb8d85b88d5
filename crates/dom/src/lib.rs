//! Versioned-tree DOM query engine
//!
//! Answers DOM-style structural and geometric queries against immutable
//! snapshots of a UI tree that a commit pipeline replaces wholesale.
//!
//! ## Core Design
//!
//! ```text
//! RevisionProvider ─→ Arc<Revision> (fetched once per query)
//!                          ↓
//!                 locator: root → … → node path (by identity)
//!                          ↓
//!              query (ordering, navigation) / geometry (rects, offsets)
//! ```
//!
//! Nodes carry no parent pointers so unchanged subtrees can be shared
//! between revisions; ancestry is always recomputed against the revision at
//! hand.

pub mod description;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod locator;
pub mod node;
pub mod pointer;
pub mod query;
pub mod revision;
pub mod serializer;
pub mod types;
pub mod utils;

pub use description::{parse_tree, parse_tree_str};
pub use engine::{DomEngine, NodeRef};
pub use error::{DomError, Result};
pub use geometry::{DomOffset, OffsetParentRule, PositionedAncestor};
pub use node::Node;
pub use pointer::PointerCaptureAuthority;
pub use revision::{Revision, RevisionProvider};
pub use serializer::RevisionSerializer;
pub use types::*;
