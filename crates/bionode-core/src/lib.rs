//! bionode-core: the node contract shared by every lookup.
//!
//! A node is an immutable declaration record ([`NodeMeta`]) attached to a type:
//! - data nodes ([`DataNode`]) are serde types with a schema and a view,
//! - process nodes ([`ProcessNode`]) resolve typed inputs into a data node.
//!
//! Graph execution and UI rendering belong to the host; this crate only
//! describes nodes, validates payloads and produces view models.

pub mod meta;
pub mod node;
pub mod notify;
pub mod schema;
pub mod terms;
pub mod view;

pub use meta::{Catalog, CatalogEntry, Icon, NodeKind, NodeMeta};
pub use node::{DataNode, ProcessNode, ResolveContext, Story};
pub use notify::{Notification, NotificationKind, Notifier};
pub use view::{Cell, Field, Table, View};

pub use bionode_common::{BionodeError, Result};
