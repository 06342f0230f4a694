//! DocType form metadata model.
//!
//! Field definitions arrive as a flat, ordered list; documents as a map of
//! field values. Both are owned by the caller and only ever read here.

pub mod document;
pub mod error;
pub mod field;
pub mod kind;
pub mod load;
pub mod registry;
pub mod roles;

pub use document::{DocumentSnapshot, LOGIN_USER_ROLE, value_text};
pub use error::{ModelError, Result};
pub use field::FieldDefinition;
pub use kind::FieldKind;
pub use load::{load_document, load_fields, load_sub_tables};
pub use registry::SubTableRegistry;
pub use roles::UserRoles;
