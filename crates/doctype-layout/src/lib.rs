//! Form layout: groups a flat DocType field list into tabs, sections and
//! columns, with visibility and collapse state applied.
//!
//! ```ignore
//! use doctype_layout::{CollapseState, LayoutEngine};
//!
//! let mut collapse = CollapseState::new();
//! let layout = LayoutEngine::new(&roles)
//!     .with_sub_tables(&registry)
//!     .build(&fields, Some(&doc), &mut collapse);
//! ```

pub mod collapse;
pub mod engine;
pub mod outline;
pub mod types;

pub use collapse::CollapseState;
pub use engine::{LayoutEngine, MAIN_TAB_KEY};
pub use outline::render_outline;
pub use types::{LayoutResult, PlacedField, Section, Tab};
