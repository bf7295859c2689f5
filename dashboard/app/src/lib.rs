//! Session layer of the injector dashboard.
//!
//! Owns everything that lives for one page session: the current selection,
//! the fetched on-chain snapshot, the staged edit overlay, and the refresh
//! orchestration that fans reads out and merges only results still belonging
//! to the current selection.

pub mod edits;
pub mod refresh;
pub mod selection;
pub mod state;
pub mod view;

pub use edits::{EditError, EditSession, StagedEdit};
pub use refresh::{SharedState, refresh};
pub use selection::{Selection, SelectionError, SelectionId};
pub use state::{RecipientStatus, SessionState};
pub use view::{DashboardRow, DashboardView, build_view};
