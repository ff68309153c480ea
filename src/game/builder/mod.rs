//! Builder Module
//!
//! Stone placement: the running-bond planner and the editor session that
//! drives it from UI signals.

pub mod planner;
pub mod session;

pub use planner::{Brush, plan_drag, plan_stack};
pub use session::{EditorSession, EditorState};
