//! clock-core: time-window and angle-projection engine for the routine clock

pub mod dial;
pub mod routine;
pub mod selector;
pub mod store;
pub mod task;
pub mod time;
pub mod view;
pub mod window;

pub use dial::{ArcPart, ArcStyle, HandAngles, arc_parts, hand_angles, minute_markers, polar};
pub use routine::{Routine, RoutineLabel, RoutineSet};
pub use selector::{ActiveRoutine, select_active};
pub use store::{MemoryStore, RoutineStore};
pub use task::Task;
pub use time::{format_minutes, minutes_since_midnight, parse_time_to_minutes};
pub use view::{DialView, build_view};
pub use window::{TaskState, VisibleTask, WindowPolicy, compute_visible_tasks};
