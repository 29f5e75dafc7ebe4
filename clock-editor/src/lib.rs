//! clock-editor: routine editing session, start-time projection, validation and icon suggestions

pub mod schedule;
pub mod session;
pub mod suggest;
pub mod validate;

pub use schedule::{TaskDraft, build_routine, compute_end_time, compute_start_times};
pub use session::{Direction, EditorSession, RoutineDraft, RoutinePreview};
pub use suggest::{Suggestion, SuggestionSession, keyword_match};
pub use validate::{ValidationError, validate};
