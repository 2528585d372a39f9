// Purpose: Turn chords and arpeggio patterns into timed note events
// Nothing here touches audio; the engine realizes the notes afterwards

pub mod arpeggio;
pub mod chord;
pub mod duration;
pub mod event;
pub mod strum;

pub use arpeggio::{ArpeggioPattern, ArpeggioScheduler, ArpeggioStep};
pub use chord::ChordShape;
pub use duration::Duration;
pub use event::{NoteSchedule, PlayedNote};
pub use strum::{StrumDirection, StrumScheduler};
