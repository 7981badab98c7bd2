mod book;
mod content;
mod flight;
mod goal;
mod ids;
mod time_block;

pub use book::{Book, BookError, BookFormat, Note};
pub use content::{ContentError, ContentItem, Platform};
pub use flight::{FlightPhase, FlightRoute};
pub use goal::{Goal, GoalError, GoalKind};
pub use ids::{BookId, ContentId, GoalId, NoteId, ParseIdError, SessionId, TimeBlockId};
pub use time_block::{BlockCategory, TimeBlock, TimeBlockError, TimeBlockUpdate};
