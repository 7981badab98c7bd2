use chrono::{DateTime, Utc};

use cabin_core::model::{
    Book, BookError, BookFormat, BookId, Goal, GoalError, GoalId, GoalKind, NoteId,
};

use crate::seq::IdSeq;

/// Fields the caller supplies when adding a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub format: BookFormat,
    pub total_pages: u32,
    pub language: Option<String>,
    pub description: Option<String>,
}

/// Fields the caller supplies when adding a goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGoal {
    pub title: Option<String>,
    pub kind: GoalKind,
    pub target: u32,
    pub deadline: DateTime<Utc>,
    pub unit: String,
}

/// Library, recommendations and reading goals.
///
/// Mutations targeting an unknown id are lenient no-ops returning `false` (or
/// `None`); creation paths validate and return `Result`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadingSlice {
    library: Vec<Book>,
    recommendations: Vec<Book>,
    goals: Vec<Goal>,
    book_ids: IdSeq,
    goal_ids: IdSeq,
}

impl ReadingSlice {
    #[must_use]
    pub fn new() -> Self {
        Self {
            library: Vec::new(),
            recommendations: Vec::new(),
            goals: Vec::new(),
            book_ids: IdSeq::starting_at(1),
            goal_ids: IdSeq::starting_at(1),
        }
    }

    /// The launch catalog: two local-author books in the library and one
    /// recommendation.
    ///
    /// # Panics
    ///
    /// Panics if the seed constants fail validation, which would be a bug in
    /// the seed itself.
    #[must_use]
    pub fn seeded() -> Self {
        let mut slice = Self::new();

        let kintu = Book::new(
            BookId::new(slice.book_ids.next()),
            "Kintu",
            "Jennifer Nansubuga Makumbi",
            BookFormat::Epub,
            446,
        )
        .expect("seed book is valid")
        .with_description(
            "A modern classic of Ugandan literature that weaves together the threads \
             of ancient history and modern life.",
        );
        slice.library.push(kintu);

        let tropical_fish = Book::new(
            BookId::new(slice.book_ids.next()),
            "Tropical Fish: Tales from Entebbe",
            "Doreen Baingana",
            BookFormat::Pdf,
            128,
        )
        .expect("seed book is valid")
        .with_description(
            "A collection of linked short stories that explore the coming of age \
             of three African sisters.",
        );
        slice.library.push(tropical_fish);

        let first_woman = Book::new(
            BookId::new(slice.book_ids.next()),
            "The First Woman",
            "Jennifer Nansubuga Makumbi",
            BookFormat::Epub,
            420,
        )
        .expect("seed book is valid")
        .with_description(
            "A powerful feminist rendition of Ugandan origin tales, The First Woman \
             tells the story of Kirabo.",
        );
        slice.recommendations.push(first_woman);

        slice
    }

    // Reads

    #[must_use]
    pub fn books(&self) -> &[Book] {
        &self.library
    }

    #[must_use]
    pub fn recommendations(&self) -> &[Book] {
        &self.recommendations
    }

    #[must_use]
    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    #[must_use]
    pub fn book(&self, id: BookId) -> Option<&Book> {
        self.library.iter().find(|b| b.id() == id)
    }

    #[must_use]
    pub fn goal(&self, id: GoalId) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id() == id)
    }

    fn book_mut(&mut self, id: BookId) -> Option<&mut Book> {
        self.library.iter_mut().find(|b| b.id() == id)
    }

    // Books

    /// # Errors
    ///
    /// Returns `BookError` if the supplied fields fail validation.
    pub fn add_book(&mut self, new: NewBook) -> Result<BookId, BookError> {
        let id = BookId::new(self.book_ids.next());
        let mut book = Book::new(id, new.title, new.author, new.format, new.total_pages)?;
        if let Some(language) = new.language {
            book = book.with_language(language);
        }
        if let Some(description) = new.description {
            book = book.with_description(description);
        }
        self.library.push(book);
        Ok(id)
    }

    /// Removes and returns the book; unknown ids return `None`.
    pub fn remove_book(&mut self, id: BookId) -> Option<Book> {
        let index = self.library.iter().position(|b| b.id() == id)?;
        Some(self.library.remove(index))
    }

    pub fn update_progress(&mut self, id: BookId, page: u32, now: DateTime<Utc>) -> bool {
        match self.book_mut(id) {
            Some(book) => {
                book.set_current_page(page, now);
                true
            }
            None => false,
        }
    }

    pub fn advance_progress(&mut self, id: BookId, pages: u32, now: DateTime<Utc>) -> bool {
        match self.book_mut(id) {
            Some(book) => {
                book.advance_pages(pages, now);
                true
            }
            None => false,
        }
    }

    pub fn add_reading_minutes(&mut self, id: BookId, minutes: u32) -> bool {
        match self.book_mut(id) {
            Some(book) => {
                book.add_reading_minutes(minutes);
                true
            }
            None => false,
        }
    }

    pub fn add_bookmark(&mut self, id: BookId, page: u32) -> bool {
        self.book_mut(id).is_some_and(|book| book.add_bookmark(page))
    }

    pub fn remove_bookmark(&mut self, id: BookId, page: u32) -> bool {
        self.book_mut(id)
            .is_some_and(|book| book.remove_bookmark(page))
    }

    pub fn add_note(
        &mut self,
        id: BookId,
        page: u32,
        content: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Option<NoteId> {
        self.book_mut(id).map(|book| book.add_note(page, content, now))
    }

    pub fn remove_note(&mut self, id: BookId, note_id: NoteId) -> bool {
        self.book_mut(id).is_some_and(|book| book.remove_note(note_id))
    }

    // Goals

    /// # Errors
    ///
    /// Returns `GoalError::InvalidTarget` for a zero target.
    pub fn add_goal(&mut self, new: NewGoal) -> Result<GoalId, GoalError> {
        let id = GoalId::new(self.goal_ids.next());
        let goal = Goal::new(id, new.title, new.kind, new.target, new.deadline, new.unit)?;
        self.goals.push(goal);
        Ok(id)
    }

    pub fn update_goal_progress(&mut self, id: GoalId, value: u32) -> bool {
        match self.goals.iter_mut().find(|g| g.id() == id) {
            Some(goal) => {
                goal.set_current(value);
                true
            }
            None => false,
        }
    }

    pub fn remove_goal(&mut self, id: GoalId) -> bool {
        let before = self.goals.len();
        self.goals.retain(|g| g.id() != id);
        self.goals.len() != before
    }
}

impl Default for ReadingSlice {
    fn default() -> Self {
        Self::new()
    }
}
