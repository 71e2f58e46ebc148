//! Book operations with once-only completion rewards.

use super::GameState;
use crate::events::EngineEvent;
use crate::model::book::{Book, BookDraft, BookPatch, BookStatus, Crossing};
use crate::model::RecordId;
use crate::store::StoreResult;

/// Book position after a progress update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookProgress {
    pub current_page: u32,
    pub progress: u8,
    pub status: BookStatus,
}

impl GameState {
    pub fn add_book(&mut self, draft: BookDraft) -> RecordId {
        let book = Book::from_draft(draft);
        let id = book.id.clone();
        self.books.push(book);
        id
    }

    /// Edits a book; a change of `total_pages` that crosses 100% is settled
    /// exactly like a page change.
    pub fn update_book(&mut self, id: &str, patch: BookPatch) -> StoreResult<BookProgress> {
        let book = self.books.require_mut(id)?;
        let crossing = book.apply(patch);
        let amount = settle_award(book, crossing);
        let progress = position(book);
        self.apply_crossing(id, crossing, amount);
        Ok(progress)
    }

    pub fn remove_book(&mut self, id: &str) -> StoreResult<()> {
        self.books.remove(id).map(|_| ())
    }

    /// Moves the bookmark to `page` (clamped to the book length).
    pub fn set_book_progress(&mut self, id: &str, page: u32) -> StoreResult<BookProgress> {
        let book = self.books.require_mut(id)?;
        let crossing = book.set_page(page);
        let amount = settle_award(book, crossing);
        let progress = position(book);
        self.apply_crossing(id, crossing, amount);
        Ok(progress)
    }

    fn apply_crossing(&mut self, id: &str, crossing: Crossing, points: u64) {
        match crossing {
            Crossing::Finished => {
                self.credit(points);
                self.push_event(EngineEvent::BookFinished {
                    id: id.to_string(),
                    points,
                });
            }
            Crossing::Reopened => {
                self.debit(points);
                self.push_event(EngineEvent::BookReopened {
                    id: id.to_string(),
                    points,
                });
            }
            Crossing::Unchanged => {}
        }
    }
}

/// Records or releases the completion award on the book itself so a reopen
/// gives back exactly what the finish credited.
fn settle_award(book: &mut Book, crossing: Crossing) -> u64 {
    match crossing {
        Crossing::Finished => {
            book.awarded_points = Some(book.total_points);
            book.total_points
        }
        Crossing::Reopened => book.awarded_points.take().unwrap_or(book.total_points),
        Crossing::Unchanged => 0,
    }
}

fn position(book: &Book) -> BookProgress {
    BookProgress {
        current_page: book.current_page,
        progress: book.progress,
        status: book.status,
    }
}

#[cfg(test)]
mod tests {
    use crate::config::RewardConfig;
    use crate::model::book::{BookDraft, BookPatch, BookStatus};
    use crate::state::GameState;
    use chrono::NaiveDate;

    fn draft(total_pages: u32) -> BookDraft {
        BookDraft {
            title: "Atomic Habits".to_string(),
            author: "James Clear".to_string(),
            total_points: 500,
            deadline: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            total_pages,
            cover: None,
        }
    }

    #[test]
    fn finishing_awards_once_and_reopening_reverses_once() {
        let mut state = GameState::new(RewardConfig::default());
        let id = state.add_book(draft(300));

        state.set_book_progress(&id, 120).unwrap();
        assert_eq!(state.ledger().points(), 0);

        let done = state.set_book_progress(&id, 300).unwrap();
        assert_eq!(done.status, BookStatus::Completed);
        state.set_book_progress(&id, 300).unwrap();
        state.set_book_progress(&id, 5_000).unwrap();
        assert_eq!(state.ledger().points(), 500);

        state.set_book_progress(&id, 150).unwrap();
        state.set_book_progress(&id, 10).unwrap();
        assert_eq!(state.ledger().points(), 0);
        assert_eq!(state.ledger().lifetime_xp(), 0);
    }

    #[test]
    fn reopening_after_reward_edit_returns_original_award() {
        let mut state = GameState::new(RewardConfig::default());
        let id = state.add_book(draft(100));
        state.set_book_progress(&id, 100).unwrap();

        let progress = state
            .update_book(
                &id,
                BookPatch {
                    total_points: Some(900),
                    total_pages: Some(200),
                    ..BookPatch::default()
                },
            )
            .unwrap();
        assert_eq!(progress.progress, 50);
        assert_eq!(state.ledger().points(), 0);
    }

    #[test]
    fn zero_length_book_never_completes() {
        let mut state = GameState::new(RewardConfig::default());
        let id = state.add_book(draft(0));
        let progress = state.set_book_progress(&id, 10).unwrap();
        assert_eq!(progress.progress, 0);
        assert_eq!(progress.current_page, 0);
        assert_eq!(progress.status, BookStatus::NotStarted);
    }
}
