use chrono::{DateTime, Utc};
use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::collections::KeyedTable;
use quiz_core::model::{Bookmark, Question, QuestionId};
use storage::repository::BookmarkRepository;

use crate::error::BookmarkError;

//
// ─── SHELF ─────────────────────────────────────────────────────────────────────
//

/// In-memory store of bookmarked questions, keyed by question id.
#[derive(Debug, Default)]
pub struct BookmarkShelf {
    entries: KeyedTable<Bookmark>,
}

impl BookmarkShelf {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, question: Question, bookmarked_at: DateTime<Utc>) {
        let key = question.id().as_str().to_owned();
        self.entries.set(key, Bookmark::new(question, bookmarked_at));
    }

    pub fn remove(&mut self, id: &QuestionId) -> bool {
        self.entries.delete(id.as_str())
    }

    /// Flips the bookmark state; returns whether the question is bookmarked
    /// afterwards.
    pub fn toggle(&mut self, question: &Question, bookmarked_at: DateTime<Utc>) -> bool {
        if self.has(question.id()) {
            self.remove(question.id());
            false
        } else {
            self.add(question.clone(), bookmarked_at);
            true
        }
    }

    #[must_use]
    pub fn has(&self, id: &QuestionId) -> bool {
        self.entries.has(id.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bookmarks newest-first.
    #[must_use]
    pub fn all(&self) -> Vec<&Bookmark> {
        let mut bookmarks: Vec<&Bookmark> = self.entries.values().collect();
        bookmarks.sort_by(|a, b| b.bookmarked_at().cmp(&a.bookmarked_at()));
        bookmarks
    }
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Shelf facade that persists every mutation, memory first.
pub struct BookmarkShelfService {
    clock: Clock,
    shelf: BookmarkShelf,
    bookmarks: Arc<dyn BookmarkRepository>,
}

impl BookmarkShelfService {
    #[must_use]
    pub fn new(clock: Clock, bookmarks: Arc<dyn BookmarkRepository>) -> Self {
        Self {
            clock,
            shelf: BookmarkShelf::new(),
            bookmarks,
        }
    }

    /// Rehydrates the shelf from storage.
    ///
    /// # Errors
    ///
    /// Returns `BookmarkError::Storage` on repository failures.
    pub async fn load(
        clock: Clock,
        bookmarks: Arc<dyn BookmarkRepository>,
    ) -> Result<Self, BookmarkError> {
        let mut shelf = BookmarkShelf::new();
        for bookmark in bookmarks.list_bookmarks().await? {
            shelf.add(bookmark.question().clone(), bookmark.bookmarked_at());
        }
        Ok(Self {
            clock,
            shelf,
            bookmarks,
        })
    }

    #[must_use]
    pub fn shelf(&self) -> &BookmarkShelf {
        &self.shelf
    }

    /// Flips the bookmark state and persists the change.
    ///
    /// # Errors
    ///
    /// Returns `BookmarkError::Storage` when the repository write fails; the
    /// in-memory shelf has already been updated by then.
    pub async fn toggle(&mut self, question: &Question) -> Result<bool, BookmarkError> {
        let now = self.clock.now();
        if self.shelf.toggle(question, now) {
            let bookmark = Bookmark::new(question.clone(), now);
            self.bookmarks.upsert_bookmark(&bookmark).await?;
            Ok(true)
        } else {
            self.bookmarks.delete_bookmark(question.id()).await?;
            Ok(false)
        }
    }

    /// Removes a bookmark and persists the removal.
    ///
    /// # Errors
    ///
    /// Returns `BookmarkError::Storage` on repository failures.
    pub async fn remove(&mut self, id: &QuestionId) -> Result<bool, BookmarkError> {
        let removed = self.shelf.remove(id);
        if removed {
            self.bookmarks.delete_bookmark(id).await?;
        }
        Ok(removed)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
