use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::{Book, BookFilters, BookPatch};
use crate::repo::BookRepo;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MemoryError {
    #[error("duplicate key value violates unique constraint: isbn '{0}' already exists")]
    DuplicateIsbn(String),
}

/// Book storage held in process memory, keyed by isbn.
#[derive(Clone, Default)]
pub struct InMemoryBookRepo {
    books: Arc<RwLock<BTreeMap<String, Book>>>,
}

impl InMemoryBookRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_books(books: impl IntoIterator<Item = Book>) -> Self {
        let books = books
            .into_iter()
            .map(|book| (book.isbn.clone(), book))
            .collect();
        InMemoryBookRepo {
            books: Arc::new(RwLock::new(books)),
        }
    }
}

impl BookRepo for InMemoryBookRepo {
    type Error = MemoryError;

    async fn list_books(&self, _filters: BookFilters) -> Result<Vec<Book>, MemoryError> {
        let mut books: Vec<Book> = self.books.read().await.values().cloned().collect();
        books.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(books)
    }

    async fn get_book(&self, isbn: &str) -> Result<Option<Book>, MemoryError> {
        Ok(self.books.read().await.get(isbn).cloned())
    }

    async fn insert_book(&self, book: Book) -> Result<Book, MemoryError> {
        match self.books.write().await.entry(book.isbn.clone()) {
            Entry::Occupied(_) => Err(MemoryError::DuplicateIsbn(book.isbn)),
            Entry::Vacant(slot) => Ok(slot.insert(book).clone()),
        }
    }

    async fn update_book(&self, isbn: &str, patch: BookPatch) -> Result<Option<Book>, MemoryError> {
        let mut books = self.books.write().await;
        let updated = books.get_mut(isbn).map(|book| {
            patch.apply_to(book);
            book.clone()
        });
        Ok(updated)
    }

    async fn delete_book(&self, isbn: &str) -> Result<bool, MemoryError> {
        Ok(self.books.write().await.remove(isbn).is_some())
    }
}
