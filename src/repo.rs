use crate::models::{Book, BookFilters, BookPatch};
use std::error::Error;
use std::future::Future;

pub trait BookRepo: Clone + Send + Sync + 'static {
    type Error: Error + Send + Sync + 'static;

    fn list_books(
        &self,
        filters: BookFilters,
    ) -> impl Future<Output = Result<Vec<Book>, Self::Error>> + Send;

    fn get_book(&self, isbn: &str) -> impl Future<Output = Result<Option<Book>, Self::Error>> + Send;

    fn insert_book(&self, book: Book) -> impl Future<Output = Result<Book, Self::Error>> + Send;

    /// Returns None if no book is stored under `isbn`
    fn update_book(
        &self,
        isbn: &str,
        patch: BookPatch,
    ) -> impl Future<Output = Result<Option<Book>, Self::Error>> + Send;

    /// Returns true if the book existed and was deleted, false otherwise
    fn delete_book(&self, isbn: &str) -> impl Future<Output = Result<bool, Self::Error>> + Send;
}
