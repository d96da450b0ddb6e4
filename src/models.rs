use std::collections::HashMap;

use crate::schema::books;

#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    serde::Serialize,
    serde::Deserialize,
    diesel::Queryable,
    diesel::Selectable,
    diesel::Insertable,
)]
#[diesel(table_name = books)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Book {
    pub isbn: String,
    pub amazon_url: String,
    pub author: String,
    pub language: String,
    pub pages: i32,
    pub publisher: String,
    pub title: String,
    pub year: i32,
}

/// Partial update of a stored book. Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize, diesel::AsChangeset)]
#[diesel(table_name = books)]
pub struct BookPatch {
    pub amazon_url: Option<String>,
    pub author: Option<String>,
    pub language: Option<String>,
    pub pages: Option<i32>,
    pub publisher: Option<String>,
    pub title: Option<String>,
    pub year: Option<i32>,
}

impl BookPatch {
    pub fn is_empty(&self) -> bool {
        *self == BookPatch::default()
    }

    pub fn apply_to(self, book: &mut Book) {
        if let Some(amazon_url) = self.amazon_url {
            book.amazon_url = amazon_url;
        }
        if let Some(author) = self.author {
            book.author = author;
        }
        if let Some(language) = self.language {
            book.language = language;
        }
        if let Some(pages) = self.pages {
            book.pages = pages;
        }
        if let Some(publisher) = self.publisher {
            book.publisher = publisher;
        }
        if let Some(title) = self.title {
            book.title = title;
        }
        if let Some(year) = self.year {
            book.year = year;
        }
    }
}

/// Query-string parameters from `GET /books`, handed to the repo untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(transparent)]
pub struct BookFilters(pub HashMap<String, String>);

#[derive(Debug, serde::Serialize)]
pub struct BooksResponse {
    pub books: Vec<Book>,
}

#[derive(Debug, serde::Serialize)]
pub struct BookResponse {
    pub book: Book,
}

#[derive(Debug, serde::Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
