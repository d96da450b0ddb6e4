use crate::models::{Book, BookFilters, BookPatch};
use crate::repo::BookRepo;
use crate::schema::books;
use bb8::Pool;
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, SelectableHelper};
use diesel_async::{
    pooled_connection::{AsyncDieselConnectionManager, PoolError},
    AsyncPgConnection, RunQueryDsl,
};
use thiserror::Error;
use tracing::debug;

pub type DBPool = bb8::Pool<AsyncDieselConnectionManager<AsyncPgConnection>>;

pub async fn create_db_pool(connection_string: &str) -> Result<DBPool, PoolError> {
    let config = AsyncDieselConnectionManager::<AsyncPgConnection>::new(connection_string);
    Pool::builder().build(config).await
}

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("problem getting a connection from the connection pool: {0}")]
    Pool(#[from] bb8::RunError<PoolError>),

    #[error("problem executing a statement against the DB: {0}")]
    Query(#[from] diesel::result::Error),
}

#[derive(Clone)]
pub struct DatabaseBookRepo {
    pool: DBPool,
}

impl DatabaseBookRepo {
    pub fn new(pool: DBPool) -> Self {
        DatabaseBookRepo { pool }
    }
}

impl BookRepo for DatabaseBookRepo {
    type Error = DatabaseError;

    async fn list_books(&self, filters: BookFilters) -> Result<Vec<Book>, DatabaseError> {
        // query parameters are accepted but do not narrow the result
        debug!("Listing books, ignoring filters: {:?}", filters);

        let mut conn = self.pool.get().await?;

        let books = books::table
            .select(Book::as_select())
            .order(books::title.asc())
            .load(&mut conn)
            .await?;

        Ok(books)
    }

    async fn get_book(&self, isbn: &str) -> Result<Option<Book>, DatabaseError> {
        let mut conn = self.pool.get().await?;

        let maybe_book = books::table
            .find(isbn)
            .select(Book::as_select())
            .first(&mut conn)
            .await
            .optional()?;

        Ok(maybe_book)
    }

    async fn insert_book(&self, book: Book) -> Result<Book, DatabaseError> {
        let mut conn = self.pool.get().await?;

        let inserted_book = diesel::insert_into(books::table)
            .values(book)
            .returning(Book::as_returning())
            .get_result(&mut conn)
            .await?;

        Ok(inserted_book)
    }

    async fn update_book(
        &self,
        isbn: &str,
        patch: BookPatch,
    ) -> Result<Option<Book>, DatabaseError> {
        // diesel refuses an UPDATE with no columns to set
        if patch.is_empty() {
            return self.get_book(isbn).await;
        }

        let mut conn = self.pool.get().await?;

        let updated_book = diesel::update(books::table.find(isbn))
            .set(patch)
            .returning(Book::as_returning())
            .get_result(&mut conn)
            .await
            .optional()?;

        Ok(updated_book)
    }

    async fn delete_book(&self, isbn: &str) -> Result<bool, DatabaseError> {
        let mut conn = self.pool.get().await?;

        let deleted = diesel::delete(books::table.find(isbn))
            .execute(&mut conn)
            .await
            .map(|affected_rows| affected_rows == 1)?;

        Ok(deleted)
    }
}
