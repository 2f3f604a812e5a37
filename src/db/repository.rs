use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::queries::{categories, questions};
use super::{Category, NewQuestion, Question};

pub type DynRepository = Arc<dyn TriviaRepository>;

/// Store operations the HTTP handlers depend on.
///
/// Listings are ordered by ascending id. Lookups by id return `Ok(None)` on a miss,
/// errors are reserved for store failures.
#[async_trait]
pub trait TriviaRepository: Send + Sync {
    async fn list_categories(&self) -> sqlx::Result<Vec<Category>>;
    async fn find_category(&self, id: i64) -> sqlx::Result<Option<Category>>;

    async fn list_questions(&self) -> sqlx::Result<Vec<Question>>;
    async fn count_questions(&self) -> sqlx::Result<i64>;
    async fn find_question(&self, id: i64) -> sqlx::Result<Option<Question>>;
    async fn find_questions_by_category(&self, category: i64) -> sqlx::Result<Vec<Question>>;
    async fn search_questions(&self, term: &str) -> sqlx::Result<Vec<Question>>;

    /// Returns the id assigned to the new question.
    async fn insert_question(&self, new_question: NewQuestion) -> sqlx::Result<i64>;
    async fn delete_question(&self, id: i64) -> sqlx::Result<()>;
}

#[derive(Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TriviaRepository for SqliteRepository {
    async fn list_categories(&self) -> sqlx::Result<Vec<Category>> {
        categories::get_all_categories(&self.pool).await
    }

    async fn find_category(&self, id: i64) -> sqlx::Result<Option<Category>> {
        categories::get_category(&self.pool, id).await
    }

    async fn list_questions(&self) -> sqlx::Result<Vec<Question>> {
        questions::get_all_questions(&self.pool).await
    }

    async fn count_questions(&self) -> sqlx::Result<i64> {
        questions::count_questions(&self.pool).await
    }

    async fn find_question(&self, id: i64) -> sqlx::Result<Option<Question>> {
        questions::get_question_by_id(&self.pool, id).await
    }

    async fn find_questions_by_category(&self, category: i64) -> sqlx::Result<Vec<Question>> {
        questions::get_questions_for_category(&self.pool, category).await
    }

    async fn search_questions(&self, term: &str) -> sqlx::Result<Vec<Question>> {
        questions::search_questions(&self.pool, term).await
    }

    async fn insert_question(&self, new_question: NewQuestion) -> sqlx::Result<i64> {
        questions::create_question(&self.pool, &new_question).await
    }

    async fn delete_question(&self, id: i64) -> sqlx::Result<()> {
        questions::delete_question(&self.pool, id).await
    }
}
