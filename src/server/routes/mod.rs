mod categories;
mod questions;
mod quizzes;

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

use crate::db::Category;

pub use categories::category_router;
pub use questions::questions_router;
pub use quizzes::quiz_router;

/// Every failure the API reports. Each one renders as
/// `{"success": false, "error": <status>, "message": <text>}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("bad request")]
    BadRequest,
    #[error("resource not found")]
    NotFound,
    #[error("unprocessable")]
    Unprocessable,
    #[error("internal server error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Store failures while mutating are reported as 422.
    fn unprocessable(err: sqlx::Error) -> Self {
        tracing::error!(error = ?err, "store write failed");
        ApiError::Unprocessable
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "success": false,
            "error": status.as_u16(),
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!(error = ?err, "store read failed");
        ApiError::Internal
    }
}

pub type ApiResponse<T> = Result<Success<T>, ApiError>;

/// A 200 response whose body is `T` with `"success": true` alongside its fields.
#[derive(Debug, Serialize)]
pub struct Success<T> {
    success: bool,
    #[serde(flatten)]
    body: T,
}

impl<T> Success<T> {
    fn new(body: T) -> Self {
        Self {
            success: true,
            body,
        }
    }
}

impl<T: Serialize> IntoResponse for Success<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// `{id: type}`, serialized with string keys.
type CategoryMap = BTreeMap<i64, String>;

fn category_map(categories: Vec<Category>) -> CategoryMap {
    categories.into_iter().map(|c| (c.id, c.kind)).collect()
}

#[cfg(test)]
pub(crate) mod testing {
    //! Router fixtures shared by the handler tests.

    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::db::{Category, DynRepository, NewQuestion, Question, TriviaRepository};
    use crate::server::app::{build_router, AppState};

    /// Vec-backed store with the same ordering and lookup rules as the SQLite one.
    pub struct MemoryRepository {
        categories: Vec<Category>,
        questions: Mutex<Vec<Question>>,
    }

    impl MemoryRepository {
        pub fn new(categories: &[(i64, &str)], questions: Vec<Question>) -> Self {
            Self {
                categories: categories
                    .iter()
                    .map(|(id, kind)| Category {
                        id: *id,
                        kind: kind.to_string(),
                    })
                    .collect(),
                questions: Mutex::new(questions),
            }
        }

        fn questions(&self) -> Vec<Question> {
            self.questions.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TriviaRepository for MemoryRepository {
        async fn list_categories(&self) -> sqlx::Result<Vec<Category>> {
            Ok(self.categories.clone())
        }

        async fn find_category(&self, id: i64) -> sqlx::Result<Option<Category>> {
            Ok(self.categories.iter().find(|c| c.id == id).cloned())
        }

        async fn list_questions(&self) -> sqlx::Result<Vec<Question>> {
            Ok(self.questions())
        }

        async fn count_questions(&self) -> sqlx::Result<i64> {
            Ok(self.questions().len() as i64)
        }

        async fn find_question(&self, id: i64) -> sqlx::Result<Option<Question>> {
            Ok(self.questions().into_iter().find(|q| q.id == id))
        }

        async fn find_questions_by_category(&self, category: i64) -> sqlx::Result<Vec<Question>> {
            Ok(self
                .questions()
                .into_iter()
                .filter(|q| q.category == category)
                .collect())
        }

        async fn search_questions(&self, term: &str) -> sqlx::Result<Vec<Question>> {
            let term = term.to_lowercase();
            Ok(self
                .questions()
                .into_iter()
                .filter(|q| q.question.to_lowercase().contains(&term))
                .collect())
        }

        async fn insert_question(&self, new_question: NewQuestion) -> sqlx::Result<i64> {
            if !self.categories.iter().any(|c| c.id == new_question.category) {
                return Err(sqlx::Error::RowNotFound);
            }
            let mut questions = self.questions.lock().unwrap();
            let id = questions.iter().map(|q| q.id).max().unwrap_or(0) + 1;
            questions.push(Question {
                id,
                question: new_question.question,
                answer: new_question.answer,
                difficulty: new_question.difficulty,
                category: new_question.category,
            });
            Ok(id)
        }

        async fn delete_question(&self, id: i64) -> sqlx::Result<()> {
            let mut questions = self.questions.lock().unwrap();
            let before = questions.len();
            questions.retain(|q| q.id != id);
            if questions.len() == before {
                return Err(sqlx::Error::RowNotFound);
            }
            Ok(())
        }
    }

    /// Store whose every call fails, as if the database went away.
    pub struct BrokenRepository;

    fn gone<T>() -> sqlx::Result<T> {
        Err(sqlx::Error::PoolClosed)
    }

    #[async_trait]
    impl TriviaRepository for BrokenRepository {
        async fn list_categories(&self) -> sqlx::Result<Vec<Category>> {
            gone()
        }
        async fn find_category(&self, _id: i64) -> sqlx::Result<Option<Category>> {
            gone()
        }
        async fn list_questions(&self) -> sqlx::Result<Vec<Question>> {
            gone()
        }
        async fn count_questions(&self) -> sqlx::Result<i64> {
            gone()
        }
        async fn find_question(&self, _id: i64) -> sqlx::Result<Option<Question>> {
            gone()
        }
        async fn find_questions_by_category(&self, _category: i64) -> sqlx::Result<Vec<Question>> {
            gone()
        }
        async fn search_questions(&self, _term: &str) -> sqlx::Result<Vec<Question>> {
            gone()
        }
        async fn insert_question(&self, _new_question: NewQuestion) -> sqlx::Result<i64> {
            gone()
        }
        async fn delete_question(&self, _id: i64) -> sqlx::Result<()> {
            gone()
        }
    }

    pub fn question(id: i64, text: &str, category: i64) -> Question {
        Question {
            id,
            question: text.to_string(),
            answer: format!("answer {id}"),
            difficulty: 1 + id % 5,
            category,
        }
    }

    pub fn app(repo: impl TriviaRepository + 'static, page_size: usize) -> Router {
        let repo: DynRepository = Arc::new(repo);
        build_router(AppState::new(repo, page_size))
    }

    pub async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }
}
