use std::collections::HashSet;

use axum::{extract::rejection::JsonRejection, extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::{
    db::{DynRepository, Question},
    quiz::{select_unseen, CandidatePool, Selection},
    server::{app::AppState, deserializers::Flexi64},
};

use super::{ApiError, ApiResponse, Success};

#[derive(Deserialize)]
struct QuizBody {
    previous_questions: Option<Vec<i64>>,
    quiz_category: Option<QuizCategory>,
}

#[derive(Deserialize)]
struct QuizCategory {
    id: Flexi64,
}

/// `{"question": {...}}` while unseen questions remain, `{}` once exhausted.
#[derive(Serialize)]
struct NextQuestion {
    #[serde(skip_serializing_if = "Option::is_none")]
    question: Option<Question>,
}

async fn next_question(
    State(repo): State<DynRepository>,
    body: Result<Json<QuizBody>, JsonRejection>,
) -> ApiResponse<NextQuestion> {
    let Json(body) = body.map_err(|rejection| {
        tracing::debug!(%rejection, "malformed quiz body");
        ApiError::BadRequest
    })?;
    let (Some(previous), Some(QuizCategory { id: Flexi64(category) })) =
        (body.previous_questions, body.quiz_category)
    else {
        return Err(ApiError::BadRequest);
    };

    let candidates = match CandidatePool::from(category) {
        CandidatePool::All => repo.list_questions().await?,
        CandidatePool::Category(id) => repo.find_questions_by_category(id).await?,
    };
    let previous: HashSet<i64> = previous.into_iter().collect();

    let question = match select_unseen(&candidates, &previous) {
        Selection::Unseen(question) => Some(question.clone()),
        Selection::Exhausted => {
            tracing::debug!(category, seen = previous.len(), "quiz exhausted");
            None
        }
    };
    Ok(Success::new(NextQuestion { question }))
}

pub fn quiz_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(next_question))
        .with_state(state)
}
