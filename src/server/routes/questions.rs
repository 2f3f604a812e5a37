use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    db::{DynRepository, NewQuestion, Question},
    pagination::paginate,
    server::{
        app::{AppState, PageSize},
        deserializers::{Flexi64, PageQuery},
    },
};

use super::{category_map, ApiError, ApiResponse, CategoryMap, Success};

/// Body of `POST /questions`: a non-empty `searchTerm` searches, anything else creates.
#[derive(Deserialize)]
struct QuestionsBody {
    #[serde(rename = "searchTerm")]
    search_term: Option<String>,
    question: Option<String>,
    answer: Option<String>,
    difficulty: Option<Flexi64>,
    category: Option<Flexi64>,
}

#[derive(Serialize)]
struct QuestionsPage {
    questions: Vec<Question>,
    categories: CategoryMap,
    total_questions: usize,
}

#[derive(Serialize)]
struct SearchResults {
    questions: Vec<Question>,
    total_questions: usize,
}

#[derive(Serialize)]
struct Created {
    created: i64,
    question_created: String,
    questions: Vec<Question>,
    total_questions: usize,
}

#[derive(Serialize)]
#[serde(untagged)]
enum PostOutcome {
    Search(SearchResults),
    Created(Created),
}

#[derive(Serialize)]
struct Deleted {
    deleted: i64,
}

async fn questions_page(
    State(repo): State<DynRepository>,
    State(PageSize(page_size)): State<PageSize>,
    Query(PageQuery { page }): Query<PageQuery>,
) -> ApiResponse<QuestionsPage> {
    let questions = repo.list_questions().await?;
    let total_questions = questions.len();
    let questions = paginate(page, questions, page_size);
    if questions.is_empty() {
        return Err(ApiError::NotFound);
    }
    let categories = category_map(repo.list_categories().await?);
    Ok(Success::new(QuestionsPage {
        questions,
        categories,
        total_questions,
    }))
}

async fn search_or_create(
    State(repo): State<DynRepository>,
    State(PageSize(page_size)): State<PageSize>,
    Query(PageQuery { page }): Query<PageQuery>,
    body: Result<Json<QuestionsBody>, JsonRejection>,
) -> ApiResponse<PostOutcome> {
    let Json(mut body) = body.map_err(|rejection| {
        tracing::debug!(%rejection, "malformed questions body");
        ApiError::Unprocessable
    })?;

    let outcome = match body.search_term.take().filter(|term| !term.is_empty()) {
        Some(term) => PostOutcome::Search(search(&repo, &term, page, page_size).await?),
        None => PostOutcome::Created(create(&repo, body, page, page_size).await?),
    };
    Ok(Success::new(outcome))
}

async fn search(
    repo: &DynRepository,
    term: &str,
    page: usize,
    page_size: usize,
) -> Result<SearchResults, ApiError> {
    let matches = repo.search_questions(term).await?;
    if matches.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(SearchResults {
        total_questions: matches.len(),
        questions: paginate(page, matches, page_size),
    })
}

async fn create(
    repo: &DynRepository,
    body: QuestionsBody,
    page: usize,
    page_size: usize,
) -> Result<Created, ApiError> {
    let (Some(question), Some(answer), Some(Flexi64(difficulty)), Some(Flexi64(category))) =
        (body.question, body.answer, body.difficulty, body.category)
    else {
        return Err(ApiError::Unprocessable);
    };

    let id = repo
        .insert_question(NewQuestion {
            question: question.clone(),
            answer,
            difficulty,
            category,
        })
        .await
        .map_err(ApiError::unprocessable)?;
    tracing::info!(id, category, "question created");

    let questions = repo
        .list_questions()
        .await
        .map_err(ApiError::unprocessable)?;
    Ok(Created {
        created: id,
        question_created: question,
        total_questions: questions.len(),
        questions: paginate(page, questions, page_size),
    })
}

async fn delete_question(
    State(repo): State<DynRepository>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResponse<Deleted> {
    let Path(id) = id.map_err(|_| ApiError::NotFound)?;
    repo.find_question(id)
        .await
        .map_err(ApiError::unprocessable)?
        .ok_or(ApiError::NotFound)?;
    repo.delete_question(id)
        .await
        .map_err(ApiError::unprocessable)?;
    tracing::info!(id, "question deleted");
    Ok(Success::new(Deleted { deleted: id }))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(questions_page).post(search_or_create))
        .route("/questions/{id}", delete(delete_question))
        .with_state(state)
}
