use axum::{
    extract::{rejection::PathRejection, Path, Query, State},
    routing::get,
    Router,
};
use serde::Serialize;

use crate::{
    db::{DynRepository, Question},
    pagination::paginate,
    server::{
        app::{AppState, PageSize},
        deserializers::PageQuery,
    },
};

use super::{category_map, ApiError, ApiResponse, CategoryMap, Success};

#[derive(Serialize)]
struct CategoriesBody {
    categories: CategoryMap,
}

#[derive(Serialize)]
struct CategoryQuestionsBody {
    questions: Vec<Question>,
    total_questions: i64,
    current_category: String,
}

async fn get_categories(State(repo): State<DynRepository>) -> ApiResponse<CategoriesBody> {
    let categories = repo.list_categories().await?;
    if categories.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Success::new(CategoriesBody {
        categories: category_map(categories),
    }))
}

// An unknown category answers 400 on this route, not 404.
async fn questions_for_category(
    State(repo): State<DynRepository>,
    State(PageSize(page_size)): State<PageSize>,
    id: Result<Path<i64>, PathRejection>,
    Query(PageQuery { page }): Query<PageQuery>,
) -> ApiResponse<CategoryQuestionsBody> {
    let Path(id) = id.map_err(|_| ApiError::NotFound)?;
    let category = repo.find_category(id).await?.ok_or(ApiError::BadRequest)?;
    let questions = repo.find_questions_by_category(category.id).await?;

    Ok(Success::new(CategoryQuestionsBody {
        questions: paginate(page, questions, page_size),
        total_questions: repo.count_questions().await?,
        current_category: category.kind,
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(questions_for_category))
        .with_state(state)
}
