use axum::extract::FromRef;
use axum::http::{header, Method, Uri};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::routes::{self, category_router, questions_router, quiz_router};
use crate::db::DynRepository;
use crate::settings::ApplicationSettings;

/// Number of questions per page on every paginated listing.
#[derive(Clone, Copy, Debug)]
pub struct PageSize(pub usize);

#[derive(FromRef, Clone)]
pub struct AppState {
    repo: DynRepository,
    page_size: PageSize,
}

impl AppState {
    pub fn new(repo: DynRepository, questions_per_page: usize) -> Self {
        Self {
            repo,
            page_size: PageSize(questions_per_page.max(1)),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(category_router(state.clone()))
        .merge(questions_router(state.clone()))
        .merge(quiz_router(state))
        .fallback(|method: Method, uri: Uri| async move {
            tracing::debug!(%method, %uri, "no route matched");
            routes::ApiError::NotFound
        })
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::PUT,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

pub async fn run_server(settings: &ApplicationSettings, repo: DynRepository) -> anyhow::Result<()> {
    let addr = settings.address();
    let app = build_router(AppState::new(repo, settings.questions_per_page));
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("Serving on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::server::routes::testing::{app, send, MemoryRepository};

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let app = app(MemoryRepository::new(&[(1, "Science")], vec![]), 10);
        let (status, body) = send(&app, Method::GET, "/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            json!({"success": false, "error": 404, "message": "resource not found"})
        );
    }

    #[tokio::test]
    async fn responses_allow_any_origin() {
        let app = app(MemoryRepository::new(&[(1, "Science")], vec![]), 10);
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/categories")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );

        let preflight = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/questions/1")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "DELETE")
                    .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(preflight.status(), StatusCode::OK);
        let methods = preflight.headers()[header::ACCESS_CONTROL_ALLOW_METHODS]
            .to_str()
            .unwrap()
            .to_string();
        for method in ["GET", "PUT", "POST", "DELETE", "OPTIONS"] {
            assert!(methods.contains(method), "{methods} lacks {method}");
        }
        let headers = preflight.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS]
            .to_str()
            .unwrap()
            .to_lowercase();
        assert!(headers.contains("content-type"));
        assert!(headers.contains("authorization"));
    }
}
