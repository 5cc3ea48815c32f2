use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;

use super::pages;
use super::AppState;
use crate::detail::Resolution;
use crate::listing::{LoadOutcome, SessionId};

/// Create the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/listing/more", post(load_more))
        .route("/listing/:id", get(listing))
        .route("/post/:slug", get(post_detail))
        .route("/healthz", get(health))
}

// ========== Listing ==========

async fn home(State(state): State<AppState>) -> Response {
    let html = pages::render_home_page(&pages::HomePageParams {
        state: &state.home,
        session: None,
        site_name: &state.config.site_name,
    });
    Html(html.into_string()).into_response()
}

async fn listing(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let Some((id, controller)) = SessionId::parse(&id)
        .and_then(|id| state.sessions.get(&id).map(|controller| (id, controller)))
    else {
        // Expired or unknown session: start over from the first page
        return Redirect::to("/").into_response();
    };

    let snapshot = controller.snapshot();
    let html = pages::render_home_page(&pages::HomePageParams {
        state: &snapshot,
        session: Some(&id),
        site_name: &state.config.site_name,
    });
    (
        [(header::CACHE_CONTROL, "no-store")],
        Html(html.into_string()),
    )
        .into_response()
}

#[derive(Debug, Deserialize)]
struct LoadMoreForm {
    session: Option<String>,
}

/// Append the next batch to the visitor's listing and send them back to it.
async fn load_more(State(state): State<AppState>, Form(form): Form<LoadMoreForm>) -> Response {
    let existing = form
        .session
        .as_deref()
        .and_then(SessionId::parse)
        .and_then(|id| state.sessions.get(&id).map(|controller| (id, controller)));
    let (id, controller) =
        existing.unwrap_or_else(|| state.sessions.create(state.home.as_ref().clone()));

    let target = match controller.load_next_page(state.source.as_ref()).await {
        Ok(LoadOutcome::Appended { first_index, .. }) => format!("/listing/{id}#post-{first_index}"),
        Ok(LoadOutcome::AlreadyLoading) => {
            // Repeated submit: answer once the running batch has landed
            controller.wait_for_load().await;
            format!("/listing/{id}")
        }
        Ok(LoadOutcome::Exhausted) => format!("/listing/{id}"),
        Err(e) => {
            tracing::error!(session = %id, "Failed to load next page of posts: {e}");
            format!("/listing/{id}")
        }
    };

    Redirect::to(&target).into_response()
}

// ========== Post detail ==========

async fn post_detail(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    let site_name = &state.config.site_name;

    match state.pages.resolve(&slug) {
        Resolution::Ready(post) => {
            let path = format!("/post/{}", urlencoding::encode(&slug));
            let html = pages::render_post_page(&pages::PostPageParams {
                post: &post,
                path: &path,
                site_name,
            });
            Html(html.into_string()).into_response()
        }
        Resolution::Resolving => (
            [(header::CACHE_CONTROL, "no-store")],
            Html(pages::render_post_placeholder(site_name).into_string()),
        )
            .into_response(),
        Resolution::NotFound => not_found(State(state)).await,
    }
}

// ========== Misc ==========

async fn health() -> &'static str {
    "ok"
}

pub(super) async fn not_found(State(state): State<AppState>) -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(pages::render_not_found_page(&state.config.site_name).into_string()),
    )
        .into_response()
}
