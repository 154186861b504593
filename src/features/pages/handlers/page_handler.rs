use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use minijinja::context;

use crate::core::error::Result;
use crate::features::content::ContentService;
use crate::shared::templates::{SiteRenderer, HOME_TEMPLATE, NOT_FOUND_TEMPLATE, PAGE_TEMPLATE};
use crate::shared::validation::normalize_slug;

/// Shared state of the page handlers
pub struct PagesState {
    pub content: Arc<ContentService>,
    pub renderer: Arc<SiteRenderer>,
    pub site_url: String,
}

impl PagesState {
    pub fn new(
        content: Arc<ContentService>,
        renderer: Arc<SiteRenderer>,
        site_url: String,
    ) -> Self {
        Self {
            content,
            renderer,
            site_url: site_url.trim_end_matches('/').to_string(),
        }
    }
}

/// Render the home page
pub async fn home_page(State(state): State<Arc<PagesState>>) -> Result<Html<String>> {
    let home = state.content.home().await;

    let html = state.renderer.render(
        HOME_TEMPLATE,
        context! {
            site_url => &state.site_url,
            canonical_url => format!("{}/", state.site_url),
            navigation => &home.navigation,
            footer => &home.footer,
            home => &home,
        },
    )?;

    Ok(Html(html))
}

/// Render a CMS page by slug
pub async fn cms_page(
    State(state): State<Arc<PagesState>>,
    Path(raw_slug): Path<String>,
) -> Result<Response> {
    let Some(slug) = normalize_slug(&raw_slug) else {
        tracing::debug!("Rejecting malformed slug {:?}", raw_slug);
        return not_found(&state).await;
    };

    let page = match state.content.page_by_slug(&slug).await {
        Ok(Some(page)) => page,
        Ok(None) => return not_found(&state).await,
        Err(e) => {
            tracing::error!("Failed to load page {}: {}", slug, e);
            return not_found(&state).await;
        }
    };

    let (navigation, footer) = state.content.chrome().await;
    let seo = page.seo.as_ref();
    let title = seo
        .and_then(|s| s.meta_title.clone())
        .unwrap_or_else(|| page.title.clone());
    let description = seo.and_then(|s| s.meta_description.clone());

    let html = state.renderer.render(
        PAGE_TEMPLATE,
        context! {
            site_url => &state.site_url,
            canonical_url => format!("{}/{}", state.site_url, slug),
            title => title,
            description => description,
            navigation => navigation,
            footer => footer,
            page => &page,
        },
    )?;

    Ok(Html(html).into_response())
}

async fn not_found(state: &PagesState) -> Result<Response> {
    let (navigation, footer) = state.content.chrome().await;
    let html = state.renderer.render(
        NOT_FOUND_TEMPLATE,
        context! {
            site_url => &state.site_url,
            title => "Page not found",
            navigation => navigation,
            footer => footer,
        },
    )?;

    Ok((StatusCode::NOT_FOUND, Html(html)).into_response())
}
