use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use tracing::{debug, info};

use facetdoc_core::traits::IndexExt;
use facetdoc_core::types::QueryOptions;
use facetdoc_core::Document;

use crate::error::ApiError;
use crate::render::home_page;
use crate::AppState;

type FormPairs = Vec<(String, String)>;

/// Values of the add form. Missing values arrive as empty strings.
#[derive(Debug, Default, PartialEq)]
pub struct AddForm {
    pub title: String,
    pub f: String,
}

impl AddForm {
    /// Takes the first value of each key, looking at the body before the URL query.
    pub fn from_pairs(body: &[(String, String)], query: &[(String, String)]) -> Self {
        let first = |key: &str| {
            body.iter()
                .chain(query)
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
                .unwrap_or_default()
        };
        Self { title: first("title"), f: first("f") }
    }
}

pub async fn list_documents(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let docs = tokio::task::spawn_blocking(move || load_documents(&state)).await??;
    debug!(count = docs.len(), "rendering document list");
    Ok(Html(home_page(&docs)))
}

pub async fn add_document(
    State(state): State<AppState>,
    query: Result<Query<FormPairs>, QueryRejection>,
    body: Result<Form<FormPairs>, FormRejection>,
) -> Result<Response, ApiError> {
    let query = query.map_err(|e| ApiError::BadRequest(e.body_text()))?.0;
    let body = match body {
        Ok(Form(pairs)) => pairs,
        // a body that is not form-encoded carries no form values
        Err(FormRejection::InvalidFormContentType(_)) => Vec::new(),
        Err(e) => return Err(ApiError::BadRequest(e.body_text())),
    };
    let form = AddForm::from_pairs(&body, &query);
    let f = parse_facet_value(&form.f)?;
    let doc = Document::new(form.title, f);
    let id = tokio::task::spawn_blocking(move || {
        let index = state.indexes.open(&state.index_name)?;
        index.put_document("", &doc)
    })
    .await??;
    info!(id = %id, "added document");
    Ok((StatusCode::FOUND, [(header::LOCATION, "/")]).into_response())
}

/// Drains the whole index, decoding every record.
fn load_documents(state: &AppState) -> facetdoc_core::Result<Vec<Document>> {
    let index = state.indexes.open(&state.index_name)?;
    let docs = index
        .search::<Document>("", &QueryOptions::default())?
        .map(|hit| hit.map(|(_, doc)| doc))
        .collect::<facetdoc_core::Result<Vec<_>>>()?;
    Ok(docs)
}

pub fn parse_facet_value(raw: &str) -> Result<f64, ApiError> {
    let value: f64 = raw
        .parse()
        .map_err(|e| ApiError::BadRequest(format!("parsing {raw:?}: {e}")))?;
    if !value.is_finite() {
        return Err(ApiError::BadRequest(format!("parsing {raw:?}: value must be finite")));
    }
    Ok(value)
}
