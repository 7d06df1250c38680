use std::sync::Arc;

use facetdoc_core::traits::{Hits, IndexProvider, SearchIndex};
use facetdoc_core::types::{DocId, EncodedDocument, Facet, FacetCount, Field, Hit, QueryOptions};
use facetdoc_core::{Error, Result};
use facetdoc_text::{IndexOptions, TantivyIndexes};
use facetdoc_web::{create_router, AppState};
use reqwest::{header, Client, StatusCode};

async fn spawn_app(indexes: Arc<dyn IndexProvider>) -> String {
    let app = create_router(AppState::new(indexes, "global"));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn client() -> Client {
    Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("client")
}

async fn post_form(base_url: &str, body: &'static str) -> reqwest::Response {
    client()
        .post(format!("{}/add", base_url))
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(body)
        .send()
        .await
        .expect("Failed to post form")
}

async fn get_home(base_url: &str) -> (StatusCode, String) {
    let resp = client()
        .get(format!("{}/", base_url))
        .send()
        .await
        .expect("Failed to get home");
    let status = resp.status();
    (status, resp.text().await.expect("body"))
}

fn ram_indexes() -> Arc<TantivyIndexes> {
    Arc::new(TantivyIndexes::in_memory(IndexOptions::default()))
}

/// Provider standing in for an unreachable index service.
struct Unavailable;

impl IndexProvider for Unavailable {
    fn open(&self, _name: &str) -> Result<Arc<dyn SearchIndex>> {
        Err(Error::IndexOpen("search service unavailable".to_string()))
    }
}

/// Index that serves reads but refuses every write.
struct ReadOnly;

impl SearchIndex for ReadOnly {
    fn name(&self) -> &str {
        "global"
    }
    fn put(&self, _id: &str, _doc: &EncodedDocument) -> Result<DocId> {
        Err(Error::IndexWrite("quota exceeded".to_string()))
    }
    fn get(&self, id: &str) -> Result<EncodedDocument> {
        Err(Error::NotFound(id.to_string()))
    }
    fn delete(&self, _id: &str) -> Result<()> {
        Ok(())
    }
    fn query(&self, _query: &str, _options: &QueryOptions) -> Result<Hits<'_>> {
        Ok(Box::new(std::iter::empty::<Result<Hit>>()))
    }
    fn facet_counts(&self, _query: &str, _facet: &str) -> Result<Vec<FacetCount>> {
        Ok(vec![])
    }
}

struct ReadOnlyProvider;

impl IndexProvider for ReadOnlyProvider {
    fn open(&self, _name: &str) -> Result<Arc<dyn SearchIndex>> {
        Ok(Arc::new(ReadOnly))
    }
}

#[tokio::test]
async fn empty_index_renders_empty_list_with_form() {
    let base_url = spawn_app(ram_indexes()).await;
    let (status, body) = get_home(&base_url).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body.contains("<li>"));
    assert!(body.contains(r#"<form action="/add" method="POST">"#));
}

#[tokio::test]
async fn add_then_list_shows_the_document() {
    let base_url = spawn_app(ram_indexes()).await;

    let resp = post_form(&base_url, "title=Hello&f=3.5").await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/");

    let (status, body) = get_home(&base_url).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Title: Hello"), "{body}");
    assert!(body.contains("F: 3.5"), "{body}");
}

#[tokio::test]
async fn malformed_facet_is_rejected_without_writing() {
    let indexes = ram_indexes();
    let base_url = spawn_app(indexes.clone()).await;

    post_form(&base_url, "title=Kept&f=1").await;
    let (_, before) = get_home(&base_url).await;

    let resp = post_form(&base_url, "title=Nope&f=notanumber").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let message = resp.text().await.unwrap();
    assert!(message.contains("notanumber"), "{message}");

    let (_, after) = get_home(&base_url).await;
    assert_eq!(before, after);
    assert!(!after.contains("Nope"));
}

#[tokio::test]
async fn missing_facet_is_a_bad_request() {
    let base_url = spawn_app(ram_indexes()).await;
    let resp = post_form(&base_url, "title=NoF").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn titles_are_html_escaped() {
    let base_url = spawn_app(ram_indexes()).await;
    post_form(&base_url, "title=%3Cb%3Ebold%3C%2Fb%3E&f=2").await;
    let (_, body) = get_home(&base_url).await;
    assert!(body.contains("Title: &lt;b&gt;bold&lt;/b&gt;"), "{body}");
}

#[tokio::test]
async fn index_open_failure_is_a_server_error() {
    let base_url = spawn_app(Arc::new(Unavailable)).await;

    let (status, body) = get_home(&base_url).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("search service unavailable"), "{body}");

    let resp = post_form(&base_url, "title=x&f=1").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn write_failure_is_a_server_error() {
    let base_url = spawn_app(Arc::new(ReadOnlyProvider)).await;
    let resp = post_form(&base_url, "title=x&f=1").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(resp.text().await.unwrap().contains("quota exceeded"));
}

#[tokio::test]
async fn undecodable_record_fails_the_list() {
    let indexes = ram_indexes();
    let index = indexes.open("global").expect("open");
    let foreign = EncodedDocument {
        fields: vec![Field::text("Title", "t")],
        facets: vec![Facet::number("Rating", 4.0)],
    };
    index.put("", &foreign).expect("raw put");

    let base_url = spawn_app(indexes).await;
    let (status, body) = get_home(&base_url).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("unknown facet \"Rating\""), "{body}");
}

#[tokio::test]
async fn repeated_keys_take_the_first_value() {
    let base_url = spawn_app(ram_indexes()).await;

    let resp = post_form(&base_url, "title=a&f=1&f=2").await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    let resp = post_form(&base_url, "title=b&title=c&f=4.5").await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let (_, body) = get_home(&base_url).await;
    assert!(body.contains("Title: a"), "{body}");
    assert!(body.contains("F: 1</div>"), "{body}");
    assert!(!body.contains("F: 2</div>"), "{body}");
    assert!(body.contains("Title: b"), "{body}");
    assert!(!body.contains("Title: c"), "{body}");
}

#[tokio::test]
async fn values_in_the_url_query_are_accepted_without_a_body() {
    let base_url = spawn_app(ram_indexes()).await;

    let resp = client()
        .post(format!("{}/add?title=q&f=2", base_url))
        .send()
        .await
        .expect("Failed to post");
    assert_eq!(resp.status(), StatusCode::FOUND);

    let (_, body) = get_home(&base_url).await;
    assert!(body.contains("Title: q"), "{body}");
    assert!(body.contains("F: 2</div>"), "{body}");
}

#[tokio::test]
async fn body_that_is_not_form_encoded_is_a_bad_request() {
    let base_url = spawn_app(ram_indexes()).await;

    let resp = client()
        .post(format!("{}/add", base_url))
        .header(header::CONTENT_TYPE, "text/plain")
        .body("title=x&f=1")
        .send()
        .await
        .expect("Failed to post");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let (_, body) = get_home(&base_url).await;
    assert!(!body.contains("<li>"));
}
