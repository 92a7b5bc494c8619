//! Implements the `BudgetApi` trait by talking to the budget server over HTTP.

use crate::api::{BudgetApi, Page};
use crate::model::{
    AuthResponse, Category, Credentials, NewCategory, NewTransaction, Registration, Transaction,
    User,
};
use crate::{Result, SessionStore, Token};
use anyhow::{anyhow, bail, ensure, Context};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::trace;
use url::Url;

/// A `BudgetApi` backed by the REST API of the budget server. Requests carry the session token as
/// a bearer token whenever one is stored.
#[derive(Debug, Clone)]
pub struct HttpApi {
    base: Url,
    client: reqwest::Client,
    session: SessionStore,
}

impl HttpApi {
    /// Create a client for the server at `base`, e.g. `http://localhost:3000/api`.
    pub fn new(base: Url, session: SessionStore) -> Result<Self> {
        if base.cannot_be_a_base() {
            bail!("The API URL '{base}' cannot be used as a base URL");
        }
                let mut base = base;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = reqwest::Client::builder()
            .build()
            .context("Unable to create the HTTP client")?;
        Ok(Self {
            base,
            client,
            session,
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Builds the URL of an endpoint below the base URL. Each segment is percent-encoded, so an
    /// id can never reach another path, a query or a fragment.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        for segment in segments {
            ensure!(
                !matches!(*segment, "" | "." | ".."),
                "'{segment}' cannot be used in a request path"
            );
        }
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("The API URL '{}' cannot be used as a base URL", self.base))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let url = self.url(segments)?;
        trace!("{method} {url}");
        let request = self.client.request(method, url);
        Ok(match self.session.token() {
            Some(token) => request.bearer_auth(token.as_str()),
            None => request,
        })
    }

    async fn fetch<T>(&self, request: RequestBuilder) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = send(request).await?;
        let url = response.url().clone();
        response
            .json()
            .await
            .with_context(|| format!("Unable to parse the response from {url}"))
    }

    async fn authenticate(&self, request: RequestBuilder) -> Result<AuthResponse> {
        let auth: AuthResponse = self.fetch(request).await?;
        self.session.set(Token::new(auth.token())).await?;
        Ok(auth)
    }
}

/// Sends `request` and turns any status other than 2xx into an error carrying the status and the
/// response body.
async fn send(request: RequestBuilder) -> Result<Response> {
    let response = request.send().await.context("The request failed")?;
    let status = response.status();
    if !status.is_success() {
        let url = response.url().clone();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read response body".to_string());
        bail!("Request to {url} failed with status {status}: {body}");
    }
    Ok(response)
}

#[async_trait::async_trait]
impl BudgetApi for HttpApi {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
        let request = self.request(Method::POST, &["auth", "login"])?.json(credentials);
        self.authenticate(request).await
    }

    async fn register(&self, registration: &Registration) -> Result<AuthResponse> {
        let request = self.request(Method::POST, &["auth", "register"])?.json(registration);
        self.authenticate(request).await
    }

    async fn logout(&self) -> Result<()> {
        self.session.clear().await
    }

    async fn current_user(&self) -> Result<User> {
        self.fetch(self.request(Method::GET, &["auth", "me"])?).await
    }

    async fn list_transactions(&self, page: Page) -> Result<Vec<Transaction>> {
        let request = self
            .request(Method::GET, &["transactions"])?
            .query(&[("offset", page.offset()), ("limit", page.limit())]);
        self.fetch(request).await
    }

    async fn create_transaction(&self, transaction: &NewTransaction) -> Result<Transaction> {
        let request = self
            .request(Method::POST, &["transaction", "create"])?
            .json(transaction);
        self.fetch(request).await
    }

    async fn update_transaction(
        &self,
        id: &str,
        transaction: &NewTransaction,
    ) -> Result<Transaction> {
        let request = self
            .request(Method::PUT, &["transactions", id])?
            .json(transaction);
        self.fetch(request).await
    }

    async fn delete_transaction(&self, id: &str) -> Result<()> {
        send(self.request(Method::DELETE, &["transactions", id])?).await?;
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        self.fetch(self.request(Method::GET, &["categories"])?).await
    }

    async fn create_category(&self, category: &NewCategory) -> Result<Category> {
        let request = self.request(Method::POST, &["categories"])?.json(category);
        self.fetch(request).await
    }

    async fn delete_category(&self, id: &str) -> Result<()> {
        send(self.request(Method::DELETE, &["categories", id])?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, Query};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{delete, get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use tokio::net::TcpListener;

    async fn login(Json(body): Json<Value>) -> std::result::Result<Json<Value>, StatusCode> {
        if body["password"] == "pw" {
            Ok(Json(json!({
                "token": "tok-1",
                "user": {"id": "u1", "name": "Alice", "email": body["email"]}
            })))
        } else {
            Err(StatusCode::UNAUTHORIZED)
        }
    }

    async fn me(headers: HeaderMap) -> std::result::Result<Json<Value>, StatusCode> {
        match headers.get("authorization").and_then(|v| v.to_str().ok()) {
            Some("Bearer tok-1") => Ok(Json(
                json!({"id": "u1", "name": "Alice", "email": "a@example.com"}),
            )),
            _ => Err(StatusCode::UNAUTHORIZED),
        }
    }

    async fn transactions(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
        let offset = query.get("offset").cloned().unwrap_or_default();
        Json(json!([{
            "id": format!("t{offset}"),
            "amount": 12.5,
            "type": "expense",
            "category": "c1",
            "date": "2025-10-20"
        }]))
    }

    async fn create_transaction(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        let mut created = body;
        created["id"] = json!("t-new");
        (StatusCode::CREATED, Json(created))
    }

    async fn delete_category(Path(id): Path<String>) -> StatusCode {
        if id == "broken" {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::NO_CONTENT
        }
    }

    async fn spawn_server() -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/me", get(me))
            .route("/api/transactions", get(transactions))
            .route("/api/transaction/create", post(create_transaction))
            .route("/api/categories/:id", delete(delete_category));
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Url::parse(&format!("http://{addr}/api")).unwrap()
    }

    fn client(base: Url) -> HttpApi {
        std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
        HttpApi::new(base, SessionStore::in_memory()).unwrap()
    }

    #[test]
    fn test_base_gets_trailing_slash() {
        let api = client(Url::parse("http://localhost:3000/api").unwrap());
        assert_eq!(api.base().as_str(), "http://localhost:3000/api/");
    }

    #[test]
    fn test_ids_stay_in_their_segment() {
        let api = client(Url::parse("http://localhost:3000/api").unwrap());
        let url = |id: &str| api.url(&["transactions", id]).unwrap().to_string();
        assert_eq!(url("t-1"), "http://localhost:3000/api/transactions/t-1");
        assert_eq!(url("abc#x"), "http://localhost:3000/api/transactions/abc%23x");
        assert_eq!(url("abc?x=1"), "http://localhost:3000/api/transactions/abc%3Fx=1");
        assert_eq!(
            url("../auth/me"),
            "http://localhost:3000/api/transactions/..%2Fauth%2Fme"
        );
        assert!(api.url(&["transactions", ".."]).is_err());
        assert!(api.url(&["transactions", ""]).is_err());
    }

    #[tokio::test]
    async fn test_delete_sends_escaped_id() {
        let api = client(spawn_server().await);
        // The server sees the whole id, so only "broken" itself is rejected.
        api.delete_category("broken#1").await.unwrap();
        api.delete_category("broken?x=1").await.unwrap();
        assert!(api.delete_category("broken").await.is_err());
    }

    #[tokio::test]
    async fn test_login_stores_token_and_authorizes() {
        let api = client(spawn_server().await);
        assert!(api.current_user().await.is_err());

        let auth = api
            .login(&Credentials::new("a@example.com", "pw"))
            .await
            .unwrap();
        assert_eq!(auth.user().name(), "Alice");
        assert_eq!(api.session.token(), Some(Token::new("tok-1")));

        let me = api.current_user().await.unwrap();
        assert_eq!(me.id(), "u1");

        api.logout().await.unwrap();
        assert!(!api.session.is_authenticated());
    }

    #[tokio::test]
    async fn test_bad_credentials_are_an_error() {
        let api = client(spawn_server().await);
        let err = api
            .login(&Credentials::new("a@example.com", "wrong"))
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("401"));
        assert!(!api.session.is_authenticated());
    }

    #[tokio::test]
    async fn test_list_transactions_sends_page() {
        let api = client(spawn_server().await);
        let list = api.list_transactions(Page::new(40, 20)).await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id(), "t40");
        assert_eq!(list[0].amount().to_string(), "12.50");
    }

    #[tokio::test]
    async fn test_create_transaction() {
        let api = client(spawn_server().await);
        let new = NewTransaction::new(
            crate::model::TransactionType::Income,
            "150.5".parse().unwrap(),
            "c1",
            "2025-10-20",
            None,
        );
        let created = api.create_transaction(&new).await.unwrap();
        assert_eq!(created.id(), "t-new");
        assert_eq!(created.to_new(), new);
    }

    #[tokio::test]
    async fn test_delete_status_is_checked() {
        let api = client(spawn_server().await);
        api.delete_category("c1").await.unwrap();
        let err = api.delete_category("broken").await.unwrap_err();
        assert!(err.to_string().contains("500"));
    }
}
