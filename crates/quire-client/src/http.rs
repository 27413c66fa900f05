use async_trait::async_trait;
use quire_api_types::{Error as ApiError, ErrorCategory, RelationStatus};
use quire_utils::Sensitive;
use reqwest::{Method, RequestBuilder, StatusCode, Url};
use tracing::debug;

use crate::api::{ClientError, EngagementApi, RelationRef};

/// [`EngagementApi`] talking to a Quire server over HTTP.
#[derive(Debug, Clone)]
pub struct HttpEngagementApi {
    client: reqwest::Client,
    base_url: String,
    token: Option<Sensitive<String>>,
}

impl HttpEngagementApi {
    /// `base_url` is where the server is reachable, without
    /// the `/api/v1` prefix.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            token: None,
        }
    }

    /// Sends requests on behalf of the user owning this bearer token.
    #[must_use]
    pub fn token(self, token: impl Into<String>) -> Self {
        Self {
            token: Some(Sensitive::new(token.into())),
            ..self
        }
    }

    /// Targets are escaped as a single path segment since handles
    /// may contain characters such as `/` or `?`.
    fn request(
        &self,
        method: Method,
        relation: &RelationRef,
    ) -> Result<RequestBuilder, ClientError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|error| ClientError::Transport(error.into()))?;

        url.path_segments_mut()
            .map_err(|()| {
                ClientError::Transport(format!("{:?} cannot be a base url", self.base_url).into())
            })?
            .pop_if_empty()
            .extend([
                "api",
                "v1",
                "relations",
                relation.kind.as_str(),
                relation.target.as_str(),
            ]);

        let request = self.client.request(method, url);
        Ok(match &self.token {
            Some(token) => request.bearer_auth(token.as_str()),
            None => request,
        })
    }

    async fn send(&self, request: RequestBuilder) -> Result<RelationStatus, ClientError> {
        let response = request
            .send()
            .await
            .map_err(|error| ClientError::Transport(error.into()))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<RelationStatus>()
                .await
                .map_err(|error| ClientError::Transport(error.into()));
        }

        debug!(%status, "server rejected engagement request");
        let error = match response.json::<ApiError>().await {
            Ok(error) => error,
            Err(..) => ApiError::new(category_of(status)),
        };
        Err(ClientError::Api(error))
    }
}

/// Guesses the category of an error response without a readable body.
fn category_of(status: StatusCode) -> ErrorCategory {
    match status {
        StatusCode::SERVICE_UNAVAILABLE => ErrorCategory::Outage,
        StatusCode::BAD_REQUEST => ErrorCategory::InvalidRequest,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ErrorCategory::AccessDenied,
        StatusCode::NOT_FOUND => ErrorCategory::NotFound,
        StatusCode::CONFLICT => ErrorCategory::Conflict,
        _ => ErrorCategory::Unknown,
    }
}

#[async_trait]
impl EngagementApi for HttpEngagementApi {
    #[tracing::instrument(skip(self), name = "http.relations.status")]
    async fn status(&self, relation: &RelationRef) -> Result<RelationStatus, ClientError> {
        self.send(self.request(Method::GET, relation)?).await
    }

    #[tracing::instrument(skip(self), name = "http.relations.set")]
    async fn set(
        &self,
        relation: &RelationRef,
        active: bool,
    ) -> Result<RelationStatus, ClientError> {
        let method = if active { Method::POST } else { Method::DELETE };
        self.send(self.request(method, relation)?).await
    }
}
