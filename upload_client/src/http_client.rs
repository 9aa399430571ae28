use error_printer::OptionPrinter;
use http::Extensions;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Request, Response};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, Middleware, Next};
use upload_config::groups::client::ConfigValueGroup as ClientConfig;

use crate::error::{Result, UploadClientError};

/// Builds the client used for both uploads and progress queries.
///
/// No retry middleware is installed: a failed upload is retried by the user, and a
/// failed progress query ends the tracking session.
pub fn build_http_client(config: &ClientConfig) -> Result<ClientWithMiddleware> {
    let auth_middleware = config
        .api_key
        .as_deref()
        .map(AuthMiddleware::new)
        .transpose()?
        .info_none("Request authentication disabled");

    let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
    if let Some(timeout) = config.request_timeout {
        builder = builder.timeout(timeout);
    }
    let reqwest_client = builder.build()?;

    Ok(ClientBuilder::new(reqwest_client).maybe_with(auth_middleware).build())
}

/// Helper trait to allow the reqwest_middleware client to optionally add a middleware.
trait OptionalMiddleware {
    fn maybe_with<M: Middleware>(self, middleware: Option<M>) -> Self;
}

impl OptionalMiddleware for ClientBuilder {
    fn maybe_with<M: Middleware>(self, middleware: Option<M>) -> Self {
        match middleware {
            Some(m) => self.with(m),
            None => self,
        }
    }
}

/// Adds `Authorization: Bearer <key>` to every outbound request.
pub struct AuthMiddleware {
    header: HeaderValue,
}

impl AuthMiddleware {
    pub fn new(api_key: &str) -> Result<Self> {
        let mut header = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| UploadClientError::ConfigurationError(format!("invalid api key: {e}")))?;
        header.set_sensitive(true);
        Ok(Self { header })
    }
}

#[async_trait::async_trait]
impl Middleware for AuthMiddleware {
    async fn handle(
        &self,
        mut req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        req.headers_mut().insert(AUTHORIZATION, self.header.clone());
        next.run(req, extensions).await
    }
}
