use async_trait::async_trait;
use dynsync_application::{CrmMethod, CrmRequest, CrmRequestBody, CrmResponse, CrmTransport};
use dynsync_core::TransportError;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::debug;
use url::form_urlencoded;

/// reqwest-based transport for the identity provider and the Web API.
///
/// Certificate verification is left at the client's default and is never
/// turned off here.
#[derive(Clone)]
pub struct ReqwestCrmTransport {
    http_client: reqwest::Client,
}

impl ReqwestCrmTransport {
    /// Creates a transport over an existing client.
    #[must_use]
    pub fn new(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }

    fn build(&self, request: CrmRequest) -> reqwest::RequestBuilder {
        let method = match request.method {
            CrmMethod::Get => reqwest::Method::GET,
            CrmMethod::Post => reqwest::Method::POST,
            CrmMethod::Patch => reqwest::Method::PATCH,
        };

        let mut builder = self
            .http_client
            .request(method, request.url.as_str())
            .header(ACCEPT, "application/json");

        if let Some(token) = &request.bearer_token {
            builder = builder.bearer_auth(token);
        }

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        match request.body {
            CrmRequestBody::Empty => builder,
            CrmRequestBody::Form(fields) => builder
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(encode_form(&fields)),
            CrmRequestBody::Json(body) => builder.json(&body),
        }
    }
}

fn encode_form(fields: &[(String, String)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields.iter().map(|(key, value)| (key.as_str(), value.as_str())))
        .finish()
}

fn transport_error(error: &reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout(error.to_string())
    } else if error.is_connect() {
        TransportError::Connect(error.to_string())
    } else {
        TransportError::Other(error.to_string())
    }
}

#[async_trait]
impl CrmTransport for ReqwestCrmTransport {
    async fn execute(&self, request: CrmRequest) -> Result<CrmResponse, TransportError> {
        let method = request.method;
        debug!(method = method.as_str(), url = %request.url, "sending crm request");

        let response = self
            .build(request)
            .send()
            .await
            .map_err(|error| transport_error(&error))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|error| transport_error(&error))?;

        debug!(method = method.as_str(), status, "crm response received");
        Ok(CrmResponse::new(status, body))
    }
}
