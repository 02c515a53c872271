// SPDX-License-Identifier: MPL-2.0
//! HTTP transport built on `reqwest`.

use super::{ApiRoutes, EnrollmentBackend, FaceSubmission, RawResponse};
use crate::domain::Iin;
use crate::error::{Result, TransportError};
use reqwest::{Method, Url};
use serde::Serialize;

const USER_AGENT: &str = concat!("FaceEnroll/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Serialize)]
struct LookupRequest<'a> {
    iin: &'a str,
}

/// Method and path of one backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub method: Method,
    pub path: String,
}

impl ApiRoutes {
    /// Endpoint of the identity lookup for `iin`.
    #[must_use]
    pub fn lookup_endpoint(self, iin: &Iin) -> Endpoint {
        match self {
            ApiRoutes::Legacy => Endpoint {
                method: Method::POST,
                path: "/api/get_user_by_iin".to_string(),
            },
            ApiRoutes::Rest => Endpoint {
                method: Method::GET,
                path: format!("/api/users/by_iin/{}", iin),
            },
        }
    }

    /// Endpoint of the face submission for `submission`.
    #[must_use]
    pub fn submit_endpoint(self, submission: &FaceSubmission) -> Endpoint {
        match self {
            ApiRoutes::Legacy => Endpoint {
                method: Method::POST,
                path: "/api/submit-face".to_string(),
            },
            ApiRoutes::Rest => Endpoint {
                method: Method::PUT,
                path: format!("/api/users/{}/face", submission.user_id),
            },
        }
    }
}

/// Enrollment backend reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    routes: ApiRoutes,
}

impl HttpBackend {
    /// Creates a backend rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Http`] if the URL cannot be parsed or
    /// the client cannot be built.
    pub fn new(base_url: &str, routes: ApiRoutes) -> Result<Self> {
        Url::parse(base_url).map_err(|e| {
            crate::error::Error::Http(format!("invalid base URL {:?}: {}", base_url, e))
        })?;
        let base_url = base_url.trim_end_matches('/').to_string();
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url,
            routes,
        })
    }

    #[must_use]
    pub fn routes(&self) -> ApiRoutes {
        self.routes
    }

    fn url_for(&self, endpoint: &Endpoint) -> std::result::Result<Url, TransportError> {
        Url::parse(&format!("{}{}", self.base_url, endpoint.path))
            .map_err(|e| TransportError(format!("cannot build URL for {}: {}", endpoint.path, e)))
    }

    async fn send(
        &self,
        endpoint: Endpoint,
        json: Option<&impl Serialize>,
    ) -> std::result::Result<RawResponse, TransportError> {
        let url = self.url_for(&endpoint)?;
        log::info!("{} {}", endpoint.method, url);

        let mut request = self.client.request(endpoint.method, url);
        if let Some(body) = json {
            request = request.json(body);
        }
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        log::debug!("Response {} ({} bytes)", status, body.len());

        Ok(RawResponse { status, body })
    }
}

impl EnrollmentBackend for HttpBackend {
    async fn lookup_identity(&self, iin: &Iin) -> std::result::Result<RawResponse, TransportError> {
        let endpoint = self.routes.lookup_endpoint(iin);
        match self.routes {
            ApiRoutes::Legacy => {
                self.send(endpoint, Some(&LookupRequest { iin: iin.as_str() }))
                    .await
            }
            ApiRoutes::Rest => self.send(endpoint, None::<&LookupRequest<'_>>).await,
        }
    }

    async fn submit_face(
        &self,
        submission: &FaceSubmission,
    ) -> std::result::Result<RawResponse, TransportError> {
        let endpoint = self.routes.submit_endpoint(submission);
        self.send(endpoint, Some(submission)).await
    }
}
