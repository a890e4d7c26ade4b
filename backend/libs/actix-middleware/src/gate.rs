use crate::session::SessionResolver;
use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderMap, AUTHORIZATION},
    Error, FromRequest, HttpMessage, HttpRequest, HttpResponse, ResponseError,
};
use error_types::ServiceError;
use futures::future::{ready, LocalBoxFuture, Ready};
use jwt_security::Session;
use std::ops::Deref;
use std::rc::Rc;
use std::sync::Arc;
use tracing::debug;

/// Header carrying the refresh token; header lookup is case-insensitive
pub const REFRESH_TOKEN_HEADER: &str = "refreshtoken";

/// Credentials as sent by the client
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl Credentials {
    /// `Authorization` loses its `Bearer ` prefix when present, otherwise it
    /// is taken verbatim
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|h| h.to_str().ok())
                .map(str::trim)
                .map(str::to_string)
        };

        let access_token = header(AUTHORIZATION.as_str()).map(|value| {
            value
                .strip_prefix("Bearer ")
                .map(str::to_string)
                .unwrap_or(value)
        });

        Self {
            access_token,
            refresh_token: header(REFRESH_TOKEN_HEADER),
        }
    }
}

/// Authentication gate wrapped around every protected scope
///
/// Requests only reach the inner service with a resolved [`Session`] in their
/// extensions. Everything else is answered here with the 401 renewal contract,
/// or a 500 when the refresh store fails.
pub struct RequestGate {
    resolver: Arc<SessionResolver>,
}

impl RequestGate {
    pub fn new(resolver: Arc<SessionResolver>) -> Self {
        Self { resolver }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RequestGateService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestGateService {
            service: Rc::new(service),
            resolver: self.resolver.clone(),
        }))
    }
}

pub struct RequestGateService<S> {
    service: Rc<S>,
    resolver: Arc<SessionResolver>,
}

impl<S, B> Service<ServiceRequest> for RequestGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let resolver = self.resolver.clone();

        Box::pin(async move {
            let credentials = Credentials::from_headers(req.headers());
            let decision = resolver
                .resolve(
                    credentials.access_token.as_deref(),
                    credentials.refresh_token.as_deref(),
                )
                .await;

            let decision = match decision {
                Ok(decision) => decision,
                Err(e) => return Ok(req.into_response(e.error_response()).map_into_right_body()),
            };

            let state = decision.state();
            let response = match decision.into_session() {
                Ok(session) => {
                    req.extensions_mut().insert(session);
                    return service
                        .call(req)
                        .await
                        .map(ServiceResponse::map_into_left_body);
                }
                Err(body) => {
                    debug!(path = %req.path(), state = ?state, "Request rejected by gate");
                    HttpResponse::Unauthorized().json(body)
                }
            };

            Ok(req.into_response(response).map_into_right_body())
        })
    }
}

/// Session resolved by [`RequestGate`]
///
/// Extraction fails with `Unauthenticated` when no gate ran for the request.
#[derive(Debug, Clone)]
pub struct AuthSession(pub Session);

impl AuthSession {
    pub fn subject_id(&self) -> &str {
        &self.0.subject_id
    }
}

impl Deref for AuthSession {
    type Target = Session;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for AuthSession {
    type Error = ServiceError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Session>()
                .cloned()
                .map(AuthSession)
                .ok_or(ServiceError::Unauthenticated),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_bearer_prefix_is_stripped() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer abc.def.ghi"))
            .insert_header(("RefreshToken", "r1"))
            .to_srv_request();

        let credentials = Credentials::from_headers(req.headers());
        assert_eq!(credentials.access_token.as_deref(), Some("abc.def.ghi"));
        assert_eq!(credentials.refresh_token.as_deref(), Some("r1"));
    }

    #[test]
    fn test_authorization_without_prefix_is_verbatim() {
        let req = TestRequest::default()
            .insert_header(("authorization", "abc.def.ghi"))
            .insert_header(("REFRESHTOKEN", "r2"))
            .to_srv_request();

        let credentials = Credentials::from_headers(req.headers());
        assert_eq!(credentials.access_token.as_deref(), Some("abc.def.ghi"));
        assert_eq!(credentials.refresh_token.as_deref(), Some("r2"));
    }

    #[test]
    fn test_missing_headers() {
        let req = TestRequest::default().to_srv_request();
        assert_eq!(Credentials::from_headers(req.headers()), Credentials::default());
    }

    #[actix_rt::test]
    async fn test_extractor_without_gate_is_unauthenticated() {
        let req = TestRequest::default().to_http_request();
        let result = AuthSession::extract(&req).await;
        assert!(matches!(result, Err(ServiceError::Unauthenticated)));
    }

    #[actix_rt::test]
    async fn test_extractor_reads_session_from_extensions() {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(Session {
            subject_id: "u1".into(),
        });

        let session = AuthSession::extract(&req).await.unwrap();
        assert_eq!(session.subject_id(), "u1");
    }
}
