use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::activity::Identity;
use crate::config::{AuthConfig, AuthMode};
use crate::youtube::Credential;

/// Resolves the caller's identity from request headers.
///
/// Never rejects a request: a missing or malformed credential means the
/// caller is anonymous and will be served demo data.
pub struct AuthService {
    mode: AuthMode,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Self {
        Self { mode: config.mode }
    }

    pub fn identify(&self, headers: &HeaderMap) -> Identity {
        if self.mode == AuthMode::None {
            return Identity::Anonymous;
        }

        headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(bearer_token)
            .map(|token| Identity::Authenticated(Credential::new(token)))
            .unwrap_or(Identity::Anonymous)
    }
}

fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

pub async fn auth_middleware(
    auth_service: Arc<AuthService>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = auth_service.identify(&headers);
    request.extensions_mut().insert(identity);
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extraction() {
        let auth = AuthService::new(AuthConfig {
            mode: AuthMode::Bearer,
        });

        let identity = auth.identify(&headers("Bearer ya29.token"));
        assert_eq!(identity.credential().map(|c| c.token()), Some("ya29.token"));

        assert_eq!(auth.identify(&headers("bearer   abc ")).credential().map(|c| c.token()), Some("abc"));
        assert_eq!(auth.identify(&headers("Basic dXNlcg==")), Identity::Anonymous);
        assert_eq!(auth.identify(&headers("Bearer ")), Identity::Anonymous);
        assert_eq!(auth.identify(&HeaderMap::new()), Identity::Anonymous);
    }

    #[test]
    fn test_mode_none_ignores_credentials() {
        let auth = AuthService::new(AuthConfig {
            mode: AuthMode::None,
        });
        assert_eq!(auth.identify(&headers("Bearer abc")), Identity::Anonymous);
    }
}
