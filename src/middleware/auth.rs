use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::auth::{password::verify_password, AuthError, Credential};
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller, inserted into request extensions for handlers
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub username: String,
}

impl From<&Credential> for AuthUser {
    fn from(credential: &Credential) -> Self {
        Self {
            username: credential.username.clone(),
        }
    }
}

/// Checked for unknown users so both failure paths hash a password
const UNKNOWN_USER_PASSWORD: &str =
    "{sha256}0000000000000000000000000000000000000000000000000000000000000000";

/// HTTP Basic authentication followed by the access policy check.
///
/// Every request reaching this layer must carry valid credentials; the
/// policy then decides whether the caller's roles suffice.
pub async fn basic_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let credential = match authenticate(&state, request.headers()).await {
        Ok(credential) => credential,
        Err(err) => return reject(err, &state.realm),
    };

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    if let Err(err) = state.policy.authorize(&credential, &method, &path) {
        tracing::warn!(
            user = %credential.username,
            "Access denied for {} {}: {}",
            method,
            path,
            err
        );
        return reject(err, &state.realm);
    }

    tracing::debug!(user = %credential.username, "Authorized {} {}", method, path);
    request.extensions_mut().insert(AuthUser::from(&credential));
    next.run(request).await
}

async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Credential, AuthError> {
    let (username, password) = extract_basic_credentials(headers)?;

    let Some(credential) = state.credentials.resolve(&username).await? else {
        verify_password(UNKNOWN_USER_PASSWORD, &password);
        tracing::warn!("Authentication failed: unknown user '{}'", username);
        return Err(AuthError::BadCredentials);
    };

    if !verify_password(&credential.password, &password) {
        tracing::warn!("Authentication failed: bad password for '{}'", username);
        return Err(AuthError::BadCredentials);
    }
    if !credential.enabled {
        tracing::warn!("Authentication failed: user '{}' is disabled", username);
        return Err(AuthError::Disabled);
    }
    Ok(credential)
}

/// Decode `Authorization: Basic base64(username:password)`
pub fn extract_basic_credentials(headers: &HeaderMap) -> Result<(String, String), AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AuthError::MalformedHeader("not valid ASCII"))?;

    let (scheme, encoded) = auth_str
        .trim()
        .split_once(' ')
        .ok_or(AuthError::MissingCredentials)?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(AuthError::MissingCredentials);
    }

    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| AuthError::MalformedHeader("invalid base64"))?;
    let decoded =
        String::from_utf8(decoded).map_err(|_| AuthError::MalformedHeader("invalid UTF-8"))?;

    let (username, password) = decoded
        .split_once(':')
        .ok_or(AuthError::MalformedHeader("missing ':' separator"))?;
    Ok((username.to_string(), password.to_string()))
}

fn reject(err: AuthError, realm: &str) -> Response {
    let api_error = ApiError::from(err);
    let status = api_error.status_code();
    let mut response = api_error.into_response();
    if status == StatusCode::UNAUTHORIZED {
        let challenge = format!("Basic realm=\"{}\"", realm.replace('"', ""));
        if let Ok(value) = HeaderValue::from_str(&challenge) {
            response.headers_mut().insert(header::WWW_AUTHENTICATE, value);
        }
    }
    response
}
