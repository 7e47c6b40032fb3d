// app/src/web/extractors.rs

use crate::errors::AppError;
use crate::session::SessionId;
use crate::state::AppState;
use actix_web::cookie::Cookie;
use actix_web::dev::{Payload, ServiceResponse};
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};
use tracing::{debug, warn};
use uuid::Uuid;

pub const USER_ID_HEADER: &str = "X-User-ID";
const DEFAULT_SESSION_COOKIE: &str = "bistro_session";

/// The signed-in user, identified by the `X-User-ID` header.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
  pub user_id: Uuid,
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let user_id = req
      .headers()
      .get(USER_ID_HEADER)
      .and_then(|value| value.to_str().ok())
      .and_then(|raw| Uuid::parse_str(raw.trim()).ok());

    match user_id {
      Some(user_id) => ready(Ok(AuthenticatedUser { user_id })),
      None => {
        warn!("AuthenticatedUser extractor: missing or invalid {} header.", USER_ID_HEADER);
        ready(Err(AppError::Auth(format!(
          "User authentication required. Missing or invalid {} header.",
          USER_ID_HEADER
        ))))
      }
    }
  }
}

/// Session id minted during this request; the response must carry it back.
#[derive(Debug, Clone)]
struct PendingSessionCookie {
  name: String,
  session: SessionId,
}

/// The request's session, read from the session cookie. A request without
/// a usable cookie gets a fresh session.
#[derive(Debug, Clone, Copy)]
pub struct SessionHandle {
  pub id: SessionId,
}

impl FromRequest for SessionHandle {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let cookie_name = req
      .app_data::<web::Data<AppState>>()
      .map(|state| state.config.session_cookie_name.clone())
      .unwrap_or_else(|| DEFAULT_SESSION_COOKIE.to_string());

    if let Some(id) = req.cookie(&cookie_name).and_then(|c| SessionId::parse(c.value())) {
      return ready(Ok(SessionHandle { id }));
    }

    let id = SessionId::generate();
    debug!(session = %id, "Starting a new session.");
    req.extensions_mut().insert(PendingSessionCookie {
      name: cookie_name,
      session: id,
    });
    ready(Ok(SessionHandle { id }))
  }
}

/// Sets the session cookie on `res` when the request started a session.
pub fn attach_new_session_cookie<B>(res: &mut ServiceResponse<B>) {
  let pending = res.request().extensions().get::<PendingSessionCookie>().cloned();
  let Some(pending) = pending else {
    return;
  };

  let cookie = Cookie::build(pending.name, pending.session.to_string())
    .path("/")
    .http_only(true)
    .finish();
  if let Err(e) = res.response_mut().add_cookie(&cookie) {
    warn!(error = %e, "Failed to set the session cookie.");
  }
}
