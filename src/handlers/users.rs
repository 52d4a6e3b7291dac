use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use chirpy_api::{CredentialsRequest, UserResponse};

use super::run_blocking;
use crate::auth::extractors::AuthClaims;
use crate::auth::services::AuthService;
use crate::response::{AppResponse, AppResult};

/// POST /api/users
/// Inscription d'un nouvel utilisateur
pub async fn register(
    State(service): State<Arc<AuthService>>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> AppResult<UserResponse> {
    let Json(payload) = payload?;

    let user = run_blocking(move || service.register(&payload.email, &payload.password)).await?;

    Ok(AppResponse::created(user.into()))
}

/// PUT /api/users
/// Remplace email et mot de passe de l'utilisateur authentifié
pub async fn update_user(
    claims: AuthClaims,
    State(service): State<Arc<AuthService>>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> AppResult<UserResponse> {
    let Json(payload) = payload?;

    let user = run_blocking(move || {
        service.update_credentials(claims.user_id, &payload.email, &payload.password)
    })
    .await?;

    Ok(AppResponse::ok(user.into()))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{
        body_json, default_service, json_request, test_router, with_authorization,
    };
    use axum::http::StatusCode;
    use serde_json::json;
    use tower::ServiceExt; // for oneshot

    #[tokio::test]
    async fn test_register_returns_created_user() {
        let app = test_router(default_service());

        let resp = app
            .oneshot(json_request(
                "POST",
                "/api/users",
                &json!({"email": "walt@breakingbad.com", "password": "04234"}),
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = body_json(resp).await;
        assert_eq!(body["email"], "walt@breakingbad.com");
        assert!(body["id"].is_string());
        assert!(body.get("password").is_none());
        assert!(body.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let app = test_router(default_service());
        let credentials = json!({"email": "walt@breakingbad.com", "password": "04234"});

        let first = app
            .clone()
            .oneshot(json_request("POST", "/api/users", &credentials))
            .await
            .unwrap();
        let second = app
            .oneshot(json_request("POST", "/api/users", &credentials))
            .await
            .unwrap();

        assert_eq!(first.status(), StatusCode::CREATED);
        assert_eq!(second.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_update_user_requires_access_token() {
        let app = test_router(default_service());

        let resp = app
            .oneshot(json_request(
                "PUT",
                "/api/users",
                &json!({"email": "walt@breakingbad.com", "password": "04234"}),
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_update_user_replaces_credentials() {
        let app = test_router(default_service());
        let credentials = json!({"email": "walt@breakingbad.com", "password": "04234"});
        app.clone()
            .oneshot(json_request("POST", "/api/users", &credentials))
            .await
            .unwrap();
        let login = body_json(
            app.clone()
                .oneshot(json_request("POST", "/api/login", &credentials))
                .await
                .unwrap(),
        )
        .await;
        let bearer = format!("Bearer {}", login["token"].as_str().unwrap());

        let new_credentials =
            json!({"email": "heisenberg@breakingbad.com", "password": "losPollos321"});
        let resp = app
            .clone()
            .oneshot(with_authorization(
                json_request("PUT", "/api/users", &new_credentials),
                &bearer,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["email"], "heisenberg@breakingbad.com");
        assert_eq!(body["id"], login["id"]);

        let old_login = app
            .oneshot(json_request("POST", "/api/login", &credentials))
            .await
            .unwrap();
        assert_eq!(old_login.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_update_user_rejects_refresh_token_as_bearer() {
        let app = test_router(default_service());
        let credentials = json!({"email": "walt@breakingbad.com", "password": "04234"});
        app.clone()
            .oneshot(json_request("POST", "/api/users", &credentials))
            .await
            .unwrap();
        let login = body_json(
            app.clone()
                .oneshot(json_request("POST", "/api/login", &credentials))
                .await
                .unwrap(),
        )
        .await;
        let bearer = format!("Bearer {}", login["refresh_token"].as_str().unwrap());

        let resp = app
            .oneshot(with_authorization(
                json_request("PUT", "/api/users", &credentials),
                &bearer,
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(resp).await["code"], "INVALID_TOKEN");
    }
}
