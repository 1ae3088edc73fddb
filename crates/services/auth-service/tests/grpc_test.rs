//! gRPC adapter: request conversion and status-code mapping.

mod support;

use tonic::{Code, Request};

use auth_service_lib::grpc::AuthGrpcService;
use proto::auth::{
    LoginRequest, LogoutRequest, RefreshRequest, SignUpRequest, ValidateRequest,
};
use proto::AuthService as _;

use support::test_app;

fn grpc() -> AuthGrpcService {
    AuthGrpcService::new(test_app().auth)
}

fn sign_up(email: &str, password: &str) -> Request<SignUpRequest> {
    Request::new(SignUpRequest {
        email: email.to_string(),
        password: password.to_string(),
    })
}

fn login(email: &str, password: &str) -> Request<LoginRequest> {
    Request::new(LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    })
}

#[tokio::test]
async fn sign_up_and_validate_round_trip() {
    let service = grpc();

    let tokens = service
        .sign_up(sign_up("alice@example.com", "password123"))
        .await
        .unwrap()
        .into_inner();
    assert!(uuid::Uuid::parse_str(&tokens.id).is_ok());

    let validated = service
        .validate(Request::new(ValidateRequest {
            access_token: format!("Bearer {}", tokens.access_token),
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(validated.id, tokens.id);

    let refreshed = service
        .refresh(Request::new(RefreshRequest {
            refresh_token: tokens.refresh_token,
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(refreshed.id, tokens.id);

    let logged_out = service
        .logout(Request::new(LogoutRequest {
            access_token: refreshed.access_token,
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(logged_out.id, tokens.id);
}

#[tokio::test]
async fn sign_up_status_codes() {
    let service = grpc();

    let status = service.sign_up(sign_up("bad", "password123")).await.unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);

    service
        .sign_up(sign_up("bob@example.com", "password123"))
        .await
        .unwrap();
    let status = service
        .sign_up(sign_up("bob@example.com", "password123"))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::AlreadyExists);
}

#[tokio::test]
async fn login_masks_unknown_email() {
    let service = grpc();
    service
        .sign_up(sign_up("carol@example.com", "password123"))
        .await
        .unwrap();

    let wrong = service
        .login(login("carol@example.com", "wrong-password"))
        .await
        .unwrap_err();
    let unknown = service
        .login(login("nobody@example.com", "password123"))
        .await
        .unwrap_err();

    assert_eq!(wrong.code(), Code::Unauthenticated);
    assert_eq!(unknown.code(), Code::Unauthenticated);
    assert_eq!(wrong.message(), unknown.message());
}

#[tokio::test]
async fn token_errors_are_unauthenticated() {
    let service = grpc();
    let tokens = service
        .sign_up(sign_up("dave@example.com", "password123"))
        .await
        .unwrap()
        .into_inner();

    let status = service
        .refresh(Request::new(RefreshRequest {
            refresh_token: tokens.access_token,
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::Unauthenticated);

    let status = service
        .validate(Request::new(ValidateRequest {
            access_token: String::new(),
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);
}
