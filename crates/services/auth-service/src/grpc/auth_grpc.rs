//! gRPC implementation for AuthService.

use std::sync::Arc;

use tonic::{Request, Response, Status};

use crate::service::AuthService;
use domain::{LoginCredentials, TokenPair, BEARER_TOKEN_PREFIX};
use proto::auth::{
    auth_service_server::AuthService as AuthServiceProto, LoginRequest, LogoutRequest,
    RefreshRequest, SignUpRequest, TokenResponse, UserResponse, ValidateRequest,
};

/// gRPC service wrapper for AuthService.
pub struct AuthGrpcService {
    service: Arc<dyn AuthService>,
}

impl AuthGrpcService {
    /// Create a new gRPC service wrapper.
    pub fn new(service: Arc<dyn AuthService>) -> Self {
        Self { service }
    }
}

/// Accept access tokens copied straight out of an Authorization header.
fn strip_bearer(token: &str) -> &str {
    token.strip_prefix(BEARER_TOKEN_PREFIX).unwrap_or(token)
}

fn token_response(pair: TokenPair) -> TokenResponse {
    TokenResponse {
        id: pair.user_id.to_string(),
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
    }
}

#[tonic::async_trait]
impl AuthServiceProto for AuthGrpcService {
    async fn sign_up(
        &self,
        request: Request<SignUpRequest>,
    ) -> Result<Response<TokenResponse>, Status> {
        let req = request.into_inner();

        let pair = self
            .service
            .sign_up(LoginCredentials::new(req.email, req.password))
            .await
            .map_err(Status::from)?;

        Ok(Response::new(token_response(pair)))
    }

    async fn login(
        &self,
        request: Request<LoginRequest>,
    ) -> Result<Response<TokenResponse>, Status> {
        let req = request.into_inner();

        // Unknown email and wrong password must look identical to the caller
        let pair = self
            .service
            .login(LoginCredentials::new(req.email, req.password))
            .await
            .map_err(|e| e.into_credentials_status())?;

        Ok(Response::new(token_response(pair)))
    }

    async fn refresh(
        &self,
        request: Request<RefreshRequest>,
    ) -> Result<Response<TokenResponse>, Status> {
        let req = request.into_inner();

        let pair = self
            .service
            .refresh(&req.refresh_token)
            .await
            .map_err(Status::from)?;

        Ok(Response::new(token_response(pair)))
    }

    async fn logout(
        &self,
        request: Request<LogoutRequest>,
    ) -> Result<Response<UserResponse>, Status> {
        let req = request.into_inner();

        let user_id = self
            .service
            .logout(strip_bearer(&req.access_token))
            .await
            .map_err(Status::from)?;

        Ok(Response::new(UserResponse {
            id: user_id.to_string(),
        }))
    }

    async fn validate(
        &self,
        request: Request<ValidateRequest>,
    ) -> Result<Response<UserResponse>, Status> {
        let req = request.into_inner();

        let user_id = self
            .service
            .validate(strip_bearer(&req.access_token))
            .await
            .map_err(Status::from)?;

        Ok(Response::new(UserResponse {
            id: user_id.to_string(),
        }))
    }
}
