use reqwest::Method;
use shared::{AuthResponse, LoginRequest, MessageResponse, OtpRequest, RegisterRequest, UserProfile};
use tracing::{info, warn};

use crate::context::AppContext;
use crate::error::Result;

pub async fn request_otp(ctx: &AppContext, identifier: &str) -> Result<MessageResponse> {
    const ENDPOINT: &str = "/auth/otp";
    let request = OtpRequest {
        identifier: identifier.to_owned(),
    };
    let response = ctx.api.post_json(ENDPOINT, &request).await?;
    info!(identifier, "Api otp requested");
    Ok(response)
}

/// Verifies the OTP and starts the session with the returned user and token.
pub async fn login(ctx: &AppContext, identifier: &str, otp: &str) -> Result<UserProfile> {
    const ENDPOINT: &str = "/auth/login";
    let request = LoginRequest {
        identifier: identifier.to_owned(),
        otp: otp.to_owned(),
    };
    let response: AuthResponse = ctx.api.post_json(ENDPOINT, &request).await?;
    ctx.session.login(response.user.clone(), &response.token);
    info!(identifier, "Api auth login");
    Ok(response.user)
}

pub async fn register(ctx: &AppContext, request: &RegisterRequest) -> Result<UserProfile> {
    const ENDPOINT: &str = "/auth/register";
    let response: AuthResponse = ctx.api.post_json(ENDPOINT, request).await?;
    ctx.session.login(response.user.clone(), &response.token);
    info!(phone = %request.phone, "Api auth register");
    Ok(response.user)
}

/// Ends the session locally whatever the server answers; a server failure is
/// still returned to the caller.
pub async fn logout(ctx: &AppContext) -> Result<()> {
    const ENDPOINT: &str = "/auth/logout";
    if ctx.session.token().is_none() {
        ctx.session.clear();
        return Ok(());
    }
    let result = match ctx.api.request(Method::POST, ENDPOINT) {
        Ok(request) => ctx.api.send(request).await.map(|_| ()),
        Err(error) => Err(error),
    };
    ctx.session.clear();
    match result {
        Ok(()) => {
            info!("Api auth logout");
            Ok(())
        }
        Err(error) => {
            warn!(%error, "Logout call failed, session cleared locally");
            Err(error)
        }
    }
}

/// Fetches the profile and refreshes the stored user with it.
pub async fn profile(ctx: &AppContext) -> Result<UserProfile> {
    const ENDPOINT: &str = "/auth/profile";
    let user: UserProfile = ctx.api.get_json(ENDPOINT).await?;
    ctx.session.set_user(Some(user.clone()));
    Ok(user)
}
