//! Signing in and out.
//!
//! Login exchanges an email/password pair for tokens and a profile and writes
//! all of them into the cycle's store. Logout removes them again.

use super::credentials::{UserProfile, ACCESS_TOKEN_COOKIE, PROFILE_COOKIES};
use super::resolver::AuthCycle;
use crate::error::AuthError;
use crate::traits::{CredentialStore, HttpClient};

impl<C: HttpClient, S: CredentialStore> AuthCycle<C, S> {
    /// Sign in with email and password.
    ///
    /// On success the token pair and the `name`, `nickname` and `email`
    /// profile entries are stored and the cycle's cached state is dropped, so
    /// the next [`resolve`](Self::resolve) sees the new session.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, AuthError> {
        let response = self
            .resolver
            .api()
            .login(email, password)
            .await
            .map_err(AuthError::from_login_failure)?;

        let profile = response.profile().ok_or_else(|| AuthError::InvalidResponse {
            message: "login response carries no user profile".to_string(),
        })?;

        let previous_access = self.read(ACCESS_TOKEN_COOKIE).await;
        self.persist(&response.tokens(), previous_access.as_deref())
            .await?;

        let options = self.resolver.config().refresh_cookie_options();
        let values = [
            profile.name.as_str(),
            profile.nickname.as_str(),
            profile.email.as_str(),
        ];
        for (name, value) in PROFILE_COOKIES.iter().zip(values) {
            if let Err(e) = self.store.set(name, value, &options).await {
                tracing::warn!("Failed to store profile entry {}: {}", name, e);
            }
        }

        self.invalidate().await;
        tracing::info!("Signed in as {}", profile.nickname);
        Ok(profile)
    }

    /// Sign out: clear the tokens and remove the profile entries.
    pub async fn logout(&self) {
        self.clear().await;
        let options = self.resolver.config().refresh_cookie_options();
        for name in PROFILE_COOKIES {
            if let Err(e) = self.store.delete(name, &options).await {
                tracing::warn!("Failed to delete {} from store: {}", name, e);
            }
        }
        tracing::info!("Signed out");
    }

    /// Profile stored at login, if all of its entries are present.
    pub async fn stored_profile(&self) -> Option<UserProfile> {
        let name = self.read(PROFILE_COOKIES[0]).await?;
        let nickname = self.read(PROFILE_COOKIES[1]).await?;
        let email = self.read(PROFILE_COOKIES[2]).await?;
        Some(UserProfile {
            name,
            nickname,
            email,
            role: None,
        })
    }
}
