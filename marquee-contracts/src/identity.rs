use async_trait::async_trait;
use marquee_model::Identity;
use tokio::sync::watch;

use crate::error::AuthError;

/// Session identity source.
///
/// `subscribe` hands out a receiver that observes every sign-in and
/// sign-out; dropping the receiver ends the subscription.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn current(&self) -> Option<Identity>;

    fn subscribe(&self) -> watch::Receiver<Option<Identity>>;

    async fn login(&self) -> Result<Identity, AuthError>;

    async fn logout(&self) -> Result<(), AuthError>;
}
