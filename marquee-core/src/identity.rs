//! Explicit identity context handed to every session that needs a user.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use marquee_contracts::{AuthError, IdentityProvider};
use marquee_model::{Identity, UserId};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::error::{MarqueeError, Result};

/// Identity handle shared by the sessions of one signed-in surface.
#[derive(Clone)]
pub struct SessionContext {
    provider: Arc<dyn IdentityProvider>,
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("user", &self.user_id())
            .finish()
    }
}

impl SessionContext {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    pub fn current_user(&self) -> Option<Identity> {
        self.provider.current()
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.current_user().map(|identity| identity.user_id)
    }

    /// The signed-in user, or `NotSignedIn`.
    pub fn require_user(&self) -> Result<UserId> {
        self.user_id().ok_or(MarqueeError::NotSignedIn)
    }

    pub async fn login(&self) -> Result<Identity> {
        match self.provider.login().await {
            Ok(identity) => {
                info!(user_id = %identity.user_id, "signed in");
                Ok(identity)
            }
            Err(err) => {
                warn!(error = %err, "sign-in failed");
                Err(err.into())
            }
        }
    }

    pub async fn logout(&self) -> Result<()> {
        self.provider.logout().await?;
        info!("signed out");
        Ok(())
    }

    /// Observe sign-in and sign-out. Dropping the subscription unsubscribes.
    pub fn changed(&self) -> IdentitySubscription {
        IdentitySubscription {
            receiver: self.provider.subscribe(),
        }
    }
}

#[derive(Debug)]
pub struct IdentitySubscription {
    receiver: watch::Receiver<Option<Identity>>,
}

impl IdentitySubscription {
    /// Wait for the next identity change.
    ///
    /// Returns `None` once the provider has gone away.
    pub async fn next(&mut self) -> Option<Option<Identity>> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    pub fn current(&self) -> Option<Identity> {
        self.receiver.borrow().clone()
    }
}

/// In-memory identity provider.
///
/// `login` signs in whichever identity was staged with
/// [`LocalIdentityProvider::stage_login`]; with nothing staged it fails the
/// way a dismissed sign-in popup would.
#[derive(Debug)]
pub struct LocalIdentityProvider {
    state: watch::Sender<Option<Identity>>,
    staged: Mutex<Option<std::result::Result<Identity, String>>>,
}

impl Default for LocalIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalIdentityProvider {
    pub fn new() -> Self {
        let (state, _) = watch::channel(None);
        Self {
            state,
            staged: Mutex::new(None),
        }
    }

    /// A provider that starts out signed in.
    pub fn signed_in(identity: Identity) -> Self {
        let provider = Self::new();
        provider.state.send_replace(Some(identity));
        provider
    }

    /// Identity the next `login` call resolves to.
    pub fn stage_login(&self, identity: Identity) {
        *self.staged.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(Ok(identity));
    }

    /// Make the next `login` call fail with a provider error.
    pub fn stage_failure(&self, message: impl Into<String>) {
        *self.staged.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(Err(message.into()));
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    fn current(&self) -> Option<Identity> {
        self.state.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.state.subscribe()
    }

    async fn login(&self) -> std::result::Result<Identity, AuthError> {
        let staged = self
            .staged
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match staged {
            Some(Ok(identity)) => {
                self.state.send_replace(Some(identity.clone()));
                Ok(identity)
            }
            Some(Err(message)) => Err(AuthError::Provider(message)),
            None => Err(AuthError::Cancelled),
        }
    }

    async fn logout(&self) -> std::result::Result<(), AuthError> {
        self.state.send_replace(None);
        Ok(())
    }
}
