// Application state shared across all modules

use std::sync::Arc;

use super::config::TokenTransport;
use crate::auth::tokens::TokenService;
use crate::services::CredentialService;
use crate::storage::{AccountStore, ClipStore};

/// Services and stores shared by every request
///
/// Built once at startup and read-only afterwards; handlers receive it as
/// `Extension<Arc<AppState>>`.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountStore>,
    pub clips: Arc<dyn ClipStore>,
    pub tokens: Arc<TokenService>,
    pub credentials: Arc<CredentialService>,
    pub token_transport: TokenTransport,
}
