//! Platform adapter implementations.
//!
//! The shipped adapters carry each platform's profile and local behaviour but
//! no network transport: sessions must be seeded by an operator, feeds come
//! from local fixtures, and real posting is refused. [`ScriptedAdapter`] is a
//! programmable stand-in for tests.

mod facebook;
mod instagram;
mod linkedin;
mod reddit;
mod scripted;
mod tiktok;
mod twitter;

pub use facebook::FacebookAdapter;
pub use instagram::InstagramAdapter;
pub use linkedin::LinkedInAdapter;
pub use reddit::RedditAdapter;
pub use scripted::ScriptedAdapter;
pub use tiktok::TikTokAdapter;
pub use twitter::TwitterAdapter;

use crate::PlatformAdapter;
use gatekeeper_core::{Draft, DraftBuilder, Platform, PostReceipt, Session};
use gatekeeper_error::{AdapterError, AdapterErrorKind, AdapterResult};
use gatekeeper_storage::SessionStore;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The shipped adapter for `platform`.
pub fn adapter_for(platform: Platform) -> Arc<dyn PlatformAdapter> {
    match platform {
        Platform::XTwitter => Arc::new(TwitterAdapter::new()),
        Platform::Reddit => Arc::new(RedditAdapter::new()),
        Platform::Linkedin => Arc::new(LinkedInAdapter::new()),
        Platform::Facebook => Arc::new(FacebookAdapter::new()),
        Platform::Instagram => Arc::new(InstagramAdapter::new()),
        Platform::Tiktok => Arc::new(TikTokAdapter::new()),
    }
}

/// Load the operator-seeded session for `platform`.
///
/// No interactive login is ever attempted. A missing or unauthenticated
/// session is an `AuthFailed` until the operator seeds a new one.
pub(crate) async fn seeded_session(
    platform: Platform,
    store: &SessionStore,
) -> AdapterResult<Session> {
    let stored = store.get(platform).await.map_err(|e| {
        AdapterError::new(
            AdapterErrorKind::Unknown,
            format!("session store unavailable: {}", e),
        )
    })?;

    match stored {
        Some(session) if session.is_usable() => {
            debug!(platform = %platform, "Using seeded session");
            Ok(session)
        }
        _ => {
            warn!(
                platform = %platform,
                key = %platform.session_key(),
                "Session not initialized; seed credentials manually"
            );
            Err(AdapterError::new(
                AdapterErrorKind::AuthFailed,
                format!("no authenticated session at {}", platform.session_key()),
            ))
        }
    }
}

/// Build a plain text draft.
pub(crate) fn text_draft(platform: Platform, text: impl Into<String>) -> AdapterResult<Draft> {
    DraftBuilder::default()
        .platform(platform)
        .text(text)
        .build()
        .map_err(|e| AdapterError::new(AdapterErrorKind::Unknown, e.to_string()))
}

/// Refuse a real post for adapters without a transport.
pub(crate) fn refuse_post(platform: Platform, draft: &Draft) -> AdapterResult<PostReceipt> {
    info!(
        platform = %platform,
        text_len = draft.text().chars().count(),
        "Posting needs a platform transport; refusing"
    );
    Err(AdapterError::new(
        AdapterErrorKind::CapabilityDisabled,
        format!("no posting transport for {}", platform),
    ))
}
