//! Avatar and icon selection.

use sha2::{Digest, Sha256};

use crate::config::IconConfig;
use crate::UserProfile;

/// Pixel size of the avatar attached to event notifications.
pub const AVATAR_SIZE: u32 = 48;

/// Returns the Gravatar thumbnail URL for an email address.
///
/// The address is trimmed and lowercased before hashing, as Gravatar requires.
pub fn gravatar_thumbnail_url(email: &str, size: u32) -> String {
    let digest = Sha256::digest(email.trim().to_lowercase().as_bytes());
    format!(
        "https://www.gravatar.com/avatar/{}?s={size}&d=identicon",
        hex::encode(digest)
    )
}

/// Picks the icon for an event: the configured override, then the actor's
/// avatar, then the default icon.
pub fn event_icon(
    override_url: Option<&str>,
    icons: &IconConfig,
    actor: &UserProfile,
) -> Option<String> {
    if let Some(url) = override_url.filter(|u| !u.is_empty()) {
        return Some(url.to_string());
    }
    if let Some(email) = actor.email.as_deref().filter(|e| !e.is_empty()) {
        return Some(gravatar_thumbnail_url(email, AVATAR_SIZE));
    }
    icons.default.clone().filter(|u| !u.is_empty())
}
