//! The notification unit handed to the dispatcher.

use serde::Serialize;

use crate::{DestinationName, UserProfile};

/// A chat message ready for delivery.
///
/// Serialises to `{icon?, activity?, title?, body?}`; absent fields are
/// omitted. The destination only selects the credential and is never
/// serialised.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Payload {
    #[serde(skip_serializing_if = "Option::is_none")]
    icon: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    activity: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<String>,

    #[serde(skip)]
    destination: Option<DestinationName>,
}

impl Payload {
    /// Creates an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a free-form message sent on behalf of `sender`.
    ///
    /// The activity line defaults to `"<sender> sent a message"`.
    pub fn ad_hoc(
        sender: &UserProfile,
        icon: Option<String>,
        activity: Option<String>,
        title: Option<String>,
        body: impl Into<String>,
    ) -> Self {
        let activity =
            activity.unwrap_or_else(|| format!("{} sent a message", sender.display_name()));
        let mut payload = Self::new().activity(activity).body(body);
        payload.icon = icon;
        payload.title = title;
        payload
    }

    /// Creates the canned message used to check a conversation is wired up.
    pub fn test_message(sender: &UserProfile, icon: Option<String>, canonical_url: &str) -> Self {
        Self::ad_hoc(
            sender,
            icon,
            None,
            Some(format!("Test message from {}", env!("CARGO_PKG_NAME"))),
            format!("This is a **test** message sent from your [server]({canonical_url})."),
        )
    }

    /// Sets the icon URL.
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Sets the icon URL if one is given.
    pub fn maybe_icon(mut self, icon: Option<String>) -> Self {
        self.icon = icon;
        self
    }

    /// Sets the activity line.
    pub fn activity(mut self, activity: impl Into<String>) -> Self {
        self.activity = Some(activity.into());
        self
    }

    /// Sets the headline.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the markdown body, trimmed of surrounding whitespace.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into().trim().to_string());
        self
    }

    /// Sets the destination used to pick a credential.
    pub fn destination(mut self, destination: DestinationName) -> Self {
        self.destination = Some(destination);
        self
    }

    /// Replaces the destination, or clears it to use the default conversation.
    pub fn set_destination(&mut self, destination: Option<DestinationName>) {
        self.destination = destination;
    }

    /// Icon URL, if any.
    pub fn icon_url(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// Activity line, if any.
    pub fn activity_text(&self) -> Option<&str> {
        self.activity.as_deref()
    }

    /// Headline, if any.
    pub fn title_text(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Trimmed markdown body, if any.
    pub fn body_text(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Destination used for credential lookup, if any.
    pub fn destination_name(&self) -> Option<&DestinationName> {
        self.destination.as_ref()
    }

    /// Serialises the wire representation.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
