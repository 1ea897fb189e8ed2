// ── Remote control ──
//
// Stateless key helpers. The device drops key events that arrive faster
// than it processes them, so sequences pause `key_delay` after every press
// and stop at the first failure.

use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter, EnumString};
use tracing::{debug, warn};

use crate::device::{Device, checked};
use crate::error::CoreError;

/// Buttons on the Roku remote, named as ECP expects them.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Key {
    Home,
    Up,
    Down,
    Left,
    Right,
    Select,
    Reverse,
    Forward,
    Play,
    Back,
    InstantReplay,
    Info,
    Backspace,
    Search,
    Enter,
    VolumeUp,
    VolumeDown,
    VolumeMute,
    PowerOff,
    ChannelUp,
    ChannelDown,
}

impl Key {
    /// The `Lit_` key that types a single character on the on-screen
    /// keyboard, percent-encoded.
    ///
    /// Unreserved URI marks (`! ' ( ) ~`) pass through untouched, as do
    /// ASCII alphanumerics and `- _ . *`. Everything else is `%XX` per UTF-8
    /// byte, with space as `%20`.
    pub fn literal(c: char) -> String {
        if matches!(c, '!' | '\'' | '(' | ')' | '~') {
            return format!("Lit_{c}");
        }
        let mut buf = [0u8; 4];
        let encoded: String =
            url::form_urlencoded::byte_serialize(c.encode_utf8(&mut buf).as_bytes()).collect();
        format!("Lit_{}", encoded.replace('+', "%20"))
    }
}

impl Device {
    /// Press and release a key.
    pub async fn key_press(&self, key: &str) -> Result<(), CoreError> {
        let resp = self.client().key_press(key).await?;
        checked(resp, "keypress").map(drop)
    }

    /// Hold a key down until [`Device::key_up`].
    pub async fn key_down(&self, key: &str) -> Result<(), CoreError> {
        let resp = self.client().key_down(key).await?;
        checked(resp, "keydown").map(drop)
    }

    pub async fn key_up(&self, key: &str) -> Result<(), CoreError> {
        let resp = self.client().key_up(key).await?;
        checked(resp, "keyup").map(drop)
    }

    /// Press each key in turn. Returns `false` at the first key the device
    /// didn't accept; later keys are not sent.
    pub async fn key_sequence<S: AsRef<str> + Sync>(&self, keys: &[S]) -> bool {
        let delay = self.config().key_delay;
        for key in keys {
            let key = key.as_ref();
            if let Err(e) = self.key_press(key).await {
                warn!(key, error = %e, "key sequence aborted");
                return false;
            }
            debug!(key, "key pressed");
            tokio::time::sleep(delay).await;
        }
        true
    }

    /// Type `text` on the on-screen keyboard, one `Lit_` key per character.
    ///
    /// Doesn't submit; follow with [`Key::Enter`] if the field needs it.
    pub async fn keyboard_input(&self, text: &str) -> bool {
        let keys: Vec<String> = text.chars().map(Key::literal).collect();
        self.key_sequence(&keys).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn key_names_match_ecp() {
        assert_eq!(Key::InstantReplay.to_string(), "InstantReplay");
        assert_eq!(Key::VolumeMute.as_ref(), "VolumeMute");
        assert_eq!(Key::from_str("select").unwrap(), Key::Select);
        assert_eq!(Key::from_str("channelup").unwrap(), Key::ChannelUp);
        assert!(Key::from_str("Teleport").is_err());
        assert_eq!(Key::iter().count(), 21);
    }

    #[test]
    fn literals_are_percent_encoded() {
        assert_eq!(Key::literal('a'), "Lit_a");
        assert_eq!(Key::literal(' '), "Lit_%20");
        assert_eq!(Key::literal('+'), "Lit_%2B");
        assert_eq!(Key::literal('&'), "Lit_%26");
        assert_eq!(Key::literal('é'), "Lit_%C3%A9");
        assert_eq!(Key::literal('/'), "Lit_%2F");
    }

    #[test]
    fn literals_keep_unreserved_marks() {
        for (c, key) in [
            ('!', "Lit_!"),
            ('\'', "Lit_'"),
            ('(', "Lit_("),
            (')', "Lit_)"),
            ('~', "Lit_~"),
            ('*', "Lit_*"),
            ('-', "Lit_-"),
            ('_', "Lit__"),
            ('.', "Lit_."),
        ] {
            assert_eq!(Key::literal(c), key, "literal for {c:?}");
        }
    }
}
