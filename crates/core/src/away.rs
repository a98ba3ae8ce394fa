//! Away-message banner state
//!
//! Local presentation only. The banner follows the last status the user
//! picked, whether or not the server accepted it.

use crate::models::Presence;

/// Banner text used when going Away without a note
pub const DEFAULT_AWAY_MESSAGE: &str = "Be back soon!";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AwayBanner {
    text: Option<String>,
}

impl AwayBanner {
    /// Show the banner for `Away`, hide it for anything else
    pub fn apply(&mut self, status: &str, message: &str) {
        self.text = if Presence::from(status).is_away() {
            let message = message.trim();
            Some(if message.is_empty() {
                DEFAULT_AWAY_MESSAGE.to_string()
            } else {
                message.to_string()
            })
        } else {
            None
        };
    }

    pub fn is_visible(&self) -> bool {
        self.text.is_some()
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_by_default() {
        assert!(!AwayBanner::default().is_visible());
    }

    #[test]
    fn test_away_shows_message_or_default() {
        let mut banner = AwayBanner::default();

        banner.apply("Away", "at lunch");
        assert_eq!(banner.text(), Some("at lunch"));

        banner.apply("Away", "");
        assert_eq!(banner.text(), Some(DEFAULT_AWAY_MESSAGE));
    }

    #[test]
    fn test_other_status_hides() {
        let mut banner = AwayBanner::default();
        banner.apply("Away", "brb");
        banner.apply("Online", "brb");
        assert!(!banner.is_visible());

        banner.apply("Away", "");
        banner.apply("Invisible", "");
        assert_eq!(banner.text(), None);
    }
}
