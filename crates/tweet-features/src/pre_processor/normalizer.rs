//! Whitespace, URL, mention and hashtag handling for raw tweet text.
//!
//! One set of patterns backs both output modes: [`normalize`] deletes URLs and
//! mentions, [`substitute_sentinels`] replaces URLs, mentions and hashtags with
//! sentinel tokens so [`count_twitter_objects`] can count them.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub const URL_SENTINEL: &str = "URLHERE";
pub const MENTION_SENTINEL: &str = "MENTIONHERE";
pub const HASHTAG_SENTINEL: &str = "HASHTAGHERE";

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"http[s]?://(?:[a-zA-Z]|[0-9]|[$-_@.&+]|[!*\(\),]|(?:%[0-9a-fA-F][0-9a-fA-F]))+",
    )
    .expect("valid regex")
});

static MENTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@[\w\-]+").expect("valid regex"));

static HASHTAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#[\w\-]+").expect("valid regex"));

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").into_owned()
}

fn strip_once(text: &str) -> String {
    let collapsed = collapse_whitespace(text);
    let without_urls = URL.replace_all(&collapsed, "");
    let without_mentions = MENTION.replace_all(&without_urls, "");
    collapse_whitespace(&without_mentions).trim().to_owned()
}

/// Collapses whitespace and deletes URLs and @-mentions. Case is preserved.
///
/// Deleting a mention can splice a new URL together (`http@x://...`), so the
/// pass repeats until the text stops changing. Every pass either leaves the
/// text untouched or shortens it.
#[must_use]
pub fn normalize(text: &str) -> String {
    let mut current = strip_once(text);
    loop {
        let next = strip_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Collapses whitespace and replaces URLs, mentions and hashtags, in that
/// order, with [`URL_SENTINEL`], [`MENTION_SENTINEL`] and [`HASHTAG_SENTINEL`].
#[must_use]
pub fn substitute_sentinels(text: &str) -> String {
    let collapsed = collapse_whitespace(text);
    let text = URL.replace_all(&collapsed, URL_SENTINEL);
    let text = MENTION.replace_all(&text, MENTION_SENTINEL);
    HASHTAG.replace_all(&text, HASHTAG_SENTINEL).into_owned()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwitterObjectCounts {
    pub urls: usize,
    pub mentions: usize,
    pub hashtags: usize,
}

/// Counts URLs, mentions and hashtags by counting sentinels after substitution.
#[must_use]
pub fn count_twitter_objects(text: &str) -> TwitterObjectCounts {
    let substituted = substitute_sentinels(text);
    TwitterObjectCounts {
        urls: substituted.matches(URL_SENTINEL).count(),
        mentions: substituted.matches(MENTION_SENTINEL).count(),
        hashtags: substituted.matches(HASHTAG_SENTINEL).count(),
    }
}
