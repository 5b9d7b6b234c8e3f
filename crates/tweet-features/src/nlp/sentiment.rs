//! Lexicon and rule based sentiment polarity (VADER rules).

use std::sync::LazyLock;

use ahash::HashMap;
use serde::{Deserialize, Serialize};

use crate::{error::Result, round_to};

pub trait SentimentAnalyzer: Send + Sync {
    /// Lexicon/rule-set identifier recorded in fitted models.
    fn version(&self) -> &str;

    fn polarity_scores(&self, text: &str) -> Result<SentimentScores>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentScores {
    pub neg: f64,
    pub pos: f64,
    pub neu: f64,
    pub compound: f64,
}

/// Full VADER rule set over a 317-entry subset of the VADER lexicon (the
/// slang, emoticons, intensity words and common valence words of tweets). Words
/// outside the subset score neutral, so values differ from scoring against the
/// complete ~7.5k-entry lexicon on general text.
pub const VADER_LEXICON_VERSION: &str = "vader-rules/tweet-lexicon-317-1";

static LEXICON_TSV: &str = include_str!("../../../../resources/sentiment_lexicon.tsv");

static LEXICON: LazyLock<HashMap<String, f64>> = LazyLock::new(|| {
    LEXICON_TSV
        .lines()
        .filter(|line| !line.starts_with('#'))
        .filter_map(|line| {
            let (token, valence) = line.split_once('\t')?;
            Some((token.to_owned(), valence.trim().parse().ok()?))
        })
        .collect()
});

const B_INCR: f64 = 0.293;
const B_DECR: f64 = -0.293;
const C_INCR: f64 = 0.733;
const N_SCALAR: f64 = -0.74;
const ALPHA: f64 = 15.0;

const PUNCTUATION: &[char] = &[
    '!', '"', '#', '$', '%', '&', '\'', '(', ')', '*', '+', ',', '-', '.', '/', ':', ';', '<',
    '=', '>', '?', '@', '[', '\\', ']', '^', '_', '`', '{', '|', '}', '~',
];

fn booster(word: &str) -> Option<f64> {
    match word {
        "absolutely" | "amazingly" | "awfully" | "completely" | "considerably" | "decidedly"
        | "deeply" | "effing" | "enormously" | "entirely" | "especially" | "exceptionally"
        | "extremely" | "fabulously" | "flipping" | "flippin" | "fricking" | "frickin"
        | "frigging" | "friggin" | "fully" | "fucking" | "greatly" | "hella" | "highly"
        | "hugely" | "incredibly" | "intensely" | "majorly" | "more" | "most"
        | "particularly" | "purely" | "quite" | "really" | "remarkably" | "so"
        | "substantially" | "thoroughly" | "totally" | "tremendously" | "uber"
        | "unbelievably" | "unusually" | "utterly" | "very" => Some(B_INCR),
        "almost" | "barely" | "hardly" | "kinda" | "kindof" | "kind-of" | "less" | "little"
        | "marginally" | "occasionally" | "partly" | "scarcely" | "slightly" | "somewhat"
        | "sorta" | "sortof" | "sort-of" => Some(B_DECR),
        _ => None,
    }
}

fn is_negation(word: &str) -> bool {
    word.contains("n't")
        || matches!(
            word,
            "aint" | "arent" | "cannot" | "cant" | "couldnt" | "darent" | "didnt" | "doesnt"
                | "dont" | "hadnt" | "hasnt" | "havent" | "isnt" | "mightnt" | "mustnt"
                | "neither" | "neednt" | "never" | "none" | "nope" | "nor" | "not"
                | "nothing" | "nowhere" | "oughtnt" | "shant" | "shouldnt" | "uhuh"
                | "wasnt" | "werent" | "uh-uh" | "without" | "wont" | "wouldnt" | "rarely"
                | "seldom" | "despite"
        )
}

/// Python's `str.isupper`: at least one cased character and no lowercase ones.
fn is_upper(word: &str) -> bool {
    word.chars().any(char::is_uppercase) && !word.chars().any(char::is_lowercase)
}

/// Splits on whitespace and strips surrounding punctuation unless that would
/// leave two characters or fewer (keeps emoticons such as `:)`).
fn words_and_emoticons(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(|token| {
            let stripped = token.trim_matches(PUNCTUATION);
            if stripped.chars().count() <= 2 {
                token
            } else {
                stripped
            }
        })
        .collect()
}

fn normalize_score(score: f64) -> f64 {
    (score / (score * score + ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(4) as f64 * 0.292;
    let questions = match text.matches('?').count() {
        0 | 1 => 0.0,
        n @ 2..=3 => n as f64 * 0.18,
        _ => 0.96,
    };
    exclamations + questions
}

struct SentiText<'a> {
    words: Vec<&'a str>,
    lowered: Vec<String>,
    is_cap_diff: bool,
}

impl<'a> SentiText<'a> {
    fn new(text: &'a str) -> Self {
        let words = words_and_emoticons(text);
        let lowered = words.iter().map(|w| w.to_lowercase()).collect();
        let all_caps = words.iter().filter(|w| is_upper(w)).count();
        let is_cap_diff = all_caps > 0 && all_caps < words.len();
        Self {
            words,
            lowered,
            is_cap_diff,
        }
    }

    fn in_lexicon(&self, idx: usize) -> bool {
        LEXICON.contains_key(&self.lowered[idx])
    }

    fn scalar_inc_dec(&self, idx: usize, valence: f64) -> f64 {
        let Some(mut scalar) = booster(&self.lowered[idx]) else {
            return 0.0;
        };
        if valence < 0.0 {
            scalar = -scalar;
        }
        if is_upper(self.words[idx]) && self.is_cap_diff {
            scalar += if valence > 0.0 { C_INCR } else { -C_INCR };
        }
        scalar
    }

    fn negation_check(&self, mut valence: f64, start_i: usize, i: usize) -> f64 {
        let w = |offset: usize| self.lowered[i - offset].as_str();
        let so_this = |word: &str| word == "so" || word == "this";
        match start_i {
            0 => {
                if is_negation(w(1)) {
                    valence *= N_SCALAR;
                }
            }
            1 => {
                if w(2) == "never" && so_this(w(1)) {
                    valence *= 1.25;
                } else if w(2) == "without" && w(1) == "doubt" {
                } else if is_negation(w(2)) {
                    valence *= N_SCALAR;
                }
            }
            _ => {
                if w(3) == "never" && (so_this(w(2)) || so_this(w(1))) {
                    valence *= 1.25;
                } else if w(3) == "without" && (w(2) == "doubt" || w(1) == "doubt") {
                } else if is_negation(w(3)) {
                    valence *= N_SCALAR;
                }
            }
        }
        valence
    }

    fn least_check(&self, mut valence: f64, i: usize) -> f64 {
        if i > 0 && self.lowered[i - 1] == "least" && !self.in_lexicon(i - 1) {
            let preceded_by_at_very =
                i > 1 && matches!(self.lowered[i - 2].as_str(), "at" | "very");
            if !preceded_by_at_very {
                valence *= N_SCALAR;
            }
        }
        valence
    }

    fn valence(&self, i: usize) -> f64 {
        let word = self.lowered[i].as_str();
        let Some(&base) = LEXICON.get(word) else {
            return 0.0;
        };
        let mut valence = base;
        let n = self.words.len();

        if word == "no" && i + 1 < n && self.in_lexicon(i + 1) {
            valence = 0.0;
        }
        let preceded_by_no = (i > 0 && self.lowered[i - 1] == "no")
            || (i > 1 && self.lowered[i - 2] == "no")
            || (i > 2
                && self.lowered[i - 3] == "no"
                && matches!(self.lowered[i - 1].as_str(), "or" | "nor"));
        if preceded_by_no {
            valence = base * N_SCALAR;
        }

        if is_upper(self.words[i]) && self.is_cap_diff {
            valence += if valence > 0.0 { C_INCR } else { -C_INCR };
        }

        for start_i in 0..3 {
            if i > start_i && !self.in_lexicon(i - (start_i + 1)) {
                let mut scalar = self.scalar_inc_dec(i - (start_i + 1), valence);
                if start_i == 1 {
                    scalar *= 0.95;
                } else if start_i == 2 {
                    scalar *= 0.9;
                }
                valence += scalar;
                valence = self.negation_check(valence, start_i, i);
            }
        }
        self.least_check(valence, i)
    }

    fn sentiments(&self) -> Vec<f64> {
        let n = self.words.len();
        let mut sentiments = (0..n)
            .map(|i| {
                let word = self.lowered[i].as_str();
                let kind_of = word == "kind" && i + 1 < n && self.lowered[i + 1] == "of";
                if booster(word).is_some() || kind_of {
                    0.0
                } else {
                    self.valence(i)
                }
            })
            .collect::<Vec<_>>();

        if let Some(but_idx) = self.lowered.iter().position(|w| w == "but") {
            for (idx, sentiment) in sentiments.iter_mut().enumerate() {
                if idx < but_idx {
                    *sentiment *= 0.5;
                } else if idx > but_idx {
                    *sentiment *= 1.5;
                }
            }
        }
        sentiments
    }
}

/// VADER sentiment over the embedded tweet lexicon. Stateless after the
/// lexicon is loaded, so one instance can be shared across threads.
#[derive(Clone, Copy, Debug, Default)]
pub struct VaderAnalyzer;

impl VaderAnalyzer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn score(text: &str) -> SentimentScores {
        let senti_text = SentiText::new(text);
        let sentiments = senti_text.sentiments();
        if sentiments.is_empty() {
            return SentimentScores::default();
        }

        let punct_emph = punctuation_emphasis(text);
        let mut sum_s: f64 = sentiments.iter().sum();
        if sum_s > 0.0 {
            sum_s += punct_emph;
        } else if sum_s < 0.0 {
            sum_s -= punct_emph;
        }
        let compound = normalize_score(sum_s);

        let (mut pos_sum, mut neg_sum, mut neu_count) = (0.0, 0.0, 0.0);
        for &s in &sentiments {
            if s > 0.0 {
                pos_sum += s + 1.0;
            } else if s < 0.0 {
                neg_sum += s - 1.0;
            } else {
                neu_count += 1.0;
            }
        }
        if pos_sum > neg_sum.abs() {
            pos_sum += punct_emph;
        } else if pos_sum < neg_sum.abs() {
            neg_sum -= punct_emph;
        }

        let total = pos_sum + neg_sum.abs() + neu_count;
        SentimentScores {
            neg: round_to((neg_sum / total).abs(), 3),
            pos: round_to((pos_sum / total).abs(), 3),
            neu: round_to((neu_count / total).abs(), 3),
            compound: round_to(compound, 4),
        }
    }
}

impl SentimentAnalyzer for VaderAnalyzer {
    fn version(&self) -> &str {
        VADER_LEXICON_VERSION
    }

    fn polarity_scores(&self, text: &str) -> Result<SentimentScores> {
        Ok(Self::score(text))
    }
}
