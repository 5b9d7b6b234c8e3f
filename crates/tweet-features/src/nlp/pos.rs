//! Part-of-speech tagging with the Penn Treebank tagset.
//!
//! [`RuleTagger`] is a closed-class lexicon plus suffix guesses, followed by a
//! left-to-right pass of contextual rewrite rules. Its output only has to be
//! deterministic and stable for a given [`PosTagger::version`]: POS n-gram
//! vocabularies are tied to the tagger that produced them.

use crate::error::Result;

pub trait PosTagger: Send + Sync {
    /// Tagset/model identifier recorded in fitted models.
    fn version(&self) -> &str;

    /// One tag per token, in token order.
    fn tag(&self, tokens: &[String]) -> Result<Vec<String>>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RuleTagger;

pub const RULE_TAGGER_VERSION: &str = "ptb-rules-1";

fn closed_class(word: &str) -> Option<&'static str> {
    let tag = match word {
        "the" | "a" | "an" | "this" | "these" | "those" | "some" | "any" | "each" | "every"
        | "all" | "another" | "no" | "either" | "neither" | "both" => "DT",
        "i" | "me" | "you" | "u" | "ya" | "he" | "him" | "she" | "her" | "it" | "we" | "us"
        | "they" | "them" | "myself" | "yourself" | "himself" | "herself" | "itself"
        | "ourselves" | "themselves" | "yall" => "PRP",
        "my" | "your" | "ur" | "his" | "its" | "our" | "their" => "PRP$",
        "who" | "whom" | "what" => "WP",
        "whose" => "WP$",
        "which" | "whatever" => "WDT",
        "how" | "when" | "where" | "why" => "WRB",
        "of" | "in" | "on" | "at" | "by" | "for" | "with" | "about" | "against" | "between"
        | "into" | "through" | "during" | "before" | "after" | "above" | "below" | "from"
        | "over" | "under" | "until" | "while" | "because" | "since" | "than" | "like" | "as"
        | "if" | "though" | "although" | "unless" | "upon" | "via" | "without" | "within"
        | "across" | "behind" | "beyond" | "near" | "toward" | "towards" | "among" | "around"
        | "that" | "whether" => "IN",
        "up" | "down" | "off" | "out" | "away" | "back" => "RP",
        "and" | "or" | "but" | "nor" | "yet" | "plus" => "CC",
        "to" => "TO",
        "can" | "could" | "will" | "would" | "shall" | "should" | "may" | "might" | "must"
        | "cant" | "wont" | "won" | "couldn" | "wouldn" | "shouldn" | "ll" | "d" => "MD",
        "there" => "EX",
        "not" | "t" | "never" | "very" | "too" | "so" | "just" | "really" | "also" | "only"
        | "still" | "even" | "now" | "then" | "here" | "always" | "ever" | "again"
        | "already" | "soon" | "often" | "quite" | "rather" | "almost" | "maybe" | "perhaps"
        | "probably" | "actually" | "literally" | "honestly" | "seriously" | "totally"
        | "today" | "tonight" | "tomorrow" | "yesterday" => "RB",
        "more" | "less" | "better" | "worse" => "JJR",
        "most" | "least" | "best" | "worst" => "JJS",
        "good" | "bad" | "great" | "new" | "old" | "big" | "small" | "little" | "long"
        | "short" | "high" | "low" | "real" | "right" | "wrong" | "sure" | "happy" | "sad"
        | "true" | "false" | "nice" | "other" | "same" | "different" | "own" | "whole"
        | "free" | "full" | "hard" | "easy" | "black" | "white" | "many" | "much" | "few"
        | "last" | "next" | "first" | "dumb" | "stupid" | "ugly" | "pretty" | "fake"
        | "crazy" | "funny" | "hot" | "cool" | "mad" | "dead" | "gay" | "fat" | "young"
        | "ghetto" | "trashy" | "lazy" | "cute" => "JJ",
        "one" | "two" | "three" | "four" | "five" | "six" | "seven" | "eight" | "nine"
        | "ten" | "hundred" | "thousand" | "million" | "zero" | "dozen" => "CD",
        "is" | "has" | "does" | "says" | "goes" | "gets" | "makes" | "wants" | "needs"
        | "knows" | "thinks" | "looks" | "seems" | "s" | "isn" | "doesn" | "hasn" => "VBZ",
        "am" | "are" | "have" | "do" | "don" | "aren" | "haven" | "ve" | "re" | "m" => "VBP",
        "was" | "were" | "had" | "did" | "said" | "went" | "got" | "made" | "came" | "took"
        | "saw" | "knew" | "thought" | "told" | "felt" | "gave" | "found" | "left" | "kept"
        | "became" | "began" | "brought" | "bought" | "caught" | "fought" | "heard"
        | "meant" | "met" | "paid" | "ran" | "sat" | "sold" | "sent" | "stood" | "taught"
        | "wrote" | "didn" | "wasn" | "weren" | "hadn" => "VBD",
        "been" | "done" | "gone" | "seen" | "taken" | "known" | "given" | "written"
        | "eaten" | "fallen" | "forgotten" | "gotten" | "broken" | "chosen" | "spoken"
        | "stolen" | "driven" => "VBN",
        "be" => "VB",
        "being" | "going" | "doing" | "having" | "getting" | "making" => "VBG",
        "lol" | "lmao" | "lmfao" | "haha" | "hahaha" | "omg" | "wow" | "oh" | "ohh"
        | "yeah" | "yea" | "yes" | "ok" | "okay" | "hey" | "ugh" | "smh" | "wtf" | "please"
        | "yo" => "UH",
        _ => return None,
    };
    Some(tag)
}

/// Base verb forms; tagged VBP unless context says otherwise.
fn is_base_verb(word: &str) -> bool {
    matches!(
        word,
        "love" | "hate" | "want" | "need" | "know" | "think" | "go" | "get" | "make" | "see"
            | "come" | "take" | "say" | "tell" | "feel" | "look" | "give" | "find" | "keep"
            | "let" | "put" | "call" | "try" | "ask" | "work" | "seem" | "leave" | "help"
            | "show" | "hear" | "play" | "run" | "move" | "live" | "believe" | "bring"
            | "happen" | "write" | "sit" | "stand" | "lose" | "pay" | "meet" | "learn"
            | "change" | "understand" | "watch" | "follow" | "stop" | "speak" | "read"
            | "spend" | "grow" | "open" | "walk" | "win" | "teach" | "remember" | "buy"
            | "die" | "send" | "build" | "stay" | "fall" | "cut" | "kill" | "sell" | "eat"
            | "catch" | "choose" | "fight" | "hurt" | "shut" | "suck" | "fuck" | "care"
            | "mean" | "wish" | "miss" | "kiss" | "smoke" | "hit" | "beat" | "talk" | "wait"
    )
}

fn guess_from_suffix(word: &str) -> &'static str {
    let len = word.len();
    if is_base_verb(word) {
        "VBP"
    } else if len >= 5 && word.ends_with("ing") {
        "VBG"
    } else if len >= 4 && word.ends_with("ed") {
        "VBD"
    } else if len >= 4 && word.ends_with("ly") {
        "RB"
    } else if len >= 5
        && ["ous", "ful", "ive", "able", "ible", "less", "ish", "ical", "ic", "al"]
            .iter()
            .any(|suffix| word.ends_with(suffix))
    {
        "JJ"
    } else if len >= 3 && word.ends_with('s') && !["ss", "us", "is"].iter().any(|s| word.ends_with(s)) {
        "NNS"
    } else {
        "NN"
    }
}

/// Core word of a basic token, without leading/trailing `.`, `,`, `!`, `?`.
fn core_word(token: &str) -> &str {
    token.trim_matches(|c: char| matches!(c, '.' | ',' | '!' | '?'))
}

fn initial_tag(token: &str) -> &'static str {
    let word = core_word(token);
    if word.is_empty() {
        return if token.chars().all(|c| c == ',') { "," } else { "." };
    }
    let lowered = word.to_lowercase();
    closed_class(&lowered).unwrap_or_else(|| guess_from_suffix(&lowered))
}

fn is_be(word: &str) -> bool {
    matches!(word, "be" | "is" | "am" | "are" | "was" | "were" | "been" | "being" | "s" | "m" | "re")
}

fn is_have(word: &str) -> bool {
    matches!(word, "have" | "has" | "had" | "having" | "ve")
}

impl RuleTagger {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn tag_tokens(tokens: &[String]) -> Vec<&'static str> {
        let words = tokens
            .iter()
            .map(|t| core_word(t).to_lowercase())
            .collect::<Vec<_>>();
        let mut tags = tokens.iter().map(|t| initial_tag(t)).collect::<Vec<_>>();

        for i in 0..tags.len() {
            let word = words[i].as_str();
            let prev_tag = i.checked_sub(1).map(|p| tags[p]);
            let prev_word = i.checked_sub(1).map(|p| words[p].as_str());
            let next_tag = tags.get(i + 1).copied();

            tags[i] = match (tags[i], prev_tag) {
                // "to go", "will go"
                ("VBP" | "NN", Some("TO" | "MD")) if is_base_verb(word) || tags[i] == "VBP" => "VB",
                // "the love", "my hate"
                ("VB" | "VBP", Some("DT" | "PRP$" | "JJ")) => "NN",
                // "has eaten", "were killed"
                ("VBD", Some(_)) if prev_word.is_some_and(|w| is_have(w) || is_be(w)) => "VBN",
                // "i like"
                ("IN", Some("PRP")) if word == "like" => "VBP",
                // existential only before a form of "be"
                ("EX", _) if !words.get(i + 1).is_some_and(|w| is_be(w)) => "RB",
                // possessive "her" before a nominal
                ("PRP", _) if word == "her" && matches!(next_tag, Some("NN" | "NNS" | "JJ")) => "PRP$",
                (tag, _) => tag,
            };
        }
        tags
    }
}

impl PosTagger for RuleTagger {
    fn version(&self) -> &str {
        RULE_TAGGER_VERSION
    }

    fn tag(&self, tokens: &[String]) -> Result<Vec<String>> {
        Ok(Self::tag_tokens(tokens)
            .into_iter()
            .map(str::to_owned)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(text: &str) -> Vec<String> {
        let tokens = text.split_whitespace().map(str::to_owned).collect::<Vec<_>>();
        RuleTagger::new().tag(&tokens).unwrap()
    }

    #[test]
    fn test_closed_class_and_verbs() {
        assert_eq!(tag("i love this!"), ["PRP", "VBP", "DT"]);
        assert_eq!(tag("i want to go"), ["PRP", "VBP", "TO", "VB"]);
        assert_eq!(tag("you will win"), ["PRP", "MD", "VB"]);
    }

    #[test]
    fn test_suffix_guesses() {
        assert_eq!(tag("the dogs are barking loudly"), ["DT", "NNS", "VBP", "VBG", "RB"]);
        assert_eq!(tag("dangerous"), ["JJ"]);
        assert_eq!(tag("grass"), ["NN"]);
    }

    #[test]
    fn test_contextual_rules() {
        assert_eq!(tag("the love is real"), ["DT", "NN", "VBZ", "JJ"]);
        assert_eq!(tag("she has eaten"), ["PRP", "VBZ", "VBN"]);
        assert_eq!(tag("they were killed"), ["PRP", "VBD", "VBN"]);
        assert_eq!(tag("they killed"), ["PRP", "VBD"]);
        assert_eq!(tag("i like cats"), ["PRP", "VBP", "NNS"]);
        assert_eq!(tag("her dog"), ["PRP$", "NN"]);
        assert_eq!(tag("tell her"), ["VBP", "PRP"]);
        assert_eq!(tag("there is"), ["EX", "VBZ"]);
        assert_eq!(tag("over there"), ["IN", "RB"]);
    }

    #[test]
    fn test_punctuation_tokens() {
        assert_eq!(tag("wow !! , ?"), ["UH", ".", ",", "."]);
        assert_eq!(tag("great,"), ["JJ"]);
    }

    #[test]
    fn test_empty() {
        assert!(tag("").is_empty());
        assert_eq!(RuleTagger::new().version(), RULE_TAGGER_VERSION);
    }
}
