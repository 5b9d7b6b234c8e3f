//! Vowel-group syllable estimates for the readability features.

pub const SYLLABLE_COUNTER_VERSION: &str = "vowel-groups-1";

fn is_vowel(c: char, position: usize) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u') || (c == 'y' && position > 0)
}

/// Syllables in one lower-case word; never less than one.
#[must_use]
pub fn word_syllables(word: &str) -> usize {
    let chars = word.chars().collect::<Vec<_>>();
    let mut count = 0;
    let mut prev_vowel = false;
    for (i, &c) in chars.iter().enumerate() {
        let vowel = is_vowel(c, i);
        if vowel && !prev_vowel {
            count += 1;
        }
        prev_vowel = vowel;
    }

    let n = chars.len();
    let before = |offset: usize| n.checked_sub(offset).map(|i| chars[i]);
    if count > 1 {
        match (before(3), before(2), before(1)) {
            // silent final e after a consonant, except consonant + "le"
            (third, Some(c), Some('e'))
                if (!is_vowel(c, 1) && c != 'l')
                    || (c == 'l' && third.is_some_and(|p| is_vowel(p, 1))) =>
            {
                count -= 1;
            }
            (Some(c), Some('e'), Some('d')) if !matches!(c, 't' | 'd') => count -= 1,
            (Some(c), Some('e'), Some('s')) if !matches!(c, 's' | 'x' | 'z' | 'c' | 'h') => {
                count -= 1;
            }
            _ => {}
        }
    }
    count.max(1)
}

/// Total syllables: punctuation removed, lower-cased, every whitespace word counted.
#[must_use]
pub fn count_syllables(text: &str) -> usize {
    let cleaned = text
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect::<String>()
        .to_lowercase();
    cleaned.split_whitespace().map(word_syllables).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_syllables() {
        for (word, expected) in [
            ("love", 1),
            ("this", 1),
            ("great", 1),
            ("table", 2),
            ("barking", 2),
            ("loudly", 2),
            ("jumped", 1),
            ("wanted", 2),
            ("boxes", 2),
            ("makes", 1),
            ("the", 1),
            ("whale", 1),
            ("agree", 2),
            ("yes", 1),
            ("beautiful", 3),
            ("123", 1),
        ] {
            assert_eq!(word_syllables(word), expected, "{word}");
        }
    }

    #[test]
    fn test_count_syllables_text() {
        assert_eq!(count_syllables("I love this! #great"), 4);
        assert_eq!(count_syllables(""), 0);
        assert_eq!(count_syllables("!!! ..."), 0);
    }
}
