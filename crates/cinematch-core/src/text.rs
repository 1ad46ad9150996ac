//! Tokenization and n-gram assembly for item descriptions.
//!
//! Text is first decomposed to NFKD and stripped of combining marks, so
//! "café" and "cafe" produce the same token. Tokens are then maximal runs
//! of word characters (alphanumeric or `_`), lowercased. English stop words are removed before n-grams are built,
//! so an n-gram may span a removed stop word.
//!
//! ```rust
//! use cinematch_core::text::{ngrams, tokenize};
//!
//! let tokens = tokenize("The Dark Knight rises", true);
//! assert_eq!(tokens, vec!["dark", "knight", "rises"]);
//! assert_eq!(ngrams(&tokens, 2, 3), vec!["dark knight", "knight rises", "dark knight rises"]);
//! ```

use std::collections::HashSet;
use std::sync::OnceLock;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// The standard English stop-word list used by common TF-IDF tooling.
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all",
    "almost", "alone", "along", "already", "also", "although", "always", "am", "among",
    "amongst", "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone",
    "anything", "anyway", "anywhere", "are", "around", "as", "at", "back", "be", "became",
    "because", "become", "becomes", "becoming", "been", "before", "beforehand", "behind",
    "being", "below", "beside", "besides", "between", "beyond", "bill", "both", "bottom",
    "but", "by", "call", "can", "cannot", "cant", "co", "con", "could", "couldnt", "cry",
    "de", "describe", "detail", "do", "done", "down", "due", "during", "each", "eg",
    "eight", "either", "eleven", "else", "elsewhere", "empty", "enough", "etc", "even",
    "ever", "every", "everyone", "everything", "everywhere", "except", "few", "fifteen",
    "fifty", "fill", "find", "fire", "first", "five", "for", "former", "formerly", "forty",
    "found", "four", "from", "front", "full", "further", "get", "give", "go", "had", "has",
    "hasnt", "have", "he", "hence", "her", "here", "hereafter", "hereby", "herein",
    "hereupon", "hers", "herself", "him", "himself", "his", "how", "however", "hundred",
    "i", "ie", "if", "in", "inc", "indeed", "interest", "into", "is", "it", "its", "itself",
    "keep", "last", "latter", "latterly", "least", "less", "ltd", "made", "many", "may",
    "me", "meanwhile", "might", "mill", "mine", "more", "moreover", "most", "mostly",
    "move", "much", "must", "my", "myself", "name", "namely", "neither", "never",
    "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor", "not",
    "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto",
    "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own",
    "part", "per", "perhaps", "please", "put", "rather", "re", "same", "see", "seem",
    "seemed", "seeming", "seems", "serious", "several", "she", "should", "show", "side",
    "since", "sincere", "six", "sixty", "so", "some", "somehow", "someone", "something",
    "sometime", "sometimes", "somewhere", "still", "such", "system", "take", "ten", "than",
    "that", "the", "their", "them", "themselves", "then", "thence", "there", "thereafter",
    "thereby", "therefore", "therein", "thereupon", "these", "they", "thick", "thin",
    "third", "this", "those", "though", "three", "through", "throughout", "thru", "thus",
    "to", "together", "too", "top", "toward", "towards", "twelve", "twenty", "two", "un",
    "under", "until", "up", "upon", "us", "very", "via", "was", "we", "well", "were", "what",
    "whatever", "when", "whence", "whenever", "where", "whereafter", "whereas", "whereby",
    "wherein", "whereupon", "wherever", "whether", "which", "while", "whither", "who",
    "whoever", "whole", "whom", "whose", "why", "will", "with", "within", "without",
    "would", "yet", "you", "your", "yours", "yourself", "yourselves",
];

fn stop_words() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| ENGLISH_STOP_WORDS.iter().copied().collect())
}

/// Returns true if `word` (already lowercase) is an English stop word.
pub fn is_stop_word(word: &str) -> bool {
    stop_words().contains(word)
}

/// Decompose `text` to NFKD and drop combining marks ("é" becomes "e").
pub fn strip_accents(text: &str) -> String {
    text.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Split `text` into accent-stripped, lowercase word tokens, optionally
/// dropping stop words.
pub fn tokenize(text: &str, remove_stop_words: bool) -> Vec<String> {
    strip_accents(text)
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .filter(|t| !remove_stop_words || !is_stop_word(t))
        .collect()
}

/// Build all contiguous n-grams of `min_n..=max_n` tokens, joined by a space.
///
/// Output is grouped by n (all unigrams, then all bigrams, ...), each group
/// in token order. Repeated n-grams are repeated in the output so callers
/// can count term frequency directly.
pub fn ngrams(tokens: &[String], min_n: usize, max_n: usize) -> Vec<String> {
    let min_n = min_n.max(1);
    let mut out = Vec::new();
    for n in min_n..=max_n {
        if n > tokens.len() {
            break;
        }
        for window in tokens.windows(n) {
            out.push(window.join(" "));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_splits_on_punctuation() {
        let tokens = tokenize("Jake Sully's AVATAR-program, 2154!", false);
        assert_eq!(tokens, vec!["jake", "sully", "s", "avatar", "program", "2154"]);
    }

    #[test]
    fn test_tokenize_removes_stop_words() {
        let tokens = tokenize("The hero of the story is a cat", true);
        assert_eq!(tokens, vec!["hero", "story", "cat"]);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("", true).is_empty());
        assert!(tokenize("  ... !!", true).is_empty());
    }

    #[test]
    fn test_tokenize_keeps_underscore_and_strips_accents() {
        let tokens = tokenize("café_noir über Ångström", false);
        assert_eq!(tokens, vec!["cafe_noir", "uber", "angstrom"]);
    }

    #[test]
    fn test_accented_and_plain_spellings_match() {
        assert_eq!(tokenize("Café", false), tokenize("cafe", false));
        assert_eq!(strip_accents("naïve résumé"), "naive resume");
    }

    #[test]
    fn test_strip_accents_compatibility_forms() {
        // NFKD also folds compatibility characters such as ligatures.
        assert_eq!(tokenize("ﬁlm", false), vec!["film"]);
    }

    #[test]
    fn test_ngrams_range() {
        let tokens: Vec<String> = ["space", "war", "aliens"].iter().map(|s| s.to_string()).collect();
        let grams = ngrams(&tokens, 1, 3);
        assert_eq!(
            grams,
            vec![
                "space",
                "war",
                "aliens",
                "space war",
                "war aliens",
                "space war aliens"
            ]
        );
    }

    #[test]
    fn test_ngrams_span_removed_stop_words() {
        let tokens = tokenize("war of the worlds", true);
        assert_eq!(ngrams(&tokens, 2, 2), vec!["war worlds"]);
    }

    #[test]
    fn test_ngrams_shorter_than_n() {
        let tokens = vec!["solo".to_string()];
        assert_eq!(ngrams(&tokens, 1, 3), vec!["solo"]);
    }

    #[test]
    fn test_stop_word_list_has_no_duplicates() {
        assert_eq!(stop_words().len(), ENGLISH_STOP_WORDS.len());
    }
}
