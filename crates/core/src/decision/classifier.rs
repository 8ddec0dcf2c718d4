use serde::Serialize;

use crate::domain::decision::PrecisionVerdict;

/// Shortest digit run that counts as part of a model code ("S240", "240S").
pub const MIN_MODEL_CODE_DIGITS: usize = 2;
/// Queries with at least this many whitespace-separated tokens are precise.
pub const MIN_PRECISE_TOKENS: usize = 3;

/// Which precision heuristics fired for a query. Either one is enough.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PrecisionSignals {
    pub model_code: bool,
    pub token_count: bool,
}

impl PrecisionSignals {
    pub fn verdict(self) -> PrecisionVerdict {
        if self.model_code || self.token_count {
            PrecisionVerdict::Precise
        } else {
            PrecisionVerdict::Generic
        }
    }
}

pub trait QueryClassifier: Send + Sync {
    fn signals(&self, query: &str) -> PrecisionSignals;

    fn classify(&self, query: &str) -> PrecisionVerdict {
        self.signals(query).verdict()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DeterministicClassifier;

impl QueryClassifier for DeterministicClassifier {
    fn signals(&self, query: &str) -> PrecisionSignals {
        precision_signals(query)
    }
}

pub fn classify(query: &str) -> PrecisionVerdict {
    precision_signals(query).verdict()
}

pub fn precision_signals(query: &str) -> PrecisionSignals {
    PrecisionSignals {
        model_code: has_model_code(query),
        token_count: query.split_whitespace().count() >= MIN_PRECISE_TOKENS,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CharClass {
    Letter,
    Digit,
    Other,
}

impl CharClass {
    fn of(ch: char) -> Self {
        if ch.is_ascii_alphabetic() {
            Self::Letter
        } else if ch.is_ascii_digit() {
            Self::Digit
        } else {
            Self::Other
        }
    }
}

/// Scans for a letter run directly followed by a digit run of at least
/// [`MIN_MODEL_CODE_DIGITS`], or such a digit run directly followed by letters.
pub fn has_model_code(query: &str) -> bool {
    let runs = char_runs(query);

    runs.windows(2).any(|pair| match (pair[0], pair[1]) {
        ((CharClass::Letter, _), (CharClass::Digit, digits)) => digits >= MIN_MODEL_CODE_DIGITS,
        ((CharClass::Digit, digits), (CharClass::Letter, _)) => digits >= MIN_MODEL_CODE_DIGITS,
        _ => false,
    })
}

fn char_runs(query: &str) -> Vec<(CharClass, usize)> {
    let mut runs: Vec<(CharClass, usize)> = Vec::new();
    for class in query.chars().map(CharClass::of) {
        match runs.last_mut() {
            Some((last, len)) if *last == class => *len += 1,
            _ => runs.push((class, 1)),
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use crate::domain::decision::PrecisionVerdict;

    use super::{classify, has_model_code, precision_signals, DeterministicClassifier, QueryClassifier};

    #[test]
    fn model_reference_is_precise() {
        assert_eq!(classify("Grohe S240"), PrecisionVerdict::Precise);
        let signals = precision_signals("Grohe S240");
        assert!(signals.model_code);
        assert!(!signals.token_count);
    }

    #[test]
    fn single_category_word_is_generic() {
        assert_eq!(classify("chaise"), PrecisionVerdict::Generic);
    }

    #[test]
    fn three_tokens_are_precise_without_model_code() {
        assert_eq!(classify("table basse bois"), PrecisionVerdict::Precise);
        let signals = precision_signals("table basse bois");
        assert!(signals.token_count);
        assert!(!signals.model_code);
    }

    #[test]
    fn empty_query_is_generic() {
        assert_eq!(classify(""), PrecisionVerdict::Generic);
        assert_eq!(precision_signals(""), super::PrecisionSignals::default());
    }

    #[test]
    fn digits_before_letters_count_as_model_code() {
        assert!(has_model_code("240S"));
        assert!(has_model_code("mixer 500W"));
        assert!(has_model_code("RTX4090"));
    }

    #[test]
    fn single_digit_or_separated_runs_are_not_model_codes() {
        assert!(!has_model_code("S2"));
        assert!(!has_model_code("2S"));
        assert!(!has_model_code("iPhone 15"));
        assert!(!has_model_code("lot-12"));
        assert!(!has_model_code("x1y"));
    }

    #[test]
    fn non_ascii_letters_do_not_start_a_model_code() {
        assert!(!has_model_code("é12"));
        assert!(has_model_code("éa12"));
    }

    #[test]
    fn whitespace_runs_collapse_when_counting_tokens() {
        assert_eq!(classify("  table \t  basse  "), PrecisionVerdict::Generic);
        assert_eq!(classify("table \t basse \n bois"), PrecisionVerdict::Precise);
    }

    #[test]
    fn trait_classifier_matches_free_function() {
        let classifier = DeterministicClassifier;
        for query in ["Grohe S240", "chaise", "table basse bois", ""] {
            assert_eq!(classifier.classify(query), classify(query));
        }
    }
}
