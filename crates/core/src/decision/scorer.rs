use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::domain::decision::{
    DecisionResult, DecisionType, ManipulationRisk, PrecisionVerdict, ReviewSignal, SignalColor,
    TrustColors, TrustMetrics,
};
use crate::domain::query::Query;
use crate::errors::DecisionError;

pub const PRICE_FLOOR: u32 = 49;
pub const PRICE_MODULUS: u128 = 451;
pub const CURRENCY: &str = "€";
pub const SEARCH_URL_BASE: &str = "https://example.com/search?q=";

pub const RELIABILITY_BASE: f64 = 78.0;
pub const RELIABILITY_PRECISE_BONUS: f64 = 10.0;
pub const RELIABILITY_GENERIC_BONUS: f64 = 4.0;
pub const RELIABILITY_LENGTH_BONUS_CAP: f64 = 8.0;
pub const RELIABILITY_RANGE: (u8, u8) = (60, 95);

pub const POSITIVE_REVIEWS_BASE: f64 = 90.0;
pub const POSITIVE_REVIEWS_PRECISE_BONUS: f64 = 5.0;
pub const POSITIVE_REVIEWS_GENERIC_BONUS: f64 = 2.0;
pub const POSITIVE_REVIEWS_RANGE: (u8, u8) = (88, 98);

pub const STRONG_REVIEWS_PCT: u8 = 95;
pub const MEDIUM_REVIEWS_PCT: u8 = 92;
/// Queries shorter than this are treated as high manipulation risk.
pub const SHORT_QUERY_CHARS: usize = 6;

// RFC 3986 unreserved characters pass through untouched.
const QUERY_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

pub trait DecisionScorer: Send + Sync {
    fn score(
        &self,
        query: &str,
        verdict: PrecisionVerdict,
    ) -> Result<(DecisionResult, TrustMetrics), DecisionError>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DeterministicScorer;

impl DecisionScorer for DeterministicScorer {
    fn score(
        &self,
        query: &str,
        verdict: PrecisionVerdict,
    ) -> Result<(DecisionResult, TrustMetrics), DecisionError> {
        score(query, verdict)
    }
}

pub fn score(
    query: &str,
    verdict: PrecisionVerdict,
) -> Result<(DecisionResult, TrustMetrics), DecisionError> {
    let query = Query::parse(query)?;
    Ok(score_query(&query, verdict))
}

pub fn score_query(query: &Query, verdict: PrecisionVerdict) -> (DecisionResult, TrustMetrics) {
    let seed = query_seed(query.as_str());
    (decision_result(query, verdict, seed), trust_metrics(query, verdict))
}

/// Sum of `code_point * (position + 1)` over the query's characters, left to right.
pub fn query_seed(query: &str) -> u128 {
    query.chars().enumerate().fold(0u128, |seed, (index, ch)| {
        let weight = (index as u128).wrapping_add(1);
        seed.wrapping_add(u128::from(u32::from(ch)).wrapping_mul(weight))
    })
}

pub fn seeded_price(seed: u128) -> u32 {
    // seed % 451 always fits in a u32
    PRICE_FLOOR + (seed % PRICE_MODULUS) as u32
}

pub fn search_url(query: &str) -> String {
    format!("{SEARCH_URL_BASE}{}", utf8_percent_encode(query, QUERY_ESCAPE))
}

pub fn decision_result(query: &Query, verdict: PrecisionVerdict, seed: u128) -> DecisionResult {
    let precise = verdict.is_precise();
    let pick = |when_precise: &str, when_generic: &str| {
        let chosen = if precise { when_precise } else { when_generic };
        chosen.to_string()
    };

    DecisionResult {
        kind: if precise { DecisionType::BestPrice } else { DecisionType::BestValue },
        label: pick("Meilleur prix trouvé", "Meilleur rapport qualité/prix"),
        price: seeded_price(seed),
        currency: CURRENCY.to_string(),
        merchant: pick("Marchand certifié", "Sélection multi-marchands"),
        shipping: pick("Livraison 24-48h", "Livraison 2-3 jours"),
        url: search_url(query.as_str()),
        decision_status: pick("Strong", "Medium"),
        price_positioning: pick("Best price detected", "Top value detected"),
    }
}

pub fn trust_metrics(query: &Query, verdict: PrecisionVerdict) -> TrustMetrics {
    let char_len = query.char_len();
    let reliability_score = reliability_score(char_len, verdict);
    let positive_reviews_pct = positive_reviews_pct(verdict);
    let manipulation_risk = manipulation_risk(char_len, verdict);

    TrustMetrics {
        reliability_score,
        positive_reviews_pct,
        manipulation_risk,
        review_signal: review_signal(positive_reviews_pct),
        colors: TrustColors {
            reviews: reviews_color(positive_reviews_pct),
            risk: manipulation_risk.color(),
        },
    }
}

pub fn reliability_score(char_len: usize, verdict: PrecisionVerdict) -> u8 {
    let bonus =
        if verdict.is_precise() { RELIABILITY_PRECISE_BONUS } else { RELIABILITY_GENERIC_BONUS };
    let length_bonus = ((char_len / 10) as f64).min(RELIABILITY_LENGTH_BONUS_CAP);
    let (min, max) = RELIABILITY_RANGE;
    clamp_score(RELIABILITY_BASE + bonus + length_bonus, min, max)
}

pub fn positive_reviews_pct(verdict: PrecisionVerdict) -> u8 {
    let bonus = if verdict.is_precise() {
        POSITIVE_REVIEWS_PRECISE_BONUS
    } else {
        POSITIVE_REVIEWS_GENERIC_BONUS
    };
    let (min, max) = POSITIVE_REVIEWS_RANGE;
    clamp_score(POSITIVE_REVIEWS_BASE + bonus, min, max)
}

/// Short queries are high risk whatever the verdict.
pub fn manipulation_risk(char_len: usize, verdict: PrecisionVerdict) -> ManipulationRisk {
    if char_len < SHORT_QUERY_CHARS {
        ManipulationRisk::High
    } else if verdict.is_precise() {
        ManipulationRisk::Low
    } else {
        ManipulationRisk::Moderate
    }
}

pub fn review_signal(positive_reviews_pct: u8) -> ReviewSignal {
    if positive_reviews_pct >= STRONG_REVIEWS_PCT {
        ReviewSignal::Strong
    } else if positive_reviews_pct >= MEDIUM_REVIEWS_PCT {
        ReviewSignal::Medium
    } else {
        ReviewSignal::Weak
    }
}

pub fn reviews_color(positive_reviews_pct: u8) -> SignalColor {
    if positive_reviews_pct >= STRONG_REVIEWS_PCT {
        SignalColor::Green
    } else if positive_reviews_pct >= MEDIUM_REVIEWS_PCT {
        SignalColor::Orange
    } else {
        SignalColor::Red
    }
}

/// Saturates `value` into `[min, max]`. NaN lands on `min`, infinities on the
/// matching bound; fractional values truncate toward the lower integer.
pub fn clamp_score(value: f64, min: u8, max: u8) -> u8 {
    if value.is_nan() {
        return min;
    }
    value.clamp(f64::from(min), f64::from(max)) as u8
}
