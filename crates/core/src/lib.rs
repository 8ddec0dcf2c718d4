pub mod config;
pub mod decision;
pub mod domain;
pub mod errors;

pub use decision::{
    classifier::{classify, DeterministicClassifier, PrecisionSignals, QueryClassifier},
    decide,
    scorer::{clamp_score, query_seed, score, DecisionScorer, DeterministicScorer},
    Decision, DecisionEngine, DecisionPayload, DeterministicDecisionEngine,
};
pub use domain::decision::{
    DecisionResult, DecisionType, ManipulationRisk, PrecisionVerdict, ReviewSignal, SignalColor,
    TrustColors, TrustMetrics,
};
pub use domain::query::Query;
pub use errors::{ApplicationError, DecisionError, InterfaceError};
