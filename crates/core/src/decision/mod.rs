//! Query classification and deterministic scoring.
//!
//! A decision is a pure function of the query string: the classifier decides
//! whether the query names a specific model, and the scorer derives a seeded
//! price and bounded trust metrics from the verdict and the query characters.

pub mod classifier;
pub mod scorer;

use serde::Serialize;

use crate::domain::decision::{DecisionResult, ManipulationRisk, PrecisionVerdict, TrustMetrics};
use crate::domain::query::Query;
use crate::errors::DecisionError;

use self::{
    classifier::{DeterministicClassifier, PrecisionSignals, QueryClassifier},
    scorer::{query_seed, DecisionScorer, DeterministicScorer},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decision {
    pub query: Query,
    pub verdict: PrecisionVerdict,
    pub signals: PrecisionSignals,
    pub seed: u128,
    pub result: DecisionResult,
    pub trust: TrustMetrics,
}

impl Decision {
    pub fn confidence_score(&self) -> u8 {
        self.trust.reliability_score
    }

    pub fn trusted_environment(&self) -> &'static str {
        match self.trust.manipulation_risk {
            ManipulationRisk::High => "Unverified",
            ManipulationRisk::Low | ManipulationRisk::Moderate => "Trusted",
        }
    }

    pub fn payload(&self) -> DecisionPayload<'_> {
        DecisionPayload {
            ok: true,
            query: self.query.as_str(),
            precision: self.verdict,
            decision_status: &self.result.decision_status,
            confidence_score: self.confidence_score(),
            price_positioning: &self.result.price_positioning,
            manipulation_risk: self.trust.manipulation_risk,
            trusted_environment: self.trusted_environment(),
            decision: &self.result,
            trust: &self.trust,
        }
    }
}

/// Wire envelope shared by the HTTP endpoint and `fyndy decide`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionPayload<'a> {
    pub ok: bool,
    pub query: &'a str,
    pub precision: PrecisionVerdict,
    pub decision_status: &'a str,
    pub confidence_score: u8,
    pub price_positioning: &'a str,
    pub manipulation_risk: ManipulationRisk,
    pub trusted_environment: &'a str,
    pub decision: &'a DecisionResult,
    pub trust: &'a TrustMetrics,
}

pub trait DecisionEngine: Send + Sync {
    fn decide(&self, raw_query: &str) -> Result<Decision, DecisionError>;
}

pub struct DeterministicDecisionEngine<C, S> {
    classifier: C,
    scorer: S,
}

impl<C, S> DeterministicDecisionEngine<C, S> {
    pub fn new(classifier: C, scorer: S) -> Self {
        Self { classifier, scorer }
    }
}

impl Default for DeterministicDecisionEngine<DeterministicClassifier, DeterministicScorer> {
    fn default() -> Self {
        Self::new(DeterministicClassifier, DeterministicScorer)
    }
}

impl<C, S> DecisionEngine for DeterministicDecisionEngine<C, S>
where
    C: QueryClassifier,
    S: DecisionScorer,
{
    fn decide(&self, raw_query: &str) -> Result<Decision, DecisionError> {
        let query = Query::parse(raw_query)?;
        let signals = self.classifier.signals(query.as_str());
        let verdict = signals.verdict();
        let (result, trust) = self.scorer.score(query.as_str(), verdict)?;
        let seed = query_seed(query.as_str());

        Ok(Decision { query, verdict, signals, seed, result, trust })
    }
}

pub fn decide(raw_query: &str) -> Result<Decision, DecisionError> {
    DeterministicDecisionEngine::default().decide(raw_query)
}
