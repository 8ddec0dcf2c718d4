use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrecisionVerdict {
    Precise,
    Generic,
}

impl PrecisionVerdict {
    pub fn is_precise(self) -> bool {
        matches!(self, Self::Precise)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Precise => "precise",
            Self::Generic => "generic",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionType {
    BestPrice,
    BestValue,
}

/// Synthetic purchase recommendation attached to a query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionResult {
    #[serde(rename = "type")]
    pub kind: DecisionType,
    pub label: String,
    pub price: u32,
    pub currency: String,
    pub merchant: String,
    pub shipping: String,
    pub url: String,
    pub decision_status: String,
    pub price_positioning: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ManipulationRisk {
    Low,
    Moderate,
    High,
}

impl ManipulationRisk {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }

    pub fn color(self) -> SignalColor {
        match self {
            Self::Low => SignalColor::Green,
            Self::Moderate => SignalColor::Orange,
            Self::High => SignalColor::Red,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewSignal {
    Weak,
    Medium,
    Strong,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalColor {
    Green,
    Orange,
    Red,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustColors {
    pub reviews: SignalColor,
    pub risk: SignalColor,
}

/// Bounded reliability indicators attached to a decision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustMetrics {
    pub reliability_score: u8,
    pub positive_reviews_pct: u8,
    pub manipulation_risk: ManipulationRisk,
    pub review_signal: ReviewSignal,
    pub colors: TrustColors,
}

#[cfg(test)]
mod tests {
    use super::{
        DecisionResult, DecisionType, ManipulationRisk, PrecisionVerdict, ReviewSignal,
        SignalColor, TrustColors, TrustMetrics,
    };

    #[test]
    fn decision_result_serializes_with_wire_field_names() {
        let result = DecisionResult {
            kind: DecisionType::BestPrice,
            label: "Meilleur prix trouvé".to_string(),
            price: 258,
            currency: "€".to_string(),
            merchant: "Marchand certifié".to_string(),
            shipping: "Livraison 24-48h".to_string(),
            url: "https://example.com/search?q=S240".to_string(),
            decision_status: "Strong".to_string(),
            price_positioning: "Best price detected".to_string(),
        };

        let value = serde_json::to_value(&result).expect("serialize");
        assert_eq!(value["type"], "best_price");
        assert_eq!(value["decisionStatus"], "Strong");
        assert_eq!(value["pricePositioning"], "Best price detected");
        assert_eq!(value["price"], 258);
    }

    #[test]
    fn trust_metrics_serializes_colors_in_lowercase() {
        let metrics = TrustMetrics {
            reliability_score: 88,
            positive_reviews_pct: 95,
            manipulation_risk: ManipulationRisk::Low,
            review_signal: ReviewSignal::Strong,
            colors: TrustColors { reviews: SignalColor::Green, risk: SignalColor::Green },
        };

        let value = serde_json::to_value(&metrics).expect("serialize");
        assert_eq!(value["reliabilityScore"], 88);
        assert_eq!(value["positiveReviewsPct"], 95);
        assert_eq!(value["manipulationRisk"], "Low");
        assert_eq!(value["reviewSignal"], "Strong");
        assert_eq!(value["colors"]["reviews"], "green");
    }

    #[test]
    fn high_risk_is_always_red() {
        assert_eq!(ManipulationRisk::High.color(), SignalColor::Red);
        assert_eq!(ManipulationRisk::Moderate.color(), SignalColor::Orange);
        assert_eq!(PrecisionVerdict::Generic.as_str(), "generic");
    }
}
