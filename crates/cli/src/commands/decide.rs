use fyndy_core::{decide, Decision, DecisionError, PrecisionSignals};
use serde::Serialize;
use serde_json::Value;

use crate::commands::CommandResult;

#[derive(Debug, Serialize)]
struct Explanation {
    seed: String,
    char_len: usize,
    signals: PrecisionSignals,
}

pub fn run(raw_query: &str, explain: bool) -> CommandResult {
    match decide(raw_query) {
        Ok(decision) => render(&decision, explain),
        Err(error @ DecisionError::InvalidInput) => {
            CommandResult::failure("decide", "invalid_input", error.to_string(), 2)
        }
    }
}

fn render(decision: &Decision, explain: bool) -> CommandResult {
    let mut payload = match serde_json::to_value(decision.payload()) {
        Ok(payload) => payload,
        Err(error) => {
            return CommandResult::failure("decide", "serialization", error.to_string(), 1);
        }
    };

    if explain {
        let explanation = Explanation {
            // u128 does not survive every JSON consumer intact
            seed: decision.seed.to_string(),
            char_len: decision.query.char_len(),
            signals: decision.signals,
        };
        if let (Value::Object(fields), Ok(explanation)) =
            (&mut payload, serde_json::to_value(explanation))
        {
            fields.insert("explain".to_string(), explanation);
        }
    }

    match serde_json::to_string_pretty(&payload) {
        Ok(output) => CommandResult { exit_code: 0, output },
        Err(error) => CommandResult::failure("decide", "serialization", error.to_string(), 1),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::run;

    #[test]
    fn explain_reports_seed_and_signals() {
        let result = run("Grohe S240", true);
        assert_eq!(result.exit_code, 0);

        let payload: Value = serde_json::from_str(&result.output).expect("json output");
        assert_eq!(payload["explain"]["seed"], "3674");
        assert_eq!(payload["explain"]["char_len"], 10);
        assert_eq!(payload["explain"]["signals"]["model_code"], true);
        assert_eq!(payload["explain"]["signals"]["token_count"], false);
    }

    #[test]
    fn plain_output_omits_explanation() {
        let result = run("chaise", false);
        let payload: Value = serde_json::from_str(&result.output).expect("json output");
        assert!(payload.get("explain").is_none());
        assert_eq!(payload["precision"], "generic");
    }
}
