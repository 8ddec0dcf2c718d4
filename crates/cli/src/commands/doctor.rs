use std::net::ToSocketAddrs;

use fyndy_core::config::{AppConfig, LoadOptions};
use fyndy_core::{decide, DecisionError, PrecisionVerdict};
use serde::Serialize;

use crate::commands::CommandResult;

const SELF_TEST_QUERY: &str = "Grohe S240";
const SELF_TEST_PRICE: u32 = 115;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> CommandResult {
    let report = build_report();
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { 1 };

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_bind_address(&config));
            checks.push(check_access_control(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            for name in ["bind_address", "access_control"] {
                checks.push(DoctorCheck {
                    name,
                    status: CheckStatus::Skipped,
                    details: "skipped because configuration did not load".to_string(),
                });
            }
        }
    }
    checks.push(check_engine());

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_bind_address(config: &AppConfig) -> DoctorCheck {
    let target = config.bind_target();
    match target.to_socket_addrs().map(|mut addrs| addrs.next()) {
        Ok(Some(addr)) => DoctorCheck {
            name: "bind_address",
            status: CheckStatus::Pass,
            details: format!("`{target}` resolves to {addr}"),
        },
        Ok(None) => DoctorCheck {
            name: "bind_address",
            status: CheckStatus::Fail,
            details: format!("`{target}` did not resolve to any address"),
        },
        Err(error) => DoctorCheck {
            name: "bind_address",
            status: CheckStatus::Fail,
            details: format!("`{target}` is not a usable bind address: {error}"),
        },
    }
}

fn check_access_control(config: &AppConfig) -> DoctorCheck {
    let details = if config.access.is_enforced() {
        "api key required via `x-api-key` header or `?key=` parameter"
    } else {
        "open: no api key configured, every request is accepted"
    };
    DoctorCheck { name: "access_control", status: CheckStatus::Pass, details: details.to_string() }
}

fn check_engine() -> DoctorCheck {
    let sample = decide(SELF_TEST_QUERY);
    let blank = decide("   ");

    let failure = match (&sample, &blank) {
        (Err(error), _) => Some(format!("`{SELF_TEST_QUERY}` failed to score: {error}")),
        (Ok(decision), _) if decision.verdict != PrecisionVerdict::Precise => {
            Some(format!("`{SELF_TEST_QUERY}` was not classified as precise"))
        }
        (Ok(decision), _) if decision.result.price != SELF_TEST_PRICE => Some(format!(
            "`{SELF_TEST_QUERY}` priced at {} instead of {SELF_TEST_PRICE}",
            decision.result.price
        )),
        (_, Err(DecisionError::InvalidInput)) => None,
        (_, Ok(_)) => Some("blank query was scored instead of rejected".to_string()),
    };

    match failure {
        None => DoctorCheck {
            name: "engine_self_test",
            status: CheckStatus::Pass,
            details: format!("`{SELF_TEST_QUERY}` -> precise at {SELF_TEST_PRICE}€"),
        },
        Some(details) => {
            DoctorCheck { name: "engine_self_test", status: CheckStatus::Fail, details }
        }
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
