//! Shared test utilities for `regionseg-core`.

use std::env;

use proptest::test_runner::Config as ProptestConfig;

/// Environment variable overriding the number of cases per property.
const PROPTEST_CASES_ENV_KEY: &str = "PROPTEST_CASES";

/// Builds the proptest configuration shared by every property suite.
///
/// `PROPTEST_CASES` overrides `default_cases`; unparsable or zero values are
/// ignored with a warning.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    ProptestConfig {
        cases: read_cases(default_cases),
        ..ProptestConfig::default()
    }
}

fn read_cases(default_cases: u32) -> u32 {
    let Ok(raw) = env::var(PROPTEST_CASES_ENV_KEY) else {
        return default_cases;
    };
    match parse_cases(&raw) {
        Ok(cases) => cases,
        Err(reason) => {
            tracing::warn!(
                env = PROPTEST_CASES_ENV_KEY,
                raw = %raw,
                reason = %reason,
                "invalid property-test case override; using default",
            );
            default_cases
        }
    }
}

fn parse_cases(raw: &str) -> Result<u32, String> {
    let parsed = raw
        .trim()
        .parse::<u32>()
        .map_err(|error| format!("parse error: {error}"))?;
    if parsed == 0 {
        return Err("cases must be > 0".to_string());
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::plain("64", Ok(64))]
    #[case::padded(" 12 ", Ok(12))]
    #[case::zero("0", Err(()))]
    #[case::garbage("many", Err(()))]
    fn parses_case_overrides(#[case] raw: &str, #[case] expected: Result<u32, ()>) {
        assert_eq!(parse_cases(raw).map_err(|_| ()), expected);
    }
}
