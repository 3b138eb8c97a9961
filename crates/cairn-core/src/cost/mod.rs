//! Execution cost extraction from raw command output.
//!
//! The assistant's transcript is free-form text; the engine recovers
//! token/cost/model metadata from it with independent patterns, each
//! applied against the whole text. Later status lines in a long
//! transcript supersede earlier ones, so the **last** match of every
//! pattern wins. Extraction never fails: a field whose pattern does not
//! match defaults to zero/empty, leaving a mostly-empty record stamped
//! with the current time.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::ExecutionCostData;

/// Model announcement, e.g. `Model: gpt-4 with diff edit format` or
/// `Main model: claude-3-opus`.
static MODEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^\s*(?:main\s+)?model:\s*([^\s,]+)").expect("model regex"));

/// Token usage line, long form (`7,245 sent`) or short form (`7.2k sent`),
/// with either `.` or `,` as the decimal separator.
static TOKENS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)tokens:\s*([0-9][0-9.,]*\s*k?)\s*sent\s*,\s*([0-9][0-9.,]*\s*k?)\s*received")
        .expect("tokens regex")
});

/// Cost line, e.g. `Cost: $0.0034 message, $0.0156 session`.
static COST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)cost:\s*\$\s*([0-9][0-9.,]*)\s*message\s*,\s*\$\s*([0-9][0-9.,]*)\s*session")
        .expect("cost regex")
});

/// Optional structured summary block emitted by the assistant.
static SUMMARY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<summary>(.*?)</summary>").expect("summary regex"));

/// Extracts a best-effort cost record from raw output text.
pub fn extract_cost_data(output: &str) -> ExecutionCostData {
    let mut data = ExecutionCostData::empty_now();

    if let Some(caps) = MODEL_RE.captures_iter(output).last() {
        data.model = caps[1].to_string();
    }
    if let Some(caps) = TOKENS_RE.captures_iter(output).last() {
        data.tokens_sent = parse_token_count(&caps[1]);
        data.tokens_received = parse_token_count(&caps[2]);
    }
    if let Some(caps) = COST_RE.captures_iter(output).last() {
        data.message_cost = parse_decimal(&caps[1]);
        data.session_cost = parse_decimal(&caps[2]);
    }
    if let Some(caps) = SUMMARY_RE.captures_iter(output).last() {
        data.summary = caps[1].trim().to_string();
    }

    data
}

/// Parses a token count in any of the observed notations: `7200`,
/// `7,245` (grouped), `7.2k`, `7,2k` (comma decimal).
pub fn parse_token_count(raw: &str) -> u64 {
    let trimmed = raw.trim();
    if trimmed.ends_with('k') || trimmed.ends_with('K') {
        // With the k suffix the separator is a decimal point in either
        // locale convention.
        (parse_decimal(&trimmed[..trimmed.len() - 1]) * 1000.0).round() as u64
    } else {
        // Without it, separators only group digits.
        trimmed
            .chars()
            .filter(char::is_ascii_digit)
            .collect::<String>()
            .parse()
            .unwrap_or(0)
    }
}

/// Parses a decimal number accepting `,` as the decimal separator.
pub fn parse_decimal(raw: &str) -> f64 {
    raw.trim().replace(',', ".").parse().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token_count_notations() {
        assert_eq!(parse_token_count("7200"), 7200);
        assert_eq!(parse_token_count("7,245"), 7245);
        assert_eq!(parse_token_count("7.2k"), 7200);
        assert_eq!(parse_token_count("7,2k"), 7200);
        assert_eq!(parse_token_count("12K"), 12000);
        assert_eq!(parse_token_count("garbage"), 0);
    }

    #[test]
    fn test_extract_full_status_block() {
        let output = "\
Model: gpt-4 with diff edit format
...lots of transcript...
Tokens: 7.2k sent, 1.3k received.
Cost: $0.0034 message, $0.0156 session.
";
        let data = extract_cost_data(output);

        assert_eq!(data.model, "gpt-4");
        assert_eq!(data.tokens_sent, 7200);
        assert_eq!(data.tokens_received, 1300);
        assert!((data.message_cost - 0.0034).abs() < 1e-9);
        assert!((data.session_cost - 0.0156).abs() < 1e-9);
    }

    #[test]
    fn test_last_occurrence_wins() {
        let output = "\
Tokens: 1.0k sent, 0.5k received.
Cost: $0.01 message, $0.01 session.
Tokens: 7.2k sent, 1.3k received.
Cost: $0.02 message, $0.03 session.
";
        let data = extract_cost_data(output);

        assert_eq!(data.tokens_sent, 7200);
        assert_eq!(data.tokens_received, 1300);
        assert!((data.session_cost - 0.03).abs() < 1e-9);
    }

    #[test]
    fn test_comma_decimal_notation() {
        let data = extract_cost_data("Tokens: 7,2k sent, 1,3k received.");
        assert_eq!(data.tokens_sent, 7200);
        assert_eq!(data.tokens_received, 1300);
    }

    #[test]
    fn test_long_form_token_counts() {
        let data = extract_cost_data("Tokens: 7,245 sent, 1,300 received.");
        assert_eq!(data.tokens_sent, 7245);
        assert_eq!(data.tokens_received, 1300);
    }

    #[test]
    fn test_summary_block() {
        let output = "noise\n<summary>Implemented the parser\nand tests.</summary>\nmore noise";
        let data = extract_cost_data(output);
        assert_eq!(data.summary, "Implemented the parser\nand tests.");
    }

    #[test]
    fn test_extraction_never_fails() {
        let data = extract_cost_data("no recognizable status lines here");

        assert_eq!(data.model, "");
        assert_eq!(data.tokens_sent, 0);
        assert_eq!(data.tokens_received, 0);
        assert_eq!(data.message_cost, 0.0);
        assert_eq!(data.summary, "");
    }

    #[test]
    fn test_main_model_announcement() {
        let data = extract_cost_data("Main model: claude-3-opus, weak model: haiku");
        assert_eq!(data.model, "claude-3-opus");
    }
}
