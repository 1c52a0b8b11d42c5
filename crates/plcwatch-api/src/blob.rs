// Status blob parsing
//
// The device dumps its internal counters and config as newline-delimited
// `KEY=VALUE` text. The protocol is undocumented and unversioned, so the
// parser is deliberately permissive: unknown keys are kept, malformed
// lines are skipped, and all values stay strings until a typed accessor
// is asked for one.

use std::collections::HashMap;

/// Flat mapping of protocol keys to raw string values, produced fresh on
/// every successful status fetch and superseded (never merged) on refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusBlob {
    entries: HashMap<String, String>,
}

impl StatusBlob {
    /// Parse a raw status payload.
    ///
    /// Each line is split on the first `=`. Lines without a separator or
    /// with an empty key are skipped without error. Duplicate keys:
    /// last occurrence wins.
    pub fn parse(raw: &str) -> Self {
        let mut entries = HashMap::new();

        for line in raw.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            entries.insert(key.to_owned(), value.trim().to_owned());
        }

        Self { entries }
    }

    /// Raw string value for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Integer value, defaulting to 0 when the key is absent or the
    /// value does not parse. Parse anomalies are absorbed here; they are
    /// never surfaced as errors.
    pub fn u64_or_zero(&self, key: &str) -> u64 {
        self.get(key).and_then(|v| v.parse().ok()).unwrap_or(0)
    }

    /// Comma-separated integer list. A missing or empty field yields an
    /// empty list; an unparsable element becomes 0 so that positional
    /// alignment with sibling lists is preserved.
    pub fn u64_list(&self, key: &str) -> Vec<u64> {
        match self.get(key) {
            None | Some("") => Vec::new(),
            Some(raw) => raw
                .split(',')
                .map(|item| item.trim().parse().unwrap_or(0))
                .collect(),
        }
    }

    /// Comma-separated string list (e.g. MAC addresses). Missing or
    /// empty fields yield an empty list; blank elements are dropped.
    pub fn str_list(&self, key: &str) -> Vec<String> {
        match self.get(key) {
            None | Some("") => Vec::new(),
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(ToOwned::to_owned)
                .collect(),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all key/value pairs. No ordering guarantees.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_pairs() {
        let blob = StatusBlob::parse("A=1\nB=two\nC=3,4,5\n");

        assert_eq!(blob.len(), 3);
        assert_eq!(blob.get("A"), Some("1"));
        assert_eq!(blob.get("B"), Some("two"));
        assert_eq!(blob.get("C"), Some("3,4,5"));
    }

    #[test]
    fn splits_on_first_equals_only() {
        let blob = StatusBlob::parse("KEY=a=b=c");
        assert_eq!(blob.get("KEY"), Some("a=b=c"));
    }

    #[test]
    fn skips_malformed_and_empty_lines() {
        let blob = StatusBlob::parse("garbage line\n\nA=1\n=no-key\n");

        assert_eq!(blob.len(), 1);
        assert_eq!(blob.get("A"), Some("1"));
    }

    #[test]
    fn duplicate_keys_last_wins() {
        let blob = StatusBlob::parse("A=first\nB=1\nA=second");
        assert_eq!(blob.get("A"), Some("second"));
    }

    #[test]
    fn parse_is_idempotent_on_well_formed_input() {
        let raw = "SYSTEM.GENERAL.UPTIME=4242\nDIDMNG.GENERAL.DIDS=1,2,3\nCSRFTOKEN=abc\n";
        assert_eq!(StatusBlob::parse(raw), StatusBlob::parse(raw));
    }

    #[test]
    fn tolerates_crlf_line_endings() {
        let blob = StatusBlob::parse("A=1\r\nB=2\r\n");
        assert_eq!(blob.get("A"), Some("1"));
        assert_eq!(blob.get("B"), Some("2"));
    }

    #[test]
    fn u64_accessor_defaults_to_zero() {
        let blob = StatusBlob::parse("GOOD=17\nBAD=not-a-number");

        assert_eq!(blob.u64_or_zero("GOOD"), 17);
        assert_eq!(blob.u64_or_zero("BAD"), 0);
        assert_eq!(blob.u64_or_zero("MISSING"), 0);
    }

    #[test]
    fn u64_list_preserves_alignment_for_bad_elements() {
        let blob = StatusBlob::parse("RATES=10,junk,30");
        assert_eq!(blob.u64_list("RATES"), vec![10, 0, 30]);
    }

    #[test]
    fn lists_are_empty_when_missing_or_blank() {
        let blob = StatusBlob::parse("EMPTY=");

        assert!(blob.u64_list("EMPTY").is_empty());
        assert!(blob.u64_list("MISSING").is_empty());
        assert!(blob.str_list("EMPTY").is_empty());
        assert!(blob.str_list("MISSING").is_empty());
    }

    #[test]
    fn str_list_trims_elements() {
        let blob = StatusBlob::parse("MACS=aa:bb:cc:dd:ee:01, aa:bb:cc:dd:ee:02");
        assert_eq!(
            blob.str_list("MACS"),
            vec!["aa:bb:cc:dd:ee:01", "aa:bb:cc:dd:ee:02"]
        );
    }
}
