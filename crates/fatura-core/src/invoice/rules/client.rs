//! Client number extraction.

use tracing::debug;

use regex::Regex;
use super::patterns::{
    CLIENT_AND_INSTALLATION, CLIENT_NUMBER_BARE, CLIENT_NUMBER_LABELED, CLIENT_NUMBER_SHORT,
    CLIENT_NUMBER_STANDALONE,
};
use super::{first_match, Rule};

/// Client number rules, most specific first.
pub const CLIENT_NUMBER_RULES: &[Rule] = &[
    Rule::new("client_and_installation", client_and_installation),
    Rule::new("client_labeled", client_labeled),
    Rule::new("client_bare", client_bare),
    Rule::new("client_short", client_short),
    Rule::new("standalone_digits", standalone_digits),
];

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text).map(|caps| caps[1].trim().to_string())
}

fn client_and_installation(text: &str) -> Option<String> {
    capture(&CLIENT_AND_INSTALLATION, text)
}

fn client_labeled(text: &str) -> Option<String> {
    capture(&CLIENT_NUMBER_LABELED, text)
}

fn client_bare(text: &str) -> Option<String> {
    capture(&CLIENT_NUMBER_BARE, text)
}

fn client_short(text: &str) -> Option<String> {
    capture(&CLIENT_NUMBER_SHORT, text)
}

fn standalone_digits(text: &str) -> Option<String> {
    capture(&CLIENT_NUMBER_STANDALONE, text)
}

/// Extract the client number, trying each rule in order.
pub fn extract_client_number(text: &str) -> Option<String> {
    let found = first_match(CLIENT_NUMBER_RULES, text)?;
    debug!("Client number {} matched by {}", found.value, found.rule);
    Some(found.value)
}
