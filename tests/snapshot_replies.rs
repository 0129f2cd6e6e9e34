use insta::assert_snapshot;
use link_swap_bot::bot::handlers::{help_text, start_text, status_text};

const CANONICAL: &str = "https://safe.example/go";

#[test]
fn test_start_reply_snapshot() {
    assert_snapshot!("start_reply", start_text(CANONICAL));
}

#[test]
fn test_help_reply_snapshot() {
    assert_snapshot!("help_reply", help_text());
}

#[test]
fn test_status_reply_snapshot() {
    assert_snapshot!("status_reply", status_text(CANONICAL, Some(2)));
}
