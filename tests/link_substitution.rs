use link_swap_bot::links::{LinkCategory, LinkReplacer, PatternError, PatternTable};

const CANONICAL: &str = "https://safe.example/go";

fn replacer() -> LinkReplacer {
    match LinkReplacer::new(CANONICAL) {
        Ok(r) => r,
        Err(e) => panic!("replacer failed to build: {e}"),
    }
}

#[test]
fn protocol_url_is_replaced() {
    let result = replacer().substitute("Check http://evil.com/x now");
    assert_eq!(result.text, "Check https://safe.example/go now");
    assert_eq!(result.replacements, 1);
}

#[test]
fn email_is_one_replacement() {
    let result = replacer().substitute("contact a@b.com please");
    assert_eq!(result.text, "contact https://safe.example/go please");
    assert_eq!(result.replacements, 1);
}

#[test]
fn shortener_that_is_also_a_domain_is_replaced_once() {
    let result = replacer().substitute("bit.ly/abc");
    assert_eq!(result.text, CANONICAL);
    assert_eq!(result.replacements, 1);
}

#[test]
fn text_holding_only_the_canonical_link_is_unchanged() {
    for text in [
        CANONICAL.to_string(),
        format!("Visit {CANONICAL} today!"),
        format!("({CANONICAL}), {CANONICAL}."),
    ] {
        let result = replacer().substitute(&text);
        assert_eq!(result.text, text);
        assert_eq!(result.replacements, 0);
    }
}

#[test]
fn sentence_punctuation_stays_outside_the_link() {
    let result = replacer().substitute("Read www.example.com/docs, then ask me@example.org.");
    assert_eq!(
        result.text,
        "Read https://safe.example/go, then ask https://safe.example/go."
    );
    assert_eq!(result.replacements, 2);
}

#[test]
fn multiline_text_keeps_its_layout() {
    let text = "line one: t.me/somechannel\n\nline two: nothing\nline three: shop.store";
    let result = replacer().substitute(text);
    assert_eq!(
        result.text,
        "line one: https://safe.example/go\n\nline two: nothing\nline three: https://safe.example/go"
    );
}

#[test]
fn non_ascii_text_around_links() {
    let result = replacer().substitute("Смотри 👉 https://пример.рф/путь и example.com");
    assert_eq!(result.replacements, 2);
    assert!(result.text.starts_with("Смотри 👉 https://safe.example/go"));
    assert!(result.text.ends_with("и https://safe.example/go"));
}

#[test]
fn custom_table_restricts_known_categories() -> Result<(), PatternError> {
    let table = PatternTable::with_tables(&["zz"], &["sho.rt"], &["chat.to"])?;
    let replacer = LinkReplacer::with_table(table, CANONICAL);
    let found: Vec<_> = replacer
        .find_links("go sho.rt/abc")
        .into_iter()
        .map(|m| m.category)
        .collect();
    assert_eq!(found, vec![LinkCategory::Shortener]);
    Ok(())
}

#[test]
fn empty_tables_are_rejected() {
    assert!(matches!(
        PatternTable::with_tables(&[], &["bit.ly"], &["t.me"]),
        Err(PatternError::EmptyTable(LinkCategory::KnownSuffix))
    ));
}

#[test]
fn bare_host_tails_are_part_of_the_link() {
    let r = replacer();
    for (text, expected) in [
        (
            "admin at example.com:8080/admin now",
            "admin at https://safe.example/go now",
        ),
        ("see example.com?ref=abc now", "see https://safe.example/go now"),
        ("see example.com#top now", "see https://safe.example/go now"),
        ("mail a@b.com/x now", "mail https://safe.example/go now"),
    ] {
        let first = r.substitute(text);
        assert_eq!(first.text, expected, "input: {text}");
        assert_eq!(first.replacements, 1, "input: {text}");

        let second = r.substitute(&first.text);
        assert_eq!(second.replacements, 0, "second pass over: {}", first.text);
    }
}

#[test]
fn word_glued_to_a_scheme_is_not_a_separate_link() {
    let r = replacer();
    let first = r.substitute("word.https://evil.com/x now");
    assert_eq!(first.text, "word.https://safe.example/go now");
    assert_eq!(first.replacements, 1);

    let second = r.substitute(&first.text);
    assert_eq!(second.replacements, 0);
    assert_eq!(second.text, first.text);
}
