use super::*;

fn charset() -> Charset {
    Charset::new("#*").unwrap()
}

#[test]
fn empty_charset_is_rejected() {
    assert!(Charset::new("").is_err());
}

#[test]
fn builtin_pick_is_deterministic() {
    assert_eq!(Charset::pick_builtin(3), Charset::pick_builtin(3));
}

#[test]
fn reveal_hits_exact_target_at_end() {
    let s = ScrambleText::new("", "Hello", 1, 0.05);
    assert_eq!(s.render(0.0, 0.0, &charset()), "");
    assert_eq!(s.render(1.0, 0.0, &charset()), "Hello");
    assert_eq!(s.render(5.0, 0.0, &charset()), "Hello");
}

#[test]
fn reveal_grows_prefix_and_length() {
    let cs = charset();
    let s = ScrambleText::new("", "abcdefghij", 9, 0.05);
    let mid = s.render(0.5, 0.3, &cs);
    assert_eq!(mid.chars().count(), 5);
    assert!(mid.starts_with("abcde"));

    let early = s.render(0.25, 0.3, &cs);
    let chars: Vec<char> = early.chars().collect();
    assert_eq!(chars.len(), 3); // round(2.5)
    assert_eq!(&chars[..2], &['a', 'b']);
    assert!(cs.contains(chars[2]));
}

#[test]
fn hide_shrinks_to_empty_with_noise_only() {
    let cs = charset();
    let s = ScrambleText::new("Works", "", 2, 0.05);
    let mid = s.render(0.4, 0.1, &cs);
    assert_eq!(mid.chars().count(), 3);
    assert!(mid.chars().all(|c| cs.contains(c)));
    assert_eq!(s.render(1.0, 0.1, &cs), "");
}

#[test]
fn glyphs_reroll_per_bucket_but_are_stable_within_one() {
    let cs = Charset::new("0123456789abcdef").unwrap();
    let s = ScrambleText::new("zzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzz", "", 5, 0.1);
    let a = s.render(0.01, 0.11, &cs);
    let b = s.render(0.01, 0.19, &cs);
    let c = s.render(0.01, 0.31, &cs);
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn multibyte_glyphs_count_as_single_characters() {
    let cs = Charset::new("🔴🟡").unwrap();
    let s = ScrambleText::new("", "ab", 4, 0.05);
    let out = s.render(0.5, 0.0, &cs);
    assert_eq!(out.chars().count(), 1);
    assert_eq!(out, "a");
}
