use super::*;
use crate::scroll::document::MemoryDocument;

fn doc() -> MemoryDocument {
    MemoryDocument::new().with_section("works-info", &["Alpha", "Beta", "Gamma"])
}

fn charset() -> Charset {
    Charset::new("#").unwrap()
}

#[test]
fn missing_or_empty_sections_are_not_registered() {
    let d = doc().with_section("empty", &[]);
    assert!(SectionText::register(&d, "nowhere").is_none());
    assert!(SectionText::register(&d, "empty").is_none());
    let s = SectionText::register(&d, "works-info").unwrap();
    assert_eq!(s.originals(), &["Alpha", "Beta", "Gamma"]);
}

#[test]
fn hide_peels_from_the_last_element() {
    let mut d = doc();
    let cfg = TextConfig::default();
    let mut s = SectionText::register(&d, "works-info").unwrap();
    s.restart_hide(&mut d, &cfg, 1);
    // The last element starts immediately, the first one `hide_stagger_total_secs` later.
    s.tick(0.01, &mut d, &charset());
    let texts = d.section_texts("works-info");
    assert_eq!(texts[0], "Alpha");
    assert_ne!(texts[2], "Gamma");

    s.tick(5.0, &mut d, &charset());
    assert_eq!(d.section_texts("works-info"), vec!["", "", ""]);
    assert!(!d.is_visible("works-info"));
    assert_eq!(s.running(), None);
}

#[test]
fn reveal_staggers_forward_and_restores_originals() {
    let mut d = doc();
    let cfg = TextConfig::default();
    let mut s = SectionText::register(&d, "works-info").unwrap();
    s.clear(&mut d);
    assert!(!d.is_visible("works-info"));

    s.restart_reveal(&mut d, &cfg, 2);
    assert!(d.is_visible("works-info"));
    s.tick(0.02, &mut d, &charset());
    let texts = d.section_texts("works-info");
    assert_eq!(texts[2], "", "third element has not started yet");

    s.tick(5.0, &mut d, &charset());
    assert_eq!(d.section_texts("works-info"), vec!["Alpha", "Beta", "Gamma"]);
    assert!(d.is_visible("works-info"));
}

#[test]
fn restart_discards_the_opposite_run() {
    let mut d = doc();
    let cfg = TextConfig::default();
    let mut s = SectionText::register(&d, "works-info").unwrap();
    s.restart_hide(&mut d, &cfg, 3);
    s.tick(0.3, &mut d, &charset());
    s.restart_reveal(&mut d, &cfg, 4);
    assert_eq!(s.running(), Some(RunKind::Reveal));
    s.tick(5.0, &mut d, &charset());
    assert_eq!(d.section_texts("works-info"), vec!["Alpha", "Beta", "Gamma"]);
    assert!(d.is_visible("works-info"));
}

#[test]
fn run_total_time_includes_stagger() {
    let d = doc();
    let cfg = TextConfig::default();
    let targets = [
        TextTarget::Element(ElementId(0)),
        TextTarget::Element(ElementId(1)),
    ];
    let hide = TextRun::hide(&d, &targets, 0.65, 0.035, &cfg, 0);
    assert!((hide.total_secs() - 0.685).abs() < 1e-9);
    let reveal = TextRun::reveal(
        &d,
        &[(TextTarget::Label, "About".to_owned())],
        0.6,
        0.035,
        &cfg,
        0,
    );
    assert!((reveal.total_secs() - 0.6).abs() < 1e-9);
}
