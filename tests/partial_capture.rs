use rust_lease_compare::{
    Comparator, CompareConfig, TemplateVariant, clean, containment, jaccard, normalize, shingle,
};

/// Hangul text with almost no repeated 3-grams.
fn reference_text(chars: usize) -> String {
    let mut out = String::new();
    for i in 0..chars {
        let offset = (i as u32 * 7919) % 11172;
        out.push(char::from_u32(0xAC00 + offset).unwrap());
        if i % 23 == 22 {
            out.push('\n');
        }
    }
    out
}

fn prefix_chars(text: &str, n: usize) -> String {
    text.chars().take(n).collect()
}

#[test]
fn prefix_capture_scores() {
    let reference = reference_text(1000);
    assert!(normalize(&reference).chars().count() >= 500);

    // 60% of the document photographed, the rest never captured
    let normalized_len = normalize(&reference).chars().count();
    let mut actual = String::new();
    let mut kept = 0;
    for c in reference.chars() {
        if kept == normalized_len * 6 / 10 {
            break;
        }
        actual.push(c);
        if c != '\n' {
            kept += 1;
        }
    }

    let result = Comparator::default().compare(&actual, &reference, 1);
    let sim = result.similarity.unwrap();

    assert!(sim.actual_in_reference > 0.99, "forward {}", sim.actual_in_reference);
    assert!((sim.reference_in_actual - 0.6).abs() < 0.02, "reverse {}", sim.reference_in_actual);
    assert!(sim.jaccard <= sim.actual_in_reference);
    assert!(sim.jaccard >= sim.reference_in_actual - 1e-9);
    assert!(sim.jaccard < 0.7);
}

#[test]
fn noisy_partial_capture_ranks_scores() {
    let reference = reference_text(600);
    let mut actual = prefix_chars(&reference, 400);
    actual.push_str("\n아무 관계 없는 광고 문구와 워터마크 텍스트 zzqx 9981");

    let a = shingle(&clean(&actual), 3);
    let r = shingle(&reference, 3);
    let forward = containment(&a, &r);
    let reverse = containment(&r, &a);
    let sym = jaccard(&a, &r);
    assert!(forward > 0.9, "forward {forward}");
    assert!(reverse < forward);
    assert!(sym < forward);
    assert!(sym <= reverse);
}

#[test]
fn short_texts_are_never_errors() {
    for s in ["", "가", "가나", " . "] {
        assert!(shingle(s, 3).is_empty());
    }
    let empty = shingle("", 3);
    assert_eq!(jaccard(&empty, &empty), 1.0);
    assert_eq!(containment(&empty, &shingle("임대차계약", 3)), 0.0);
}

#[test]
fn configured_width_changes_scores() {
    let config = CompareConfig {
        shingle_width: 5,
        ..Default::default()
    };
    let comparator = Comparator::new(&config).unwrap();
    let result = comparator.compare("임대차 계약", "임대차계약서", 1);
    // 5-grams: "임대차계약" only on the capture side
    let sim = result.similarity.unwrap();
    assert_eq!(sim.actual_in_reference, 1.0);
    assert_eq!(sim.reference_in_actual, 0.5);
    assert_eq!(result.variant, TemplateVariant::Unknown);
}
