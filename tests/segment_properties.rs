//! Whole-engine properties of the diary segmenter, checked over a set of
//! hand-written OCR samples.

use diary_harness::date::resolve_date;
use diary_harness::segment::segment_diary_text;

const SAMPLES: &[&str] = &[
    "",
    "   \n\n\t",
    "just some prose with no date",
    "Jan 1\nWoke up early.\n\nJan 2\nFelt good.",
    "Jan 1\nJan 2",
    "Jan 1\n\nJan 2\nBody",
    "preface line\n\n  indented preface\n3/4/2024\nbody one\n\n\nbody two\n03-05-24\r\nbody three\r\n",
    "March 4, 2024\nOn March 5 I went out.\nMarch 5, 2024\n13/40/2024 is not a date\n",
    "\n\n\nSept 9, 2023\n\n\n",
    "Dec 31st 1999\nparty\nJanuary 1st, 2000\nhangover\nfeb 2 2000\ngroundhog",
];

/// Non-blank content lines of the input, trimmed, in order.
fn content_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

#[test]
fn test_indices_are_contiguous() {
    for sample in SAMPLES {
        let segments = segment_diary_text(sample, Some("2024-01-01"));
        for (i, s) in segments.iter().enumerate() {
            assert_eq!(s.index, i as i64, "sample {:?}", sample);
        }
    }
}

#[test]
fn test_every_content_line_lands_in_exactly_one_segment_in_order() {
    for sample in SAMPLES {
        let segments = segment_diary_text(sample, None);
        let emitted: Vec<String> = segments
            .iter()
            .flat_map(|s| content_lines(&s.text))
            .collect();
        assert_eq!(emitted, content_lines(sample), "sample {:?}", sample);
    }
}

#[test]
fn test_segment_text_is_trimmed_and_non_empty() {
    for sample in SAMPLES {
        for s in segment_diary_text(sample, None) {
            assert!(!s.text.is_empty(), "sample {:?}", sample);
            assert_eq!(s.text, s.text.trim(), "sample {:?}", sample);
        }
    }
}

#[test]
fn test_non_blank_input_always_yields_a_segment() {
    for sample in SAMPLES {
        let segments = segment_diary_text(sample, None);
        assert_eq!(
            segments.is_empty(),
            sample.trim().is_empty(),
            "sample {:?}",
            sample
        );
    }
}

#[test]
fn test_segments_opened_by_headers_start_with_the_header() {
    for sample in SAMPLES {
        let segments = segment_diary_text(sample, Some("2024-01-01"));
        for s in &segments {
            let first = s.text.lines().next().unwrap_or_default();
            if let Some(date) = resolve_date(first, Some(2024)) {
                assert_eq!(s.date.as_deref(), Some(date.as_str()), "sample {:?}", sample);
            } else {
                assert_eq!(s.index, 0, "only a prologue may lack a header: {:?}", sample);
                assert_eq!(s.date.as_deref(), Some("2024-01-01"));
            }
        }
    }
}

#[test]
fn test_mixed_notations() {
    let segments = segment_diary_text(SAMPLES[9], None);
    let dates: Vec<&str> = segments.iter().filter_map(|s| s.date.as_deref()).collect();
    assert_eq!(dates, vec!["1999-12-31", "2000-01-01", "2000-02-02"]);
}

#[test]
fn test_concurrent_calls_agree() {
    let expected: Vec<_> = SAMPLES
        .iter()
        .map(|s| segment_diary_text(s, Some("2024-01-01")))
        .collect();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            std::thread::spawn(|| {
                SAMPLES
                    .iter()
                    .map(|s| segment_diary_text(s, Some("2024-01-01")))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
