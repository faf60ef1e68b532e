use super::*;

const HEADER: &str = "Device;TC-20\nDate;2024-03-01\nEmissivity;0.95\n";

#[test]
fn extracts_rows_after_marker() {
    let f = extract("Image Data\n1.0;2.0;3.0\n4.0;5.0;6.0\n", 3).unwrap();
    assert_eq!(f.to_rows(), vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
    assert_eq!(f.stats().marker_line, Some(0));
    assert_eq!(f.stats().rows_kept, 2);
}

#[test]
fn header_lines_before_marker_are_ignored() {
    // Numeric-looking metadata before the marker must not leak into the frame.
    let text = format!("{HEADER}42;43;44\nImage Data;\n1;2;3\n");
    let f = extract(&text, 3).unwrap();
    assert_eq!(f.to_rows(), vec![vec![1.0, 2.0, 3.0]]);
}

#[test]
fn missing_marker_is_no_data() {
    let err = extract("1;2;3\n4;5;6\n", 3).unwrap_err();
    assert!(matches!(err, ThermaError::NoData(_)));
}

#[test]
fn all_non_numeric_is_no_data() {
    let err = extract("Image Data\na;b;c\n1;x;3\n", 3).unwrap_err();
    assert!(matches!(err, ThermaError::NoData(_)));
}

#[test]
fn crlf_blank_lines_and_empty_tokens_are_tolerated() {
    let text = "Image Data\r\n\r\n1;;2;3;\r\n  \r\n 4 ; 5 ;6\r\n";
    let f = extract(text, 3).unwrap();
    assert_eq!(f.to_rows(), vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
}

#[test]
fn token_lexing_rejects_signs_exponents_and_double_dots() {
    let text = "Image Data\n1;2;3\n-1;2;3\n1e3;2;3\n1.2.3;4;5\n+1;2;3\n.;1;2\n.5;1.;2\n";
    let f = extract(text, 3).unwrap();
    assert_eq!(f.to_rows(), vec![vec![1.0, 2.0, 3.0], vec![0.5, 1.0, 2.0]]);
    assert_eq!(f.stats().rows_non_numeric, 5);
}

#[test]
fn truncate_policy_keeps_expected_width() {
    let text = "Image Data\n1;2;3;4;5\n1;2\n6;7;8\n";
    let f = extract(text, 3).unwrap();
    assert!(f.iter_rows().all(|r| r.len() == 3));
    assert_eq!(f.to_rows(), vec![vec![1.0, 2.0, 3.0], vec![6.0, 7.0, 8.0]]);
    assert_eq!(f.stats().rows_wrong_width, 1);
}

#[test]
fn truncate_policy_with_only_short_rows_is_no_data() {
    let err = extract("Image Data\n1;2\n3;4\n", 3).unwrap_err();
    assert!(matches!(err, ThermaError::NoData(_)));
}

#[test]
fn pad_policy_fills_with_missing_not_zero() {
    let opts = ExtractOpts {
        expected_cols: 3,
        policy: RowWidthPolicy::PadMissing,
        ..Default::default()
    };
    let f = extract_with("Image Data\n1;2;3;9\n4;5\n", &opts).unwrap();
    assert_eq!(f.rows(), 2);
    assert_eq!(f.row(0), Some(&[1.0, 2.0, 3.0][..]));
    assert_eq!(f.get(1, 1), Some(5.0));
    assert!(f.get(1, 2).unwrap().is_nan());
    assert_eq!(f.stats().rows_padded, 1);
    assert_eq!(f.missing_count(), 1);
}

#[test]
fn majority_policy_keeps_most_common_width() {
    let opts = ExtractOpts {
        expected_cols: 0,
        policy: RowWidthPolicy::Majority,
        ..Default::default()
    };
    let text = "Image Data\n1;2;3;4\n5;6;7;8\n9;10\n11;12;13;14;15\n";
    let f = extract_with(text, &opts).unwrap();
    assert_eq!(f.cols(), 4);
    assert_eq!(f.rows(), 2);
    assert_eq!(f.stats().rows_wrong_width, 2);
}

#[test]
fn majority_policy_breaks_ties_toward_wider_rows() {
    let opts = ExtractOpts {
        policy: RowWidthPolicy::Majority,
        ..Default::default()
    };
    let f = extract_with("Image Data\n1;2\n3;4;5\n", &opts).unwrap();
    assert_eq!(f.to_rows(), vec![vec![3.0, 4.0, 5.0]]);
}

#[test]
fn zero_columns_is_rejected_for_fixed_width() {
    assert!(matches!(
        extract("Image Data\n1\n", 0),
        Err(ThermaError::Validation(_))
    ));
}

#[test]
fn custom_marker_is_honored() {
    let opts = ExtractOpts {
        expected_cols: 2,
        marker: "[frame]".to_owned(),
        ..Default::default()
    };
    let f = extract_with("Image Data\n9;9\n[frame]\n1;2\n", &opts).unwrap();
    assert_eq!(f.to_rows(), vec![vec![1.0, 2.0]]);
}

#[test]
fn extraction_is_idempotent() {
    let text = format!("{HEADER}Image Data\n1.5;2;3\n4;5;6.25\njunk\n");
    let a = extract(&text, 3).unwrap();
    let b = extract(&text, 3).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.stats(), b.stats());
}

#[test]
fn extract_path_reports_missing_file() {
    let err = extract_path(
        Path::new("/definitely/not/here.csv"),
        &ExtractOpts::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ThermaError::Io { .. }));
}

#[test]
fn overflowing_digit_run_makes_the_row_non_numeric() {
    let text = format!("Image Data\n1;2;{}\n4;5;6\n", "9".repeat(400));
    let f = extract(&text, 3).unwrap();
    assert_eq!(f.to_rows(), vec![vec![4.0, 5.0, 6.0]]);
    assert_eq!(f.stats().rows_non_numeric, 1);
    assert_eq!(f.value_range(), Some((4.0, 6.0)));
}
