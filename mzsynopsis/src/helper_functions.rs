use std::{
    num::{IntErrorKind, ParseIntError},
    path::Path,
};

/// Helper function to check extensions in filenames
pub(crate) fn check_extension(filename: impl AsRef<Path>, extension: impl AsRef<Path>) -> bool {
    filename
        .as_ref()
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension.as_ref()))
}

/// To be used as `The xx number ` + the explanation from here (does not have a dot).
pub(crate) const fn explain_number_error(error: &ParseIntError) -> &'static str {
    match error.kind() {
        IntErrorKind::Empty => "is empty",
        IntErrorKind::InvalidDigit => "contains an invalid character",
        IntErrorKind::NegOverflow => "is too small to fit in the internal representation",
        IntErrorKind::PosOverflow => "is too big to fit in the internal representation",
        IntErrorKind::Zero => "is zero, which is not allowed here",
        _ => "is not a valid number",
    }
}

/// Remove all text enclosed in the given brackets (including the brackets), unbalanced closing
/// brackets are dropped, an unbalanced opening bracket drops the rest of the text.
pub(crate) fn strip_enclosed(text: &str, open: &[char], close: &[char]) -> String {
    let mut depth: usize = 0;
    let mut output = String::with_capacity(text.len());
    for ch in text.chars() {
        if open.contains(&ch) {
            depth += 1;
        } else if close.contains(&ch) {
            depth = depth.saturating_sub(1);
        } else if depth == 0 {
            output.push(ch);
        }
    }
    output
}

#[test]
fn test_strip_enclosed() {
    assert_eq!(
        strip_enclosed("AC(UniMod:4)DM[+15.995]K", &['(', '['], &[')', ']']),
        "ACDMK"
    );
    assert_eq!(strip_enclosed("A(B(C)D)E", &['('], &[')']), "AE");
    assert_eq!(strip_enclosed("AB)C", &['('], &[')']), "ABC");
    assert_eq!(strip_enclosed("AB(C", &['('], &[')']), "AB");
}
