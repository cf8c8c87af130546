/*
 * splice.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! String splicing for rewrite steps.

use std::ops::Range;

/// Return a copy of `original` with the byte range `span` replaced by `replacement`.
///
/// The input is never modified. `span` must lie on `char` boundaries, which is
/// always the case for spans reported by the grammar matcher.
///
/// Adjacent spaces are kept as they are, so removing `[a]` from `"x [a] y"`
/// leaves a double space: `"x  y"`.
///
/// # Panics
///
/// Panics if `span` is reversed, extends past the end of `original`, or does
/// not start and end on `char` boundaries.
pub fn splice(original: &str, span: Range<usize>, replacement: &str) -> String {
    let head = &original[..span.start];
    let tail = &original[span.end..];
    assert!(span.start <= span.end, "reversed splice span {span:?}");

    let mut out = String::with_capacity(head.len() + replacement.len() + tail.len());
    out.push_str(head);
    out.push_str(replacement);
    out.push_str(tail);
    out
}
