use acl2_parser::{segment, Form};
use proofpad_util::{LinedString, Position};

fn forms(s: &str) -> Vec<Form> { segment(&LinedString::from(s), 0) }

/// Check that a comment-free form is balanced and minimal: whenever a `)`
/// returns the depth to zero it must be the last character of the form.
fn check_minimal(source: &str) {
  let s = source.trim();
  let mut depth = 0i32;
  for (i, c) in s.char_indices() {
    match c {
      '(' => depth += 1,
      ')' => depth -= 1,
      _ => {}
    }
    if depth == 0 && c == ')' {
      assert_eq!(i, s.len() - 1, "form {s:?} closes before its end");
    }
  }
  assert_eq!(depth, 0, "unbalanced form {s:?}");
}

#[test]
fn two_forms() {
  let fs = forms("(defun f (x) x)\n(defthm t1 (equal (f 1) 1))\n");
  assert_eq!(fs.len(), 2);
  assert_eq!(fs[0].source, "(defun f (x) x)");
  assert_eq!(fs[0].end, Position { line: 0, character: 15 });
  assert_eq!(fs[0].lines, 1);
  assert_eq!(fs[1].source, "\n(defthm t1 (equal (f 1) 1))");
  assert_eq!(fs[1].end, Position { line: 1, character: 27 });
  assert_eq!(fs[1].lines, 1);
}

#[test]
fn empty_document() {
  assert!(forms("").is_empty());
  assert!(forms("  \n\t\n").is_empty());
  assert!(forms("; only a comment\n").is_empty());
}

#[test]
fn forms_tile_the_document() {
  let s = "(a (b c))\n\n(d)\n(e (f) g)";
  let fs = forms(s);
  assert_eq!(fs.len(), 3);
  let mut prev = 0;
  for f in &fs {
    assert_eq!(f.span.start, prev, "forms must be contiguous");
    prev = f.span.end;
  }
  assert_eq!(prev, s.len());
  let concat: String = fs.iter().map(|f| &*f.source).collect();
  assert_eq!(concat, s, "comment-free input survives segmentation verbatim");
}

#[test]
fn forms_are_balanced_and_minimal() {
  for f in forms("(a (b c))\n(d)\n((e) (f))\n(g) (h)") {
    check_minimal(&f.source);
  }
}

#[test]
fn comments_are_stripped() {
  let fs = forms("(defun f (x) ; identity\n  x)\n#| block (unbalanced |# (g)\n");
  assert_eq!(fs.len(), 2);
  assert_eq!(fs[0].source, "(defun f (x) \n  x)");
  assert_eq!(fs[1].source, "\n (g)");
  // comment parens must not affect nesting
  assert_eq!(fs[0].end, Position { line: 1, character: 4 });
}

#[test]
fn bare_atoms_are_forms() {
  let fs = forms(":ubu \"top\"\n(f)\n");
  assert_eq!(fs.len(), 3);
  assert_eq!(fs[0].source, ":ubu");
  assert_eq!(fs[1].source, " \"top\"");
  assert_eq!(fs[2].source, "\n(f)");
}

#[test]
fn stray_close_paren_stops_the_scan() {
  let fs = forms("(a)\n(b))\n(c)\n");
  assert_eq!(fs.len(), 2);
  assert_eq!(fs[1].source, "\n(b)");
  // parens inside strings must not trigger the bail-out
  assert_eq!(forms("(a \")\")\n(b)\n").len(), 2);
}

#[test]
fn trailing_partial_form_is_dropped() {
  let fs = forms("(a)\n(b (c)\n");
  assert_eq!(fs.len(), 1);
  assert_eq!(fs[0].source, "(a)");
  // ...and reappears once balanced
  assert_eq!(forms("(a)\n(b (c))\n").len(), 2);
}

#[test]
fn segmentation_from_watermark() {
  let s = "(a)\n(b c)\n(d)\n";
  let all = forms(s);
  assert_eq!(all.len(), 3);
  // rescanning from the end of form 0 reproduces the tail exactly
  let text = LinedString::from(s);
  let tail = segment(&text, all[0].span.end);
  assert_eq!(tail[..], all[1..]);
}

#[test]
fn line_counts() {
  let fs = forms("(defun f (x)\n  (if (zp x)\n      1\n      x))\n(g) (h)\n");
  assert_eq!(fs.len(), 3);
  assert_eq!(fs[0].lines, 4);
  assert_eq!(fs[1].lines, 1);
  // second form on the same line spans no new lines
  assert_eq!(fs[2].lines, 0);
}

#[test]
fn deterministic() {
  let s = "(a (b))\n; c\n(d)\n";
  assert_eq!(forms(s), forms(s));
}
