//! Small utility helpers used across modules.

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge request/response payloads.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut cut = max;
  while !s.is_char_boundary(cut) {
    cut -= 1;
  }
  format!("{}… ({} bytes total)", &s[..cut], s.len())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn short_strings_pass_through() {
    assert_eq!(trunc_for_log("hello", 10), "hello");
  }

  #[test]
  fn long_strings_are_cut_on_a_char_boundary() {
    let s = "抽象抽象抽象抽象";
    let out = trunc_for_log(s, 7);
    assert!(out.ends_with("bytes total)"));
  }
}
