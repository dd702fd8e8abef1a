use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RE: Regex = Regex::new(r"(?u)[\p{L}\p{N}_]+").expect("valid regex");
}

/// Split text into identifier-like tokens: maximal runs of letters, digits,
/// and underscores. Case is preserved; matching tokens against a vocabulary
/// is the caller's concern.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    RE.find_iter(text).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tokenize() {
        let toks: Vec<&str> = tokenize("if (x_1) { return; }").collect();
        assert_eq!(toks, vec!["if", "x_1", "return"]);
    }
}
