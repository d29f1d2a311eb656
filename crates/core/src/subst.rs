//! `${name}` placeholder scanning and replacement.
//!
//! A placeholder starts at `${` and ends at the first following `}` on the
//! same line. Replacement is a single left-to-right pass; inserted values
//! are never scanned again. Templates are bytes: text that is not UTF-8
//! passes through untouched.

use crate::values::Variables;

/// Bytes stripped from both ends of a matched placeholder to get its key.
const DELIMITERS: &[u8] = b"${}";

/// One recognized placeholder occurrence in a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder<'a> {
    /// Byte offset of the leading `$`.
    pub start: usize,
    /// Byte offset just past the closing `}`.
    pub end: usize,
    /// The full matched text, delimiters included.
    pub raw: &'a [u8],
    /// `raw` with every leading and trailing delimiter byte removed.
    /// Inner whitespace is kept.
    pub key: &'a [u8],
}

impl<'a> Placeholder<'a> {
    /// The key as text, if it is valid UTF-8. Other keys never resolve.
    pub fn key_str(&self) -> Option<&'a str> {
        std::str::from_utf8(self.key).ok()
    }

    fn resolve<'v>(&self, vars: &'v Variables) -> Option<&'v str> {
        self.key_str().and_then(|key| vars.get(key))
    }
}

/// Iterator over the non-overlapping placeholders of a template.
pub struct Placeholders<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Placeholders<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }
}

impl<'a> Iterator for Placeholders<'a> {
    type Item = Placeholder<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.input;
        let mut i = self.pos;

        while i + 1 < bytes.len() {
            if bytes[i] != b'$' || bytes[i + 1] != b'{' {
                i += 1;
                continue;
            }

            let body = i + 2;
            match bytes[body..].iter().position(|&b| b == b'}' || b == b'\n') {
                Some(off) if bytes[body + off] == b'}' => {
                    let end = body + off + 1;
                    let raw = &bytes[i..end];
                    self.pos = end;
                    return Some(Placeholder {
                        start: i,
                        end,
                        raw,
                        key: trim_delimiters(raw),
                    });
                },
                // Every `${` before this newline would stop at it too.
                Some(off) => i = body + off + 1,
                None => break,
            }
        }

        self.pos = bytes.len();
        None
    }
}

fn trim_delimiters(raw: &[u8]) -> &[u8] {
    let start = raw
        .iter()
        .position(|b| !DELIMITERS.contains(b))
        .unwrap_or(raw.len());
    let end = raw
        .iter()
        .rposition(|b| !DELIMITERS.contains(b))
        .map_or(start, |i| i + 1);
    &raw[start..end]
}

/// Collect every placeholder in `template`, in order.
pub fn placeholders(template: &[u8]) -> Vec<Placeholder<'_>> {
    Placeholders::new(template).collect()
}

/// Replace each placeholder whose key is in `vars` with its value.
///
/// Unknown keys are left as the original placeholder text. Unterminated
/// `${` sequences pass through unchanged.
pub fn substitute(template: &[u8], vars: &Variables) -> Vec<u8> {
    let mut result = Vec::with_capacity(template.len());
    let mut cursor = 0;

    for ph in Placeholders::new(template) {
        result.extend_from_slice(&template[cursor..ph.start]);
        match ph.resolve(vars) {
            Some(val) => result.extend_from_slice(val.as_bytes()),
            None => result.extend_from_slice(ph.raw),
        }
        cursor = ph.end;
    }
    result.extend_from_slice(&template[cursor..]);

    result
}

/// [`substitute`] for templates already held as text.
pub fn substitute_str(template: &str, vars: &Variables) -> String {
    let mut result = String::with_capacity(template.len());
    let mut cursor = 0;

    // Offsets land on ASCII delimiters, so they are char boundaries.
    for ph in Placeholders::new(template.as_bytes()) {
        result.push_str(&template[cursor..ph.start]);
        match ph.resolve(vars) {
            Some(val) => result.push_str(val),
            None => result.push_str(&template[ph.start..ph.end]),
        }
        cursor = ph.end;
    }
    result.push_str(&template[cursor..]);

    result
}

/// Keys referenced by `template` that `vars` cannot resolve, first-seen order.
pub fn unresolved(template: &[u8], vars: &Variables) -> Vec<String> {
    let mut missing: Vec<String> = Vec::new();
    for ph in Placeholders::new(template) {
        if ph.resolve(vars).is_some() {
            continue;
        }
        let key = String::from_utf8_lossy(ph.key);
        if !missing.iter().any(|k| *k == key) {
            missing.push(key.into_owned());
        }
    }
    missing
}
