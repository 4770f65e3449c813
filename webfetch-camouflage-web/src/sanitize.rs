//! Removal of `<script>` and `<style>` elements from raw HTML
//!
//! The scan works on bytes with ASCII case-insensitive tag matching and only
//! ever cuts at `<` and `>` positions, so multi-byte UTF-8 text is never split.
//! It follows tag boundaries: comments and the markup of other tags, quoted
//! attribute values included, are stepped over whole. Everything outside the
//! removed elements is preserved byte for byte.

/// Elements whose content is raw text and never useful in the markdown output
const RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

/// Injectable wrapper around [`strip_script_and_style`]
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupSanitizer;

impl MarkupSanitizer {
    pub fn new() -> Self {
        Self
    }

    /// Strip every `<script>` and `<style>` element, tags and content included
    pub fn sanitize(&self, html: &str) -> String {
        strip_script_and_style(html)
    }
}

/// Remove all `<script>` and `<style>` elements from `html`.
///
/// * Opening tags match `<`, optional whitespace, then the tag name in any
///   case followed by `>`, `/` or whitespace. `<scripts>` or `<styleguide>`
///   are left alone.
/// * Only a tag start counts: `<script>` written inside an HTML comment or
///   inside a quoted attribute value of another tag is kept as it is.
/// * An element ends at the first matching closing tag. Content between is
///   treated as raw text, so a `<style>` inside a script does not nest.
/// * An element that is never closed runs to the end of the document.
///
/// Removal repeats until no element remains, so fragments that only join into
/// a tag after an inner element is cut are removed as well.
pub fn strip_script_and_style(html: &str) -> String {
    let Some(mut output) = strip_pass(html) else {
        return html.to_string();
    };
    while let Some(next) = strip_pass(&output) {
        output = next;
    }
    output
}

/// One left-to-right removal pass. Returns `None` when nothing was removed.
fn strip_pass(html: &str) -> Option<String> {
    let bytes = html.as_bytes();
    let mut buffer: Option<String> = None;
    let mut kept_from = 0;

    while let Some((start, tag, name_end)) = next_raw_text_element(bytes, kept_from) {
        let out = buffer.get_or_insert_with(|| String::with_capacity(html.len()));
        out.push_str(&html[kept_from..start]);

        match element_end(bytes, tag, name_end) {
            Some(end) => kept_from = end,
            None => {
                kept_from = bytes.len();
                break;
            }
        }
    }

    let mut out = buffer?;
    out.push_str(&html[kept_from..]);
    Some(out)
}

/// Position, name and name end of the next opening raw-text tag at or after
/// `from`, skipping comments and other tags whole.
fn next_raw_text_element(bytes: &[u8], from: usize) -> Option<(usize, &'static str, usize)> {
    let mut i = from;
    while i < bytes.len() {
        if bytes[i] != b'<' {
            i += 1;
            continue;
        }
        if let Some((tag, name_end)) = match_open_tag(bytes, i) {
            return Some((i, tag, name_end));
        }

        let past = |end: Option<usize>| end.unwrap_or(bytes.len());
        i = match bytes.get(i + 1) {
            Some(b'!') if starts_with_ci(bytes, i, "<!--") => past(comment_end(bytes, i)),
            // Doctype, CDATA and processing instructions end at the first `>`
            Some(b'!' | b'?') => past(find_byte(bytes, i, b'>').map(|gt| gt + 1)),
            Some(b'/') if bytes.get(i + 2).is_some_and(u8::is_ascii_alphabetic) => {
                past(tag_end(bytes, i + 2))
            }
            Some(b) if b.is_ascii_alphabetic() => past(tag_end(bytes, i + 1)),
            _ => i + 1,
        };
    }
    None
}

fn starts_with_ci(bytes: &[u8], at: usize, tag: &str) -> bool {
    bytes
        .get(at..at + tag.len())
        .is_some_and(|candidate| candidate.eq_ignore_ascii_case(tag.as_bytes()))
}

fn is_name_delimited(bytes: &[u8], at: usize) -> bool {
    match bytes.get(at) {
        None => true,
        Some(b) => *b == b'>' || *b == b'/' || b.is_ascii_whitespace(),
    }
}

fn skip_whitespace(bytes: &[u8], mut at: usize) -> usize {
    while bytes.get(at).is_some_and(|b| b.is_ascii_whitespace()) {
        at += 1;
    }
    at
}

fn find_byte(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
    bytes
        .get(from..)?
        .iter()
        .position(|b| *b == needle)
        .map(|offset| from + offset)
}

/// Index just past the `-->` closing the comment that opens at `lt`.
///
/// The search starts inside `<!--`, so `<!-->` and `<!--->` close
/// immediately.
fn comment_end(bytes: &[u8], lt: usize) -> Option<usize> {
    bytes
        .get(lt + 2..)?
        .windows(3)
        .position(|window| window == b"-->")
        .map(|offset| lt + 2 + offset + 3)
}

/// Index just past the `>` that closes a tag whose markup continues at `from`.
///
/// A value quoted with `"` or `'` after `=` is skipped whole, so `>` or `<`
/// inside it does not end the tag. `None` when the tag is never closed.
fn tag_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut after_equals = false;
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'>' => return Some(i + 1),
            b'=' => after_equals = true,
            quote @ (b'"' | b'\'') if after_equals => {
                i = find_byte(bytes, i + 1, quote)?;
                after_equals = false;
            }
            b if b.is_ascii_whitespace() => {}
            _ => after_equals = false,
        }
        i += 1;
    }
    None
}

/// If an opening raw-text tag starts at `lt`, return its name and the index
/// just past the name.
fn match_open_tag(bytes: &[u8], lt: usize) -> Option<(&'static str, usize)> {
    let name_start = skip_whitespace(bytes, lt + 1);
    RAW_TEXT_ELEMENTS.iter().find_map(|tag| {
        let name_end = name_start + tag.len();
        (starts_with_ci(bytes, name_start, tag) && is_name_delimited(bytes, name_end))
            .then_some((*tag, name_end))
    })
}

/// Index just past the element's closing tag, or `None` when the element runs
/// to the end of the document.
fn element_end(bytes: &[u8], tag: &str, name_end: usize) -> Option<usize> {
    let mut k = tag_end(bytes, name_end)?;
    while k < bytes.len() {
        if bytes[k] == b'<' && bytes.get(k + 1) == Some(&b'/') {
            let name_start = skip_whitespace(bytes, k + 2);
            let name_end = name_start + tag.len();
            if starts_with_ci(bytes, name_start, tag) && is_name_delimited(bytes, name_end) {
                return find_byte(bytes, name_end, b'>').map(|gt| gt + 1);
            }
        }
        k += 1;
    }
    None
}

/// Whether `html` still contains an opening `<script` or `<style` tag
#[cfg(test)]
fn contains_raw_text_element(html: &str) -> bool {
    next_raw_text_element(html.as_bytes(), 0).is_some()
}
