//! Text-field sanitization for untrusted form input.

/// Remove markup tags, keeping the text between them.
///
/// The contents of `<script>` and `<style>` elements are dropped entirely.
pub fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        // A lone '<' that never closes is kept as text.
        let Some(end) = tail.find('>') else {
            out.push_str(tail);
            return out;
        };

        let tag = tail[1..end].trim_start().to_ascii_lowercase();
        rest = &tail[end + 1..];

        for element in ["script", "style"] {
            if tag.starts_with(element) && !tag.ends_with('/') {
                let closing = format!("</{element}");
                match rest.to_ascii_lowercase().find(&closing) {
                    Some(pos) => {
                        let after = &rest[pos..];
                        rest = after.find('>').map(|gt| &after[gt + 1..]).unwrap_or("");
                    }
                    None => rest = "",
                }
                break;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Sanitize a single-line text field.
///
/// Strips tags, drops percent-encoded octets, folds line breaks and tabs into
/// spaces, collapses whitespace runs and trims. Never fails.
pub fn sanitize_text(input: &str) -> String {
    let stripped = strip_tags(input);
    let without_octets = remove_percent_octets(&stripped);

    without_octets
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn remove_percent_octets(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;
    let mut copied_to = 0;

    while i < bytes.len() {
        if bytes[i] == b'%'
            && i + 2 < bytes.len()
            && bytes[i + 1].is_ascii_hexdigit()
            && bytes[i + 2].is_ascii_hexdigit()
        {
            out.push_str(&input[copied_to..i]);
            i += 3;
            copied_to = i;
        } else {
            i += 1;
        }
    }

    out.push_str(&input[copied_to..]);
    out
}
