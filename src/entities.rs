//! HTML character reference decoding with the HTML5 parse-error recoveries.
//!
//! Semicolon-terminated named references go through `html-escape`'s table.
//! On top of that: numeric references with a missing `;`, the windows-1252
//! remapping of `&#x80;`..`&#x9F;`, U+FFFD for NUL, surrogates and values
//! past U+10FFFF, and the legacy names that are valid without `;`, matched by
//! longest prefix (`&notit;` is `¬it;`).

use std::borrow::Cow;

use html_escape::decode_html_entities;

const REPLACEMENT: char = '\u{FFFD}';

// Longest name in LEGACY_ENTITIES.
const LONGEST_LEGACY: usize = 6;

// Code points for &#x80; through &#x9F;.
const C1_REPLACEMENTS: [char; 32] = [
    '\u{20AC}', '\u{0081}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{008D}', '\u{017D}', '\u{008F}',
    '\u{0090}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{009D}', '\u{017E}', '\u{0178}',
];

// Named references that may appear without a trailing semicolon.
const LEGACY_ENTITIES: &[(&str, char)] = &[
    ("AElig", '\u{C6}'), ("AMP", '&'), ("Aacute", '\u{C1}'), ("Acirc", '\u{C2}'),
    ("Agrave", '\u{C0}'), ("Aring", '\u{C5}'), ("Atilde", '\u{C3}'), ("Auml", '\u{C4}'),
    ("COPY", '\u{A9}'), ("Ccedil", '\u{C7}'), ("ETH", '\u{D0}'), ("Eacute", '\u{C9}'),
    ("Ecirc", '\u{CA}'), ("Egrave", '\u{C8}'), ("Euml", '\u{CB}'), ("GT", '>'),
    ("Iacute", '\u{CD}'), ("Icirc", '\u{CE}'), ("Igrave", '\u{CC}'), ("Iuml", '\u{CF}'),
    ("LT", '<'), ("Ntilde", '\u{D1}'), ("Oacute", '\u{D3}'), ("Ocirc", '\u{D4}'),
    ("Ograve", '\u{D2}'), ("Oslash", '\u{D8}'), ("Otilde", '\u{D5}'), ("Ouml", '\u{D6}'),
    ("QUOT", '"'), ("REG", '\u{AE}'), ("THORN", '\u{DE}'), ("Uacute", '\u{DA}'),
    ("Ucirc", '\u{DB}'), ("Ugrave", '\u{D9}'), ("Uuml", '\u{DC}'), ("Yacute", '\u{DD}'),
    ("aacute", '\u{E1}'), ("acirc", '\u{E2}'), ("acute", '\u{B4}'), ("aelig", '\u{E6}'),
    ("agrave", '\u{E0}'), ("amp", '&'), ("aring", '\u{E5}'), ("atilde", '\u{E3}'),
    ("auml", '\u{E4}'), ("brvbar", '\u{A6}'), ("ccedil", '\u{E7}'), ("cedil", '\u{B8}'),
    ("cent", '\u{A2}'), ("copy", '\u{A9}'), ("curren", '\u{A4}'), ("deg", '\u{B0}'),
    ("divide", '\u{F7}'), ("eacute", '\u{E9}'), ("ecirc", '\u{EA}'), ("egrave", '\u{E8}'),
    ("eth", '\u{F0}'), ("euml", '\u{EB}'), ("frac12", '\u{BD}'), ("frac14", '\u{BC}'),
    ("frac34", '\u{BE}'), ("gt", '>'), ("iacute", '\u{ED}'), ("icirc", '\u{EE}'),
    ("iexcl", '\u{A1}'), ("igrave", '\u{EC}'), ("iquest", '\u{BF}'), ("iuml", '\u{EF}'),
    ("laquo", '\u{AB}'), ("lt", '<'), ("macr", '\u{AF}'), ("micro", '\u{B5}'),
    ("middot", '\u{B7}'), ("nbsp", '\u{A0}'), ("not", '\u{AC}'), ("ntilde", '\u{F1}'),
    ("oacute", '\u{F3}'), ("ocirc", '\u{F4}'), ("ograve", '\u{F2}'), ("ordf", '\u{AA}'),
    ("ordm", '\u{BA}'), ("oslash", '\u{F8}'), ("otilde", '\u{F5}'), ("ouml", '\u{F6}'),
    ("para", '\u{B6}'), ("plusmn", '\u{B1}'), ("pound", '\u{A3}'), ("quot", '"'),
    ("raquo", '\u{BB}'), ("reg", '\u{AE}'), ("sect", '\u{A7}'), ("shy", '\u{AD}'),
    ("sup1", '\u{B9}'), ("sup2", '\u{B2}'), ("sup3", '\u{B3}'), ("szlig", '\u{DF}'),
    ("thorn", '\u{FE}'), ("times", '\u{D7}'), ("uacute", '\u{FA}'), ("ucirc", '\u{FB}'),
    ("ugrave", '\u{F9}'), ("uml", '\u{A8}'), ("uuml", '\u{FC}'), ("yacute", '\u{FD}'),
    ("yen", '\u{A5}'), ("yuml", '\u{FF}'),
];

/// Resolve every character reference in `text`.
///
/// Anything that is not a recognisable reference is left as written.
pub fn unescape(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let consumed = unescape_reference(&rest[amp..], &mut out);
        rest = &rest[amp + consumed..];
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Decode the reference at the start of `s` (which begins with `&`) into
/// `out`, returning the number of bytes used. Unrecognised input emits `&`
/// and uses one byte.
fn unescape_reference(s: &str, out: &mut String) -> usize {
    let b = s.as_bytes();
    if b.get(1) == Some(&b'#') {
        return unescape_numeric(b, out);
    }

    let end = 1 + b[1..].iter().take_while(|c| c.is_ascii_alphanumeric()).count();
    let name = &s[1..end];
    let terminated = b.get(end) == Some(&b';');
    if name.is_empty() {
        out.push('&');
        return 1;
    }

    if terminated {
        let reference = &s[..=end];
        let decoded = decode_html_entities(reference);
        if decoded != reference {
            out.push_str(&decoded);
            return end + 1;
        }
    } else if let Some(c) = legacy(name) {
        out.push(c);
        return end;
    }

    // A terminated name counts its ';' here, so the prefix may be the whole name.
    let max_len = if terminated { name.len() } else { name.len() - 1 };
    for len in (2..=max_len.min(LONGEST_LEGACY)).rev() {
        if let Some(c) = legacy(&name[..len]) {
            out.push(c);
            return len + 1;
        }
    }

    out.push('&');
    1
}

fn unescape_numeric(b: &[u8], out: &mut String) -> usize {
    let mut i = 2;
    let hex = matches!(b.get(i), Some(b'x' | b'X'));
    let radix = if hex { 16 } else { 10 };
    if hex {
        i += 1;
    }

    let mut value: u32 = 0;
    while let Some(&c) = b.get(i) {
        i += 1;
        if let Some(d) = char::from(c).to_digit(radix) {
            value = value.saturating_mul(radix).saturating_add(d);
            continue;
        }
        if c != b';' {
            i -= 1;
        }
        break;
    }

    // "&#", "&#x" or "&#" plus a single unterminated digit.
    if i <= 3 {
        out.push('&');
        return 1;
    }
    out.push(numeric_char(value));
    i
}

fn numeric_char(value: u32) -> char {
    match value {
        0x80..=0x9F => C1_REPLACEMENTS[(value - 0x80) as usize],
        0 | 0xD800..=0xDFFF => REPLACEMENT,
        _ => char::from_u32(value).unwrap_or(REPLACEMENT),
    }
}

fn legacy(name: &str) -> Option<char> {
    LEGACY_ENTITIES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, c)| c)
}
