//! Message interpolation for the `%m` verb.
//!
//! A record carries a message template and a list of arguments. The message
//! is produced in one of two modes:
//!
//! | template  | args      | output                                 |
//! |-----------|-----------|----------------------------------------|
//! | empty     | empty     | nothing                                |
//! | non-empty | empty     | the template verbatim                  |
//! | non-empty | non-empty | printf-style positional substitution   |
//! | empty     | non-empty | args joined by single spaces           |
//!
//! Substitution understands `%%` and `%[flags][width][.precision]verb`.
//! Every verb renders the argument's `Display` output, except `%q` which
//! quotes it. Mismatches never fail: a missing argument renders as
//! `%!v(MISSING)` and unused arguments are appended as `%!(EXTRA a, b)`.
//! Widths and precisions above [`MAX_WIDTH`] render `%!(BADWIDTH)` or
//! `%!(BADPREC)` and are then ignored.

use std::fmt::Display;
use std::io::Write;

/// Largest width or precision honored by substitution
pub const MAX_WIDTH: usize = 1_000_000;

/// Append the interpolated message to `buf`
pub fn write_message(buf: &mut Vec<u8>, template: &str, args: &[&dyn Display]) {
    match (template.is_empty(), args.is_empty()) {
        (true, true) => {}
        (false, true) => buf.extend_from_slice(template.as_bytes()),
        (true, false) => write_joined(buf, args, b" "),
        (false, false) => write_substituted(buf, template, args),
    }
}

fn write_joined(buf: &mut Vec<u8>, args: &[&dyn Display], separator: &[u8]) {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            buf.extend_from_slice(separator);
        }
        // Writing into a Vec cannot fail.
        let _ = write!(buf, "{}", arg);
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Spec {
    left: bool,
    zero: bool,
    plus: bool,
    width: Option<usize>,
    precision: Option<usize>,
    bad_width: bool,
    bad_precision: bool,
}

impl Spec {
    fn is_plain(&self) -> bool {
        !self.left && !self.zero && !self.plus && self.width.is_none() && self.precision.is_none()
    }
}

fn write_substituted(buf: &mut Vec<u8>, template: &str, args: &[&dyn Display]) {
    let bytes = template.as_bytes();
    let mut next_arg = 0;
    let mut i = 0;

    while i < bytes.len() {
        let run_end = bytes[i..]
            .iter()
            .position(|&b| b == b'%')
            .map_or(bytes.len(), |p| i + p);
        buf.extend_from_slice(&bytes[i..run_end]);
        if run_end == bytes.len() {
            break;
        }

        i = run_end + 1;
        let (spec, consumed) = parse_spec(&bytes[i..]);
        i += consumed;
        if spec.bad_width {
            buf.extend_from_slice(b"%!(BADWIDTH)");
        }
        if spec.bad_precision {
            buf.extend_from_slice(b"%!(BADPREC)");
        }

        // Verbs are whole characters so multi-byte input is never split.
        let Some(verb) = template[i..].chars().next() else {
            buf.extend_from_slice(b"%!(NOVERB)");
            break;
        };
        i += verb.len_utf8();

        if verb == '%' {
            buf.push(b'%');
            continue;
        }

        match args.get(next_arg) {
            Some(arg) => {
                write_arg(buf, *arg, verb, &spec);
                next_arg += 1;
            }
            None => {
                let _ = write!(buf, "%!{}(MISSING)", verb);
            }
        }
    }

    if next_arg < args.len() {
        buf.extend_from_slice(b"%!(EXTRA ");
        write_joined(buf, &args[next_arg..], b", ");
        buf.push(b')');
    }
}

/// Parse flags, width and precision; returns the spec and bytes consumed
fn parse_spec(bytes: &[u8]) -> (Spec, usize) {
    let mut spec = Spec::default();
    let mut i = 0;

    while let Some(&b) = bytes.get(i) {
        match b {
            b'-' => spec.left = true,
            b'0' => spec.zero = true,
            b'+' => spec.plus = true,
            _ => break,
        }
        i += 1;
    }

    let (width, n) = parse_number(&bytes[i..]);
    match width {
        Some(w) if w > MAX_WIDTH => spec.bad_width = true,
        _ => spec.width = width,
    }
    i += n;

    if bytes.get(i) == Some(&b'.') {
        i += 1;
        let (precision, n) = parse_number(&bytes[i..]);
        match precision.unwrap_or(0) {
            p if p > MAX_WIDTH => spec.bad_precision = true,
            p => spec.precision = Some(p),
        }
        i += n;
    }

    (spec, i)
}

fn parse_number(bytes: &[u8]) -> (Option<usize>, usize) {
    let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return (None, 0);
    }
    let value = bytes[..digits]
        .iter()
        .fold(0usize, |acc, b| acc.saturating_mul(10).saturating_add(usize::from(b - b'0')));
    (Some(value), digits)
}

fn write_arg(buf: &mut Vec<u8>, arg: &dyn Display, verb: char, spec: &Spec) {
    if verb != 'q' && spec.is_plain() {
        let _ = write!(buf, "{}", arg);
        return;
    }

    let integer_verb = matches!(verb, 'd' | 'i' | 'o' | 'x' | 'X' | 'b');
    let mut text = match spec.precision {
        Some(precision) => {
            let plain = arg.to_string();
            if integer_verb && is_integer(&plain) {
                // Integer precision is a minimum digit count
                let sign_len = usize::from(plain.starts_with('-'));
                let digits = plain.len() - sign_len;
                let mut padded = String::with_capacity(plain.len().max(precision + sign_len));
                padded.push_str(&plain[..sign_len]);
                padded.extend(std::iter::repeat('0').take(precision.saturating_sub(digits)));
                padded.push_str(&plain[sign_len..]);
                padded
            } else {
                format!("{:.*}", precision, arg)
            }
        }
        None => arg.to_string(),
    };
    if verb == 'q' {
        text = format!("\"{}\"", text.escape_debug());
    }
    if spec.plus && text.starts_with(|c: char| c.is_ascii_digit()) {
        text.insert(0, '+');
    }

    let len = text.chars().count();
    let pad = spec.width.map_or(0, |w| w.saturating_sub(len));
    if pad == 0 {
        buf.extend_from_slice(text.as_bytes());
    } else if spec.left {
        buf.extend_from_slice(text.as_bytes());
        buf.resize(buf.len() + pad, b' ');
    } else if spec.zero && !(integer_verb && spec.precision.is_some()) && is_numeric(&text) {
        let sign_len = usize::from(text.starts_with(['-', '+']));
        buf.extend_from_slice(&text.as_bytes()[..sign_len]);
        buf.resize(buf.len() + pad, b'0');
        buf.extend_from_slice(&text.as_bytes()[sign_len..]);
    } else {
        buf.resize(buf.len() + pad, b' ');
        buf.extend_from_slice(text.as_bytes());
    }
}

fn is_integer(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn is_numeric(text: &str) -> bool {
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
}

/// Render a message into a fresh `String`
pub fn format_message(template: &str, args: &[&dyn Display]) -> String {
    let mut buf = Vec::new();
    write_message(&mut buf, template, args);
    String::from_utf8_lossy(&buf).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(template: &str, args: &[&dyn Display]) -> String {
        format_message(template, args)
    }

    #[test]
    fn test_empty_template_no_args() {
        assert_eq!(render("", &[]), "");
    }

    #[test]
    fn test_template_without_args_is_verbatim() {
        assert_eq!(render("abc", &[]), "abc");
        // No substitution happens without args, even for verbs.
        assert_eq!(render("100%d", &[]), "100%d");
    }

    #[test]
    fn test_positional_substitution() {
        assert_eq!(render("abc %d %d", &[&1, &2]), "abc 1 2");
        assert_eq!(render("abc %v", &[&"x"]), "abc x");
    }

    #[test]
    fn test_plain_concatenation() {
        assert_eq!(render("", &[&1, &2]), "1 2");
        assert_eq!(render("", &[&"a", &3.5, &true]), "a 3.5 true");
    }

    #[test]
    fn test_percent_escape() {
        assert_eq!(render("%d%%", &[&50]), "50%");
    }

    #[test]
    fn test_missing_and_extra_args() {
        assert_eq!(render("%d %s", &[&1]), "1 %!s(MISSING)");
        assert_eq!(render("%d", &[&1, &2, &"z"]), "1%!(EXTRA 2, z)");
    }

    #[test]
    fn test_trailing_percent() {
        assert_eq!(render("50%", &[&1]), "50%!(NOVERB)%!(EXTRA 1)");
    }

    #[test]
    fn test_flags_without_verb() {
        assert_eq!(render("50%-", &[&1]), "50%!(NOVERB)%!(EXTRA 1)");
        assert_eq!(render("x%+08.", &[&1]), "x%!(NOVERB)%!(EXTRA 1)");
    }

    #[test]
    fn test_oversized_width() {
        assert_eq!(render("id=%99999999999999999999d", &[&1]), "id=%!(BADWIDTH)1");
        assert_eq!(render("[%10000000000d]", &[&7]), "[%!(BADWIDTH)7]");
        // The bound itself is still honored
        assert_eq!(render("%1000000d", &[&1]).len(), MAX_WIDTH);
    }

    #[test]
    fn test_oversized_precision() {
        assert_eq!(render("%.99999999999999999999f", &[&1.5]), "%!(BADPREC)1.5");
        assert_eq!(render("%5.2000000s|", &[&"ab"]), "%!(BADPREC)   ab|");
    }

    #[test]
    fn test_width_and_flags() {
        assert_eq!(render("[%5d]", &[&42]), "[   42]");
        assert_eq!(render("[%-5d]", &[&42]), "[42   ]");
        assert_eq!(render("[%05d]", &[&-42]), "[-0042]");
        assert_eq!(render("[%+d]", &[&7]), "[+7]");
        assert_eq!(render("[%05s]", &[&"ab"]), "[   ab]");
    }

    #[test]
    fn test_precision() {
        assert_eq!(render("%.2f", &[&3.14159]), "3.14");
        assert_eq!(render("%8.3f|", &[&2.5]), "   2.500|");
        assert_eq!(render("%.3s", &[&"abcdef"]), "abc");
    }

    #[test]
    fn test_integer_precision_is_minimum_digits() {
        assert_eq!(render("%.3d", &[&7]), "007");
        assert_eq!(render("%.3d", &[&-7]), "-007");
        assert_eq!(render("%.2d", &[&12345]), "12345");
        assert_eq!(render("[%6.3d]", &[&7]), "[   007]");
        assert_eq!(render("[%-6.3d]", &[&7]), "[007   ]");
        // Zero flag is ignored once a precision is given
        assert_eq!(render("[%06.3d]", &[&7]), "[   007]");
        // Floats keep their fractional precision even when they print as whole numbers
        assert_eq!(render("%.2f", &[&3.0]), "3.00");
        assert_eq!(render("%08.3f", &[&2.5]), "0002.500");
    }

    #[test]
    fn test_quoted_verb() {
        assert_eq!(render("%q", &[&"a\"b"]), "\"a\\\"b\"");
    }

    #[test]
    fn test_multibyte_verb_is_not_split() {
        assert_eq!(render("%é", &[&1]), "1");
        assert_eq!(render("é %v é", &[&1]), "é 1 é");
    }
}
