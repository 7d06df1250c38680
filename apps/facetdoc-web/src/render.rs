//! The single HTML page: the document list followed by the add form.

use std::fmt::Write;

use facetdoc_core::Document;

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html>
<head></head>
<body>

	<h3>Documents in the search index</h3>
	<ul>
"#;

const PAGE_TAIL: &str = r#"	</ul>

	<form action="/add" method="POST">
		<h4>Add a document to the search index</h4>
		<input type="text" name="title" placeholder="Title" />
		<input type="number" name="f" step="any" placeholder="Facet (number)" />
		<input type="submit" value="Add" />
	</form>

</body>
</html>
"#;

pub fn home_page(docs: &[Document]) -> String {
    let mut out = String::with_capacity(PAGE_HEAD.len() + PAGE_TAIL.len() + docs.len() * 64);
    out.push_str(PAGE_HEAD);
    for doc in docs {
        out.push_str("\t\t<li>\n");
        let _ = writeln!(out, "\t\t\t<div>Title: {}</div>", escape_html(&doc.title));
        let _ = writeln!(out, "\t\t\t<div>F: {}</div>", format_number(doc.f));
        out.push_str("\t\t</li>\n");
    }
    out.push_str(PAGE_TAIL);
    out
}

/// Shortest round-trip digits; exponent form below 1e-4 and from 1e6 up.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }

    let sci = format!("{:e}", value.abs());
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let digits: Vec<char> = mantissa.chars().filter(char::is_ascii_digit).collect();

    let mut out = String::new();
    if value.is_sign_negative() {
        out.push('-');
    }
    if !(-4..6).contains(&exp) {
        out.push(digits[0]);
        if digits.len() > 1 {
            out.push('.');
            out.extend(&digits[1..]);
        }
        let _ = write!(out, "e{}{:02}", if exp < 0 { '-' } else { '+' }, exp.unsigned_abs());
        return out;
    }

    // position of the decimal point relative to the first digit
    let point = exp + 1;
    let digit_at = |i: i32| usize::try_from(i).ok().and_then(|i| digits.get(i).copied()).unwrap_or('0');
    if point > 0 {
        out.extend((0..point).map(digit_at));
    } else {
        out.push('0');
    }
    let len = i32::try_from(digits.len()).unwrap_or(i32::MAX);
    if len > point {
        out.push('.');
        out.extend((point..len).map(digit_at));
    }
    out
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
