// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `multipart/form-data` body parsing (RFC 7578), enough for file uploads.

use crate::http::find_subsequence;

/// One part of a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPart {
    /// Form field name from `Content-Disposition`.
    pub name: String,
    /// Client-side filename, if the part is a file.
    pub filename: Option<String>,
    pub data: Vec<u8>,
}

/// Extract the boundary parameter from a `Content-Type` header value.
pub fn boundary(content_type: &str) -> Option<String> {
    let mut params = content_type.split(';');
    let mime = params.next()?.trim();
    if !mime.eq_ignore_ascii_case("multipart/form-data") {
        return None;
    }

    params
        .filter_map(|param| param.split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("boundary"))
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

/// Split `body` into its parts. Malformed trailing data is ignored.
pub fn parse(body: &[u8], boundary: &str) -> Vec<FormPart> {
    let delimiter = format!("--{boundary}");
    let delimiter = delimiter.as_bytes();
    let mut parts = Vec::new();

    let Some(first) = find_subsequence(body, delimiter) else {
        return parts;
    };
    let mut rest = &body[first + delimiter.len()..];

    loop {
        // "--" after a delimiter closes the body.
        if rest.starts_with(b"--") {
            break;
        }
        rest = rest.strip_prefix(b"\r\n").unwrap_or(rest);

        let Some(head_end) = find_subsequence(rest, b"\r\n\r\n") else {
            break;
        };
        let head = String::from_utf8_lossy(&rest[..head_end]);
        let content = &rest[head_end + 4..];

        let mut closing = Vec::with_capacity(delimiter.len() + 2);
        closing.extend_from_slice(b"\r\n");
        closing.extend_from_slice(delimiter);
        let Some(data_end) = find_subsequence(content, &closing) else {
            break;
        };

        if let Some((name, filename)) = disposition(&head) {
            parts.push(FormPart {
                name,
                filename,
                data: content[..data_end].to_vec(),
            });
        }

        rest = &content[data_end + closing.len()..];
    }

    parts
}

/// `(name, filename)` from a part's `Content-Disposition: form-data` header.
fn disposition(head: &str) -> Option<(String, Option<String>)> {
    let value = head.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        key.trim()
            .eq_ignore_ascii_case("content-disposition")
            .then_some(value)
    })?;

    let mut name = None;
    let mut filename = None;
    for param in value.split(';').skip(1) {
        let Some((key, raw)) = param.split_once('=') else {
            continue;
        };
        let unquoted = raw.trim().trim_matches('"').to_string();
        match key.trim().to_ascii_lowercase().as_str() {
            "name" => name = Some(unquoted),
            "filename" => filename = Some(unquoted),
            _ => {}
        }
    }

    Some((name?, filename))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDARY: &str = "----WebKitFormBoundary7MA4YWxkTrZu0gW";

    fn body(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
        let mut out = Vec::new();
        for (name, filename, data) in parts {
            out.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            let disposition = match filename {
                Some(f) => format!("form-data; name=\"{name}\"; filename=\"{f}\""),
                None => format!("form-data; name=\"{name}\""),
            };
            out.extend_from_slice(format!("Content-Disposition: {disposition}\r\n").as_bytes());
            out.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
            out.extend_from_slice(data);
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        out
    }

    #[test]
    fn boundary_from_header() {
        let header = format!("multipart/form-data; boundary={BOUNDARY}");
        assert_eq!(boundary(&header).as_deref(), Some(BOUNDARY));
        assert_eq!(
            boundary("multipart/form-data; boundary=\"quoted\"").as_deref(),
            Some("quoted")
        );
        assert_eq!(boundary("application/json"), None);
        assert_eq!(boundary("multipart/form-data"), None);
    }

    #[test]
    fn parses_file_and_field() {
        let raw = body(&[
            ("note", None, &b"hello"[..]),
            ("file", Some("notes.txt"), &b"helo wrld\r\nline two"[..]),
        ]);
        let parts = parse(&raw, BOUNDARY);

        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].name, "note");
        assert_eq!(parts[0].filename, None);
        assert_eq!(parts[1].filename.as_deref(), Some("notes.txt"));
        assert_eq!(parts[1].data, b"helo wrld\r\nline two");
    }

    #[test]
    fn binary_content_survives() {
        let data: Vec<u8> = (0u8..=255).collect();
        let raw = body(&[("file", Some("blob.pdf"), &data[..])]);
        assert_eq!(parse(&raw, BOUNDARY)[0].data, data);
    }

    #[test]
    fn empty_filename_is_kept_empty() {
        let raw = body(&[("file", Some(""), &b""[..])]);
        let parts = parse(&raw, BOUNDARY);
        assert_eq!(parts[0].filename.as_deref(), Some(""));
    }

    #[test]
    fn wrong_boundary_yields_nothing() {
        let raw = body(&[("file", Some("a.txt"), &b"x"[..])]);
        assert!(parse(&raw, "other").is_empty());
    }
}
