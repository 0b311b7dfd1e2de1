use landing_hub_whatsapp::MessageType;

/// Extension → MIME lookup used when inferring media details from a URL
/// path. Extensions the gateway is known to handle.
fn mime_for_extension(ext: &str) -> Option<&'static str> {
    Some(match ext {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "m4a" => "audio/mp4",
        "ogg" => "audio/ogg",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "svg" => "image/svg+xml",
        _ => return None,
    })
}

/// Last path segment of a URL, with query string and fragment stripped.
fn last_path_segment(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().unwrap_or("")
}

/// Lowercased extension of the URL's last path segment, if it has one.
pub fn extension_from_url(url: &str) -> Option<String> {
    let name = last_path_segment(url);
    let ext = name.rsplit('.').next()?;
    if ext == name || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

pub fn mime_from_url(url: &str) -> Option<&'static str> {
    extension_from_url(url).and_then(|ext| mime_for_extension(&ext))
}

/// Best-effort filename from a URL path, percent-decoded.
pub fn file_name_from_url(url: &str) -> Option<String> {
    let name = percent_decode(last_path_segment(url));
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Classify a message by its media MIME type. `text/*` and `application/*`
/// ship as documents; no MIME at all also falls back to document.
pub fn message_type_from_mime(mime: Option<&str>) -> MessageType {
    match mime {
        Some(m) if m.starts_with("image/") => MessageType::Image,
        Some(m) if m.starts_with("video/") => MessageType::Video,
        Some(m) if m.starts_with("audio/") => MessageType::Audio,
        _ => MessageType::Document,
    }
}

/// Restrict a filename to `[A-Za-z0-9._-]` and cap its length, for use in
/// storage paths.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .take(120)
        .collect()
}

fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push(hi * 16 + lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8(out).unwrap_or_else(|_| input.to_string())
}

fn hex_value(byte: u8) -> Option<u8> {
    (byte as char).to_digit(16).map(|d| d as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_mime_from_url_extension() {
        assert_eq!(mime_from_url("https://x.example/a/photo.JPG"), Some("image/jpeg"));
        assert_eq!(mime_from_url("https://x.example/clip.mp4?t=3"), Some("video/mp4"));
        assert_eq!(mime_from_url("https://x.example/doc.pdf#page=2"), Some("application/pdf"));
        assert_eq!(mime_from_url("https://x.example/no-extension"), None);
        assert_eq!(mime_from_url("https://x.example/archive.zip"), None);
    }

    #[test]
    fn extracts_and_decodes_file_names() {
        assert_eq!(
            file_name_from_url("https://x.example/a/b/Catalogo%202025.pdf?alt=media"),
            Some("Catalogo 2025.pdf".to_string())
        );
        assert_eq!(file_name_from_url("https://x.example/dir/"), None);
    }

    #[test]
    fn classifies_message_types() {
        assert_eq!(message_type_from_mime(Some("image/png")), MessageType::Image);
        assert_eq!(message_type_from_mime(Some("video/webm")), MessageType::Video);
        assert_eq!(message_type_from_mime(Some("audio/ogg")), MessageType::Audio);
        assert_eq!(message_type_from_mime(Some("text/plain")), MessageType::Document);
        assert_eq!(message_type_from_mime(Some("application/pdf")), MessageType::Document);
        assert_eq!(message_type_from_mime(None), MessageType::Document);
    }

    #[test]
    fn sanitizes_file_names() {
        assert_eq!(sanitize_file_name("foto vacaciones (1).png"), "foto_vacaciones__1_.png");
        let long = "a".repeat(200);
        assert_eq!(sanitize_file_name(&long).len(), 120);
    }
}
