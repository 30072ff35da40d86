//! MIME type detection for the candidate file.

use std::fmt::Debug;

/// Detects the MIME type of a candidate file.
pub trait MimeDetector: Send + Sync + Debug {
    /// `extension` is lower-case without the dot. Returns `None` when the
    /// type cannot be determined.
    fn detect(&self, content: &[u8], extension: &str) -> Option<String>;
}

/// Sniffs the content with `infer`. Text formats carry no magic number, so
/// for those the extension decides.
#[derive(Clone, Copy, Debug, Default)]
pub struct ContentSniffer;

impl MimeDetector for ContentSniffer {
    fn detect(&self, content: &[u8], extension: &str) -> Option<String> {
        if let Some(kind) = infer::get(content) {
            return Some(kind.mime_type().to_string());
        }

        let fallback = text_mime_type(extension);
        if let Some(mime) = fallback {
            tracing::debug!(extension = %extension, mime = %mime, "No magic number, using extension");
        }
        fallback.map(str::to_string)
    }
}

fn text_mime_type(extension: &str) -> Option<&'static str> {
    Some(match extension {
        "txt" | "log" => "text/plain",
        "csv" => "text/csv",
        "tsv" => "text/tab-separated-values",
        "md" => "text/markdown",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "json" => "application/json",
        "xml" => "application/xml",
        "svg" => "image/svg+xml",
        "yaml" | "yml" => "application/yaml",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_from_content() {
        let sniffer = ContentSniffer;
        assert_eq!(
            sniffer.detect(b"%PDF-1.7\n%%EOF", "pdf").as_deref(),
            Some("application/pdf")
        );
        assert_eq!(
            sniffer
                .detect(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0], "png")
                .as_deref(),
            Some("image/png")
        );
    }

    #[test]
    fn test_content_wins_over_extension() {
        // A PDF renamed to .txt is still a PDF.
        assert_eq!(
            ContentSniffer.detect(b"%PDF-1.7", "txt").as_deref(),
            Some("application/pdf")
        );
    }

    #[test]
    fn test_text_falls_back_to_extension() {
        assert_eq!(
            ContentSniffer.detect(b"a,b,c\n1,2,3\n", "csv").as_deref(),
            Some("text/csv")
        );
        assert_eq!(
            ContentSniffer.detect(b"hello", "txt").as_deref(),
            Some("text/plain")
        );
        assert_eq!(ContentSniffer.detect(b"hello", "bin"), None);
    }
}
