//! MIME utilities shared across modules

/// Content type for an export artifact, inferred from its extension.
#[must_use]
pub fn export_content_type(filename: &str) -> String {
    mime_guess::from_path(filename)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcripts_and_raw_exports() {
        assert_eq!(export_content_type("acme-ch_C1-abc123.txt"), "text/plain");
        assert_eq!(export_content_type("acme-ch_C1-abc123.json"), "application/json");
        assert_eq!(export_content_type("noext"), "application/octet-stream");
    }
}
