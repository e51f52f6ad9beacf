use thiserror::Error;

/// Fatal failures of the extraction pipeline.
///
/// Missing fields and unparseable numbers never show up here; they become
/// `None` on the typed records and are rendered as `Unknown` on export.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Malformed situation document: {0}")]
    ParseError(#[from] roxmltree::Error),
    #[error("Situation document is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_from_xml_error() {
        let xml_err = roxmltree::Document::parse("<Siri><unclosed></Siri>").unwrap_err();
        let err: PipelineError = xml_err.into();
        assert!(matches!(err, PipelineError::ParseError(_)));
        assert!(err.to_string().starts_with("Malformed situation document"));
    }

    #[test]
    fn error_from_utf8_error() {
        let bytes: &[u8] = &[0x3C, 0xFF, 0xFE];
        let utf8_err = std::str::from_utf8(bytes).unwrap_err();
        let err: PipelineError = utf8_err.into();
        assert!(matches!(err, PipelineError::Encoding(_)));
    }
}
