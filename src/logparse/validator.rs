use crate::errors::ValidationError;

use super::parser::strip_clock_prefix;

/// Event markers that identify a file as output of the scrim recording tool.
const SIGNATURE_KINDS: &[&str] = &[
    "match_start",
    "match_end",
    "round_start",
    "round_end",
    "player_stat",
    "hero_spawn",
    "payload_progress",
];

/// Cheap signature check before committing to a full parse. Pure; looks for
/// at least one line opening with a recognized event marker.
pub fn validate(raw_text: &str) -> Result<(), ValidationError> {
    if raw_text.trim().is_empty() {
        return Err(ValidationError::EmptyFile);
    }

    let recognized = raw_text.lines().any(line_has_signature);
    if recognized {
        Ok(())
    } else {
        Err(ValidationError::UnrecognizedFormat)
    }
}

/// Extension screening for an uploaded file name. Runs per file before any
/// content is inspected; a single bad extension rejects the whole batch.
pub fn validate_extension(file_name: &str) -> Result<(), ValidationError> {
    let lower = file_name.to_ascii_lowercase();
    if lower.ends_with(".txt") || lower.ends_with(".csv") {
        Ok(())
    } else {
        Err(ValidationError::UnsupportedExtension)
    }
}

fn line_has_signature(line: &str) -> bool {
    let line = strip_clock_prefix(line.trim());
    let kind = line.split(',').next().unwrap_or("").trim();
    SIGNATURE_KINDS.contains(&kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_file_with_marker_line() {
        let text = "garbage header\nmatch_start,King's Row,Hybrid,Us,Them\n";
        assert_eq!(validate(text), Ok(()));
    }

    #[test]
    fn accepts_marker_behind_clock_prefix() {
        let text = "[01:23] round_end,1,1,0\n";
        assert_eq!(validate(text), Ok(()));
    }

    #[test]
    fn rejects_empty_file() {
        assert_eq!(validate("   \n  "), Err(ValidationError::EmptyFile));
    }

    #[test]
    fn rejects_unrelated_text() {
        let text = "GET /index.html HTTP/1.1\nHost: example.com\n";
        assert_eq!(validate(text), Err(ValidationError::UnrecognizedFormat));
    }

    #[test]
    fn screens_extensions() {
        assert_eq!(validate_extension("map1.txt"), Ok(()));
        assert_eq!(validate_extension("MAP2.CSV"), Ok(()));
        assert_eq!(
            validate_extension("demo.dem"),
            Err(ValidationError::UnsupportedExtension)
        );
    }
}
