use std::path::Path;

use serde::de::DeserializeOwned;

use crate::failure::Rejection;

/// Decode a JSON request body given inline or as `@path`.
///
/// Unknown fields are rejected by the input types themselves.
pub fn read_payload<T>(raw: &str, what: &str) -> Result<T, Rejection>
where
    T: DeserializeOwned,
{
    let body = match raw.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(Path::new(path)).map_err(|error| {
            Rejection::Invalid(format!("cannot read {what} body from {path}: {error}"))
        })?,
        None => raw.to_string(),
    };
    serde_json::from_str(&body)
        .map_err(|error| Rejection::Invalid(format!("invalid {what} body: {error}")))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use reg_db::updates::course::{CourseUpdate, NewCourse};

    use super::read_payload;

    #[test]
    fn inline_body_uses_input_defaults() {
        let course: NewCourse =
            read_payload(r#"{"code": "CS101", "title": "Intro"}"#, "course").unwrap();
        assert_eq!(course.code, "CS101");
        assert_eq!(course.credits, 3);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = read_payload::<CourseUpdate>(r#"{"code": "CS999"}"#, "course update")
            .expect_err("code is not updatable");
        assert!(err.to_string().starts_with("invalid course update body"));
    }

    #[test]
    fn at_prefix_reads_a_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"title": "Renamed"}}"#).unwrap();
        let raw = format!("@{}", file.path().display());
        let update: CourseUpdate = read_payload(&raw, "course update").unwrap();
        assert_eq!(update.title.as_deref(), Some("Renamed"));
    }

    #[test]
    fn missing_file_is_invalid_input() {
        let err = read_payload::<CourseUpdate>("@/nonexistent/body.json", "course update")
            .expect_err("file does not exist");
        assert!(err.to_string().contains("cannot read course update body"));
    }
}
