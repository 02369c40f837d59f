//! Minimal `multipart/form-data` body builder.

use uuid::Uuid;

/// A hand-assembled multipart body and its boundary.
#[derive(Debug, Clone)]
pub struct MultipartBody {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self {
            boundary: format!("concierge-{}", Uuid::new_v4().simple()),
            body: Vec::new(),
        }
    }

    /// Append a plain text field.
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body
            .extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
        self.body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        self.body.extend_from_slice(value.as_bytes());
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Append a file part.
    pub fn file(mut self, name: &str, file_name: &str, mime_type: &str, bytes: &[u8]) -> Self {
        self.body.reserve(bytes.len() + 256);
        self.body
            .extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
        self.body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{}\"\r\n",
                escape_quotes(file_name)
            )
            .as_bytes(),
        );
        self.body
            .extend_from_slice(format!("Content-Type: {mime_type}\r\n\r\n").as_bytes());
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Value for the `Content-Type` header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Close the body and return its bytes.
    pub fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        self.body
    }
}

impl Default for MultipartBody {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_quotes(value: &str) -> String {
    value.replace('"', "%22")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_contains_fields_file_and_terminator() {
        let form = MultipartBody::new()
            .text("rag_id", "kb-1")
            .file("file", "notes.txt", "text/plain", b"hello");
        let content_type = form.content_type();
        let boundary = content_type
            .strip_prefix("multipart/form-data; boundary=")
            .unwrap()
            .to_string();
        let body = String::from_utf8(form.finish()).unwrap();

        assert!(body.starts_with(&format!("--{boundary}\r\n")));
        assert!(body.contains("name=\"rag_id\"\r\n\r\nkb-1\r\n"));
        assert!(body.contains("filename=\"notes.txt\""));
        assert!(body.contains("Content-Type: text/plain\r\n\r\nhello\r\n"));
        assert!(body.ends_with(&format!("--{boundary}--\r\n")));
    }

    #[test]
    fn quotes_in_file_names_are_escaped() {
        let body = MultipartBody::new()
            .file("file", "a\"b.pdf", "application/pdf", b"%PDF")
            .finish();
        let text = String::from_utf8_lossy(&body);
        assert!(text.contains("filename=\"a%22b.pdf\""));
    }
}
