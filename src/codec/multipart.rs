use data_encoding::HEXLOWER;
use sha2::{Digest, Sha256};
use super::Reconstructor;
use crate::errors::OracleError;
use crate::models::Node;

/// Boundary derived from the field list so identical input always encodes identically.
pub fn boundary_for(fields: &[(String, String)]) -> String {
    let mut hasher = Sha256::new();
    for (name, value) in fields {
        hasher.update(name.as_bytes());
        hasher.update([0u8]);
        hasher.update(value.as_bytes());
        hasher.update([0u8]);
    }
    let digest = hasher.finalize();
    format!("----------------{}", HEXLOWER.encode(&digest[..12]))
}

/// Encode fields as `multipart/form-data`, returning (content type, body).
pub fn encode_multipart(fields: &[(String, String)]) -> (String, String) {
    let boundary = boundary_for(fields);
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!("--{}\r\n", boundary));
        body.push_str(&format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name));
        body.push_str(value);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{}--\r\n", boundary));
    (format!("multipart/form-data; boundary={}", boundary), body)
}

impl Reconstructor<'_> {
    /// One field per name/value pair. A suppressed value keeps the field empty.
    pub fn multipart(&mut self, tree: &Node) -> Result<(String, String), OracleError> {
        let mut fields = Vec::new();
        for pair in tree.sorted_children() {
            let (name, value) = self.pair_terminals(pair, "multipart field")?;
            let Some(name) = self.leaf(name, "multipart field name")?.text() else {
                continue;
            };
            let value = self.leaf(value, "multipart field value")?.text().unwrap_or("");
            fields.push((name.to_string(), value.to_string()));
        }
        Ok(encode_multipart(&fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DmType, Mutation};

    fn upload() -> Node {
        let pair = |i: i64, n: &str, v: &str| {
            Node::non_terminal(
                &format!("f{}", i),
                "multipart-field",
                i,
                vec![
                    Node::terminal(&format!("n{}", i), "param-name", 0, n),
                    Node::terminal(&format!("v{}", i), "param-value", 1, v),
                ],
            )
        };
        Node::non_terminal("mp", "body", 0, vec![pair(0, "csrf", "tok"), pair(1, "title", "hello")])
            .with_dm_type(DmType::Multipart)
    }

    #[test]
    fn test_framing() {
        let fields = vec![("a".to_string(), "1".to_string())];
        let (content_type, body) = encode_multipart(&fields);
        let boundary = boundary_for(&fields);
        assert_eq!(content_type, format!("multipart/form-data; boundary={}", boundary));
        assert_eq!(
            body,
            format!(
                "--{b}\r\nContent-Disposition: form-data; name=\"a\"\r\n\r\n1\r\n--{b}--\r\n",
                b = boundary
            )
        );
    }

    #[test]
    fn test_deterministic() {
        let a = Reconstructor::new(None).multipart(&upload()).unwrap();
        let b = Reconstructor::new(None).multipart(&upload()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_suppressed_value() {
        let m = Mutation::strip("v0");
        let (_, body) = Reconstructor::new(Some(&m)).multipart(&upload()).unwrap();
        assert!(!body.contains("tok\r\n"));
        assert!(body.contains("name=\"csrf\"\r\n\r\n\r\n"));
        assert!(body.contains("hello"));
    }
}
