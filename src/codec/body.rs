use super::Reconstructor;
use crate::errors::OracleError;
use crate::models::{BodyKind, Node};

/// A rebuilt request body. `content_type` is set only when the encoding
/// dictates one (multipart boundaries).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedBody {
    pub content_type: Option<String>,
    pub body: String,
}

impl Reconstructor<'_> {
    pub fn body(&mut self, tree: &Node) -> Result<EncodedBody, OracleError> {
        let kind = tree.dm_type.and_then(|d| d.body_kind()).unwrap_or(BodyKind::Opaque);
        match kind {
            BodyKind::Multipart => {
                let (content_type, body) = self.multipart(tree)?;
                Ok(EncodedBody { content_type: Some(content_type), body })
            }
            BodyKind::Json => Ok(EncodedBody { content_type: None, body: self.json(tree)? }),
            BodyKind::FormUrlEncoded => Ok(EncodedBody {
                content_type: None,
                body: self.form_urlencoded(tree)?,
            }),
            BodyKind::Opaque => {
                let body = if tree.is_terminal() {
                    self.leaf(tree, "opaque body")?.text().unwrap_or("").to_string()
                } else {
                    tree.message().unwrap_or("").to_string()
                };
                Ok(EncodedBody { content_type: None, body })
            }
        }
    }
}
