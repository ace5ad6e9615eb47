use serde::{Deserialize, Serialize};

/// Semantic role of a parse tree node or event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DmType {
    #[serde(rename = "URL")]
    Url,
    HttpRequest,
    HttpResponse,
    Cookie,
    SetCookie,
    Multipart,
    #[serde(rename = "FormURLEncoded")]
    FormUrlEncoded,
    #[serde(rename = "JSON")]
    Json,
    #[serde(rename = "SQLQuery")]
    SqlQuery,
    AbsQuery,
    AbsHttpRequest,
    Xdebug,
    #[serde(rename = "PHPSession")]
    PhpSession,
    SeleneseCommand,
}

impl DmType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Url => "URL",
            Self::HttpRequest => "HttpRequest",
            Self::HttpResponse => "HttpResponse",
            Self::Cookie => "Cookie",
            Self::SetCookie => "SetCookie",
            Self::Multipart => "Multipart",
            Self::FormUrlEncoded => "FormURLEncoded",
            Self::Json => "JSON",
            Self::SqlQuery => "SQLQuery",
            Self::AbsQuery => "AbsQuery",
            Self::AbsHttpRequest => "AbsHttpRequest",
            Self::Xdebug => "Xdebug",
            Self::PhpSession => "PHPSession",
            Self::SeleneseCommand => "SeleneseCommand",
        }
    }

    /// The body encoding this type stands for, if it is one of the parsed body kinds.
    pub fn body_kind(&self) -> Option<BodyKind> {
        match self {
            Self::Multipart => Some(BodyKind::Multipart),
            Self::FormUrlEncoded => Some(BodyKind::FormUrlEncoded),
            Self::Json => Some(BodyKind::Json),
            _ => None,
        }
    }
}

impl std::fmt::Display for DmType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body encodings the codec knows how to rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Multipart,
    FormUrlEncoded,
    Json,
    /// Unparsed body, reproduced from the captured text.
    Opaque,
}

/// A node of a captured parse tree.
///
/// A nonterminal that carries a `dm_type` is the root of an embedded tree
/// (a URL inside a header, a cookie header, a request body) and keeps the
/// raw captured text in `message`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub uuid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dm_type: Option<DmType>,
    pub s_type: String,
    #[serde(default)]
    pub pos: i64,
    #[serde(flatten)]
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    Terminal {
        symbol: String,
    },
    NonTerminal {
        #[serde(default)]
        children: Vec<Node>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

impl Node {
    pub fn terminal(uuid: &str, s_type: &str, pos: i64, symbol: &str) -> Self {
        Self {
            uuid: uuid.to_string(),
            dm_type: None,
            s_type: s_type.to_string(),
            pos,
            kind: NodeKind::Terminal { symbol: symbol.to_string() },
        }
    }

    pub fn non_terminal(uuid: &str, s_type: &str, pos: i64, children: Vec<Node>) -> Self {
        Self {
            uuid: uuid.to_string(),
            dm_type: None,
            s_type: s_type.to_string(),
            pos,
            kind: NodeKind::NonTerminal { children, message: None },
        }
    }

    pub fn with_dm_type(mut self, dm_type: DmType) -> Self {
        self.dm_type = Some(dm_type);
        self
    }

    pub fn with_message(mut self, text: &str) -> Self {
        if let NodeKind::NonTerminal { message, .. } = &mut self.kind {
            *message = Some(text.to_string());
        }
        self
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, NodeKind::Terminal { .. })
    }

    pub fn symbol(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Terminal { symbol } => Some(symbol),
            NodeKind::NonTerminal { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::NonTerminal { message, .. } => message.as_deref(),
            NodeKind::Terminal { .. } => None,
        }
    }

    pub fn children(&self) -> &[Node] {
        match &self.kind {
            NodeKind::NonTerminal { children, .. } => children,
            NodeKind::Terminal { .. } => &[],
        }
    }

    /// Children ordered by `pos`; ties keep storage order.
    pub fn sorted_children(&self) -> Vec<&Node> {
        let mut children: Vec<&Node> = self.children().iter().collect();
        children.sort_by_key(|c| c.pos);
        children
    }

    /// Depth-first lookup of a node by identity.
    pub fn find(&self, uuid: &str) -> Option<&Node> {
        if self.uuid == uuid {
            return Some(self);
        }
        self.children().iter().find_map(|c| c.find(uuid))
    }

    pub fn contains(&self, uuid: &str) -> bool {
        self.find(uuid).is_some()
    }
}
