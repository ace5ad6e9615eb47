#![allow(dead_code)]

use csrf_oracle::codec::json::{JSON_KEY, JSON_MEMBER, JSON_OBJECT, JSON_STRING};
use csrf_oracle::graph::{GraphSnapshot, MemoryGraph};
use csrf_oracle::models::{
    AbstractEvent, AbstractParseTree, DmType, Event, Node, Variable, SESSION_UNIQUE,
};
use csrf_oracle::oracle::query_hash;

pub const INSERT_PAYMENT: &str = "INSERT INTO payments (account, amount) VALUES (3, 10)";
pub const SELECT_BALANCE: &str = "SELECT balance FROM accounts WHERE id = 3";
pub const INSERT_COMMENT: &str = "INSERT INTO comments (body) VALUES ('hi')";

fn header(id: &str, pos: i64, name: &str, value: Node) -> Node {
    Node::non_terminal(
        id,
        "header-field",
        pos,
        vec![Node::terminal(&format!("{}-name", id), "header-name", 0, name), value],
    )
}

fn url(prefix: &str, path: &str) -> Node {
    Node::non_terminal(
        &format!("{}-url", prefix),
        "request-target",
        1,
        vec![
            Node::terminal(&format!("{}-scheme", prefix), "scheme", 0, "https"),
            Node::terminal(&format!("{}-netloc", prefix), "netloc", 1, "shop.local"),
            Node::terminal(&format!("{}-path", prefix), "path", 2, path),
        ],
    )
    .with_dm_type(DmType::Url)
}

fn cookie(prefix: &str, sid: &str) -> Node {
    Node::non_terminal(
        &format!("{}-jar", prefix),
        "cookie",
        1,
        vec![Node::non_terminal(
            &format!("{}-pair", prefix),
            "cookie-pair",
            0,
            vec![
                Node::terminal(&format!("{}-cn", prefix), "cookie-name", 0, "sid"),
                Node::terminal(&format!("{}-cv", prefix), "cookie-value", 1, sid),
            ],
        )],
    )
    .with_dm_type(DmType::Cookie)
}

fn request_tree(prefix: &str, method: &str, path: &str, sid: &str, body: Option<Node>) -> Node {
    let mut children = vec![
        Node::non_terminal(
            &format!("{}-line", prefix),
            "request-line",
            0,
            vec![Node::terminal(&format!("{}-method", prefix), "method", 0, method), url(prefix, path)],
        ),
        Node::non_terminal(
            &format!("{}-headers", prefix),
            "headers",
            1,
            vec![
                header(
                    &format!("{}-h0", prefix),
                    0,
                    "Host",
                    Node::terminal(&format!("{}-h0-v", prefix), "header-value", 1, "shop.local"),
                ),
                header(&format!("{}-h1", prefix), 1, "Cookie", cookie(prefix, sid)),
            ],
        ),
    ];
    children.extend(body);
    Node::non_terminal(&format!("pt-{}", prefix), "http-request", 0, children).with_dm_type(DmType::HttpRequest)
}

fn json_member(id: &str, pos: i64, key: &str, value_id: &str, value: &str) -> Node {
    Node::non_terminal(
        id,
        JSON_MEMBER,
        pos,
        vec![
            Node::terminal(&format!("{}-k", id), JSON_KEY, 0, key),
            Node::terminal(value_id, JSON_STRING, 1, value),
        ],
    )
}

/// `{"csrf": <token>, "amount": "10"}` as a JSON body tree.
pub fn payment_body(prefix: &str, token: &str) -> Node {
    Node::non_terminal(
        &format!("{}-body", prefix),
        "body",
        2,
        vec![Node::non_terminal(
            &format!("{}-obj", prefix),
            JSON_OBJECT,
            0,
            vec![
                json_member(&format!("{}-m0", prefix), 0, "csrf", &format!("{}-csrf", prefix), token),
                json_member(&format!("{}-m1", prefix), 1, "amount", &format!("{}-amount", prefix), "10"),
            ],
        )],
    )
    .with_dm_type(DmType::Json)
}

fn comment_body(prefix: &str) -> Node {
    Node::non_terminal(
        &format!("{}-body", prefix),
        "body",
        2,
        vec![Node::non_terminal(
            &format!("{}-pair", prefix),
            "pair",
            0,
            vec![
                Node::terminal(&format!("{}-pn", prefix), "param-name", 0, "comment"),
                Node::terminal(&format!("{}-pv", prefix), "param-value", 1, "hi there"),
            ],
        )],
    )
    .with_dm_type(DmType::FormUrlEncoded)
}

pub fn payment_request(prefix: &str, token: &str) -> Node {
    request_tree(prefix, "POST", "/pay", "abc", Some(payment_body(prefix, token)))
}

fn event(uuid: &str, session: &str, dm_type: DmType, caused: &[&str]) -> Event {
    Event {
        uuid: uuid.into(),
        project: "shop".into(),
        session: session.into(),
        user: "alice".into(),
        dm_type,
        parse_tree: Some(format!("pt-{}", uuid)),
        caused: caused.iter().map(|s| s.to_string()).collect(),
    }
}

fn query_tree(uuid: &str) -> Node {
    Node::non_terminal(&format!("pt-{}", uuid), "query", 0, vec![])
}

fn variable(uuid: &str, event: &str, name: &str, value: &str, node: &str) -> Variable {
    Variable {
        uuid: uuid.into(),
        name: name.into(),
        value: value.into(),
        event: event.into(),
        node: node.into(),
        semtype: vec![SESSION_UNIQUE.into()],
        proptype: None,
    }
}

fn abstract_event(uuid: &str, operation: &str, events: &[&str]) -> AbstractEvent {
    AbstractEvent {
        uuid: uuid.into(),
        project: "shop".into(),
        operation: operation.into(),
        dm_type: DmType::AbsHttpRequest,
        events: events.iter().map(|s| s.to_string()).collect(),
    }
}

/// A shop with three operations:
/// - `pay`: CSRF-token protected JSON POST, captured in sessions s1 and s2,
///   firing a singleton INSERT and a repeated SELECT;
/// - `comment`: unprotected form POST firing a singleton INSERT;
/// - `view`: GET that fires nothing.
pub fn shop_snapshot() -> GraphSnapshot {
    GraphSnapshot {
        abstract_events: vec![
            abstract_event("ae-pay", "pay", &["r1", "r2"]),
            abstract_event("ae-comment", "comment", &["r6"]),
            abstract_event("ae-view", "view", &["r5"]),
        ],
        events: vec![
            event("r1", "s1", DmType::HttpRequest, &["q1", "q2", "q3"]),
            event("r2", "s2", DmType::HttpRequest, &["q4"]),
            event("r5", "s1", DmType::HttpRequest, &[]),
            event("r6", "s1", DmType::HttpRequest, &["q5"]),
            event("q1", "s1", DmType::Xdebug, &[]),
            event("q2", "s1", DmType::Xdebug, &[]),
            event("q3", "s1", DmType::Xdebug, &[]),
            event("q4", "s2", DmType::Xdebug, &[]),
            event("q5", "s1", DmType::Xdebug, &[]),
        ],
        parse_trees: vec![
            payment_request("r1", "tok-s1"),
            payment_request("r2", "tok-s2"),
            request_tree("r5", "GET", "/account", "abc", None),
            request_tree("r6", "POST", "/comment", "abc", Some(comment_body("r6"))),
            query_tree("q1"),
            query_tree("q2"),
            query_tree("q3"),
            query_tree("q4"),
            query_tree("q5"),
        ],
        abstract_parse_trees: vec![
            AbstractParseTree {
                uuid: "apt-insert".into(),
                message: query_hash(INSERT_PAYMENT),
                abstracts: vec!["pt-q1".into(), "pt-q4".into()],
            },
            AbstractParseTree {
                uuid: "apt-select".into(),
                message: query_hash(SELECT_BALANCE),
                abstracts: vec!["pt-q2".into(), "pt-q3".into()],
            },
            AbstractParseTree {
                uuid: "apt-comment".into(),
                message: query_hash(INSERT_COMMENT),
                abstracts: vec!["pt-q5".into()],
            },
        ],
        variables: vec![
            variable("v-csrf-1", "r1", "csrf", "tok-s1", "r1-csrf"),
            variable("v-csrf-2", "r2", "csrf", "tok-s2", "r2-csrf"),
            variable("v-sid-1", "r1", "request-cookie-pair", "abc", "r1-cv"),
            variable("v-sid-6", "r6", "request-cookie-pair", "abc", "r6-cv"),
        ],
    }
}

pub fn shop_graph() -> MemoryGraph {
    MemoryGraph::from_snapshot(shop_snapshot()).unwrap()
}
