//! Recipient normalization: mailbox syntax checks and target deduplication.

use common::model::group::SkipReason;
use common::model::target::Target;
use log::warn;
use regex::Regex;
use rusqlite::{params, Connection};
use std::sync::LazyLock;

/// `atext` from RFC 5322 plus any non-ASCII character (RFC 6532).
const ATEXT: &str = r"[A-Za-z0-9!#$%&'*+/=?^_`{|}~\-[:^ascii:]]";

static SHARED: LazyLock<Result<MailboxParser, regex::Error>> = LazyLock::new(MailboxParser::new);

/// Parser for RFC 5322 mailboxes: either a bare `local@domain` or
/// `Display Name <local@domain>`. Parenthesized comments such as
/// `a@x.com (Alice)` or `Alice (work) <a@x.com>` are dropped before matching.
pub struct MailboxParser {
    addr_spec: Regex,
    display_name: Regex,
}

impl MailboxParser {
    pub fn new() -> Result<Self, regex::Error> {
        let dot_atom = format!(r"{a}+(?:\.{a}+)*", a = ATEXT);
        let quoted = r#""(?:[^"\\\r\n]|\\.)*""#;
        let literal = r"\[[^\[\]\\\r\n]*\]";
        let addr_spec = Regex::new(&format!(
            r"^(?:{dot}|{quoted})@(?:{dot}|{literal})$",
            dot = dot_atom,
            quoted = quoted,
            literal = literal
        ))?;
        // A phrase of atoms (dots tolerated, as older mailers emit them) or a
        // single quoted string.
        let display_name = Regex::new(&format!(
            r"^(?:{quoted}|(?:{a}|[.\t ])+)$",
            quoted = quoted,
            a = ATEXT
        ))?;
        Ok(Self {
            addr_spec,
            display_name,
        })
    }

    /// The process-wide parser, compiled on first use.
    pub fn shared() -> Result<&'static MailboxParser, &'static regex::Error> {
        (*SHARED).as_ref()
    }

    /// Returns the bare address if `raw` is a valid mailbox.
    pub fn parse(&self, raw: &str) -> Option<String> {
        let stripped = strip_comments(raw)?;
        let raw = stripped.trim();
        let addr = match raw.strip_suffix('>') {
            Some(rest) => {
                let open = rest.rfind('<')?;
                let display = rest[..open].trim();
                if !display.is_empty() && !self.display_name.is_match(display) {
                    return None;
                }
                rest[open + 1..].trim()
            }
            None => raw,
        };
        self.addr_spec.is_match(addr).then(|| addr.to_string())
    }
}

/// Removes RFC 5322 comments (nestable, outside quoted strings). `None` if
/// the parentheses or quotes are unbalanced.
fn strip_comments(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut depth = 0usize;
    let mut quoted = false;
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' if quoted || depth > 0 => {
                let escaped = chars.next()?;
                if depth == 0 {
                    out.push(c);
                    out.push(escaped);
                }
            }
            '"' if depth == 0 => {
                quoted = !quoted;
                out.push(c);
            }
            '(' if !quoted => depth += 1,
            ')' if !quoted => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    out.push(' ');
                }
            }
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    (depth == 0 && !quoted).then_some(out)
}

/// Validates `raw` and resolves it to the shared target row for that address,
/// inserting the row if this is the first time the address is seen.
///
/// The id is always read back by email, so a pre-existing target keeps its
/// id no matter which group first introduced it.
pub fn normalize(conn: &Connection, parser: &MailboxParser, raw: &str) -> Result<Target, SkipReason> {
    let email = parser.parse(raw).ok_or(SkipReason::InvalidEmail)?;

    conn.execute(
        "INSERT OR IGNORE INTO targets (email) VALUES (?1)",
        params![email],
    )
    .map_err(|e| {
        warn!("Error adding email {}: {}", email, e);
        SkipReason::Persistence
    })?;

    let id = conn
        .query_row(
            "SELECT id FROM targets WHERE email = ?1",
            params![email],
            |row| row.get(0),
        )
        .map_err(|e| {
            warn!("Error resolving target id for email {}: {}", email, e);
            SkipReason::Persistence
        })?;

    Ok(Target { id, email })
}
