// Parse `lsof -iTCP -sTCP:LISTEN -P -n` output.

use crate::models::{ListeningPort, ParseReport, WILDCARD_ADDRESS};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

const MIN_TOKENS: usize = 9;
const NAME_TOKEN: usize = 8;

// <address>:<port> at the end of the NAME token; address may be *, IPv4 or [IPv6]
static ADDRESS_PORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+):(\d+)$").expect("valid regex"));

/// Listening sockets, deduplicated on (port, pid) with the first occurrence kept,
/// sorted by port.
///
/// ```text
/// COMMAND   PID USER   FD   TYPE  DEVICE SIZE/OFF NODE NAME
/// node    12345 dev    23u  IPv4  0x1234      0t0  TCP *:3000 (LISTEN)
/// ```
pub fn parse_lsof_listen(output: &str) -> ParseReport<ListeningPort> {
    let mut report = ParseReport::default();
    let mut seen: HashSet<(u16, u32)> = HashSet::new();

    for (i, line) in output.lines().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < MIN_TOKENS {
            report.skip(i + 1, line, "fewer than 9 columns");
            continue;
        }
        let Ok(pid) = tokens[1].parse::<u32>() else {
            report.skip(i + 1, line, "pid is not numeric");
            continue;
        };
        let Some((address, port)) = split_address_port(tokens[NAME_TOKEN]) else {
            report.skip(i + 1, line, "no <address>:<port> in NAME column");
            continue;
        };
        if !seen.insert((port, pid)) {
            continue;
        }
        report
            .records
            .push(ListeningPort::new(port, address, pid, tokens[0].to_string()));
    }

    report.records.sort_by_key(|p| p.port);
    report
}

/// `*:3000` -> ("0.0.0.0", 3000); `[::1]:5432` -> ("[::1]", 5432). Port 0 is rejected.
pub fn split_address_port(token: &str) -> Option<(String, u16)> {
    let caps = ADDRESS_PORT.captures(token)?;
    let port: u16 = caps[2].parse().ok().filter(|p| *p > 0)?;
    let address = match &caps[1] {
        "*" => WILDCARD_ADDRESS.to_string(),
        other => other.to_string(),
    };
    Some((address, port))
}
