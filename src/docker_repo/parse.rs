// Parse `docker ps` / `docker stats` text output into container records.

use crate::models::{ContainerRecord, ContainerState, ContainerUsage, ParseReport, PortBinding};
use regex::Regex;
use std::sync::LazyLock;

/// Go template for `docker ps --format`; fields are `|`-separated.
pub const LIST_FORMAT: &str =
    "{{.ID}}|{{.Names}}|{{.Image}}|{{.Status}}|{{.State}}|{{.Ports}}|{{.CreatedAt}}";

/// Go template for `docker stats --no-stream --format`.
pub const STATS_FORMAT: &str = "{{.ID}}|{{.CPUPerc}}|{{.MemUsage}}";

const DELIMITER: char = '|';
const LIST_FIELDS: usize = 7;

// [address:]hostPort[-end]->containerPort[-end]/proto, or containerPort[-end]/proto
static PORT_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:.*):(?P<host>\d+)(?:-\d+)?->)?(?P<container>\d+)(?:-\d+)?/(?P<proto>\w+)$")
        .expect("valid regex")
});

/// Parses the full `docker ps` output. Lines without exactly seven fields are skipped.
pub fn parse_container_list(output: &str) -> ParseReport<ContainerRecord> {
    let mut report = ParseReport::default();
    for (i, line) in output.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_container_line(line) {
            Some(record) => report.records.push(record),
            None => report.skip(i + 1, line, "expected 7 |-separated fields"),
        }
    }
    report
}

pub fn parse_container_line(line: &str) -> Option<ContainerRecord> {
    let fields: Vec<&str> = line.trim_end_matches('\r').split(DELIMITER).collect();
    if fields.len() != LIST_FIELDS {
        return None;
    }
    let [id, name, image, status, state, ports, created] = fields[..] else {
        return None;
    };
    Some(ContainerRecord {
        id: id.trim().to_string(),
        name: name.trim().to_string(),
        image: image.trim().to_string(),
        status: status.trim().to_string(),
        state: ContainerState::from_docker(state),
        ports: parse_ports(ports),
        created: created.trim().to_string(),
        cpu: None,
        memory: None,
    })
}

/// Parses the `Ports` column, e.g. `0.0.0.0:8080->80/tcp, :::8080->80/tcp, 443/tcp`.
/// Unrecognised entries are ignored; identical bindings are kept once.
pub fn parse_ports(field: &str) -> Vec<PortBinding> {
    let mut out: Vec<PortBinding> = Vec::new();
    for entry in field.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let Some(caps) = PORT_ENTRY.captures(entry) else {
            continue;
        };
        let Some(container) = caps.name("container").and_then(|m| m.as_str().parse().ok())
        else {
            continue;
        };
        let host = caps.name("host").and_then(|m| m.as_str().parse().ok());
        let binding = PortBinding {
            host,
            container,
            protocol: caps["proto"].to_string(),
        };
        if !out.contains(&binding) {
            out.push(binding);
        }
    }
    out
}

pub fn parse_stats(output: &str) -> ParseReport<ContainerUsage> {
    let mut report = ParseReport::default();
    for (i, line) in output.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.trim_end_matches('\r').split(DELIMITER).collect();
        match fields[..] {
            [id, cpu, memory] if !id.trim().is_empty() => report.records.push(ContainerUsage {
                id: id.trim().to_string(),
                cpu: cpu.trim().to_string(),
                memory: memory.trim().to_string(),
            }),
            _ => report.skip(i + 1, line, "expected 3 |-separated fields"),
        }
    }
    report
}

/// Attaches usage to running records. Ids match when either is a prefix of the
/// other, since the runtime may print short or full ids.
pub fn apply_usage(records: &mut [ContainerRecord], usage: &[ContainerUsage]) {
    for record in records.iter_mut().filter(|r| r.is_running()) {
        if let Some(u) = usage.iter().find(|u| ids_match(&record.id, &u.id)) {
            record.cpu = Some(u.cpu.clone());
            record.memory = Some(u.memory.clone());
        }
    }
}

fn ids_match(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a.starts_with(b) || b.starts_with(a))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_line_into_seven_fields() {
        let line = "abc123|web|nginx:latest|Up 2 hours|running|0.0.0.0:8080->80/tcp, 443/tcp|2026-01-15 10:00:00 +0000 UTC";
        let c = parse_container_line(line).unwrap();
        assert_eq!(c.id, "abc123");
        assert_eq!(c.name, "web");
        assert_eq!(c.image, "nginx:latest");
        assert_eq!(c.status, "Up 2 hours");
        assert_eq!(c.state, ContainerState::Running);
        assert_eq!(c.created, "2026-01-15 10:00:00 +0000 UTC");
        assert_eq!(
            c.ports,
            vec![
                PortBinding {
                    host: Some(8080),
                    container: 80,
                    protocol: "tcp".into()
                },
                PortBinding {
                    host: None,
                    container: 443,
                    protocol: "tcp".into()
                },
            ]
        );
        assert!(c.cpu.is_none());
        assert!(c.memory.is_none());
    }

    #[test]
    fn wrong_field_count_is_skipped() {
        let out = "a|b|c\nabc|db|postgres:16|Exited (0) 3 days ago|exited||2026-01-01\n";
        let report = parse_container_list(out);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].state, ContainerState::Exited);
        assert!(report.records[0].ports.is_empty());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].line, 1);
    }

    #[test]
    fn unknown_state_maps_to_other() {
        let c = parse_container_line("x|y|z|Created|created||now").unwrap();
        assert_eq!(c.state, ContainerState::Other);
    }

    #[test]
    fn ipv6_duplicate_publication_is_kept_once() {
        let ports = parse_ports("0.0.0.0:5432->5432/tcp, :::5432->5432/tcp");
        assert_eq!(ports.len(), 1);
        assert_eq!(ports[0].host, Some(5432));
    }

    #[test]
    fn port_ranges_collapse_to_first_port() {
        let ports = parse_ports("0.0.0.0:8000-8001->9000-9001/tcp, 53/udp");
        assert_eq!(ports[0].host, Some(8000));
        assert_eq!(ports[0].container, 9000);
        assert_eq!(ports[1].protocol, "udp");
    }

    #[test]
    fn garbage_port_entries_are_ignored() {
        assert!(parse_ports("not a port, ->/tcp").is_empty());
    }

    #[test]
    fn usage_attaches_by_id_prefix_to_running_only() {
        let mut records = vec![
            parse_container_line("abc123def456|web|nginx|Up|running||now").unwrap(),
            parse_container_line("fff000|old|redis|Exited (0)|exited||now").unwrap(),
        ];
        let usage = parse_stats("abc123def456789|0.50%|50MiB / 512MiB\nfff000|1.00%|1MiB / 1GiB\n")
            .records;
        apply_usage(&mut records, &usage);
        assert_eq!(records[0].cpu.as_deref(), Some("0.50%"));
        assert_eq!(records[0].memory.as_deref(), Some("50MiB / 512MiB"));
        assert!(records[1].cpu.is_none());
    }

    #[test]
    fn stats_lines_with_missing_fields_are_skipped() {
        let report = parse_stats("abc|1%\n");
        assert!(report.records.is_empty());
        assert_eq!(report.failures.len(), 1);
    }
}
