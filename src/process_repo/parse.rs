// Parse `ps` and `lsof -Fn` output.

use crate::models::{DevProcess, ParseReport, ProcessDetails};
use chrono::{Local, NaiveDateTime, TimeZone};
use regex::Regex;
use std::sync::LazyLock;

// <pid> <cpu> <mem> <name> <rest-of-line-as-command>
static PS_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\s+([\d.]+)\s+([\d.]+)\s+(\S+)\s+(.*)$").expect("valid regex")
});

// <user> <lstart: Sun Oct 18 09:15:42 2026> <args>
static DETAILS_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\S+)\s+(\w{3}\s+\w{3}\s+\d{1,2}\s+\d{1,2}:\d{2}:\d{2}\s+\d{4})\s+(.*)$")
        .expect("valid regex")
});

/// Parses CPU-sorted `ps -o pid,pcpu,pmem,comm,args` output. The header line is
/// skipped and at most `max_rows` data lines are read; lines that do not fit the
/// five-column shape are reported as failures.
pub fn parse_ps(output: &str, max_rows: usize) -> ParseReport<DevProcess> {
    let mut report = ParseReport::default();
    for (i, line) in output.lines().enumerate().skip(1).take(max_rows) {
        match parse_ps_line(line) {
            Some(p) => report.records.push(p),
            None => report.skip(i + 1, line, "expected <pid> <cpu> <mem> <name> <command>"),
        }
    }
    report
}

pub fn parse_ps_line(line: &str) -> Option<DevProcess> {
    let caps = PS_LINE.captures(line.trim())?;
    Some(DevProcess {
        pid: caps[1].parse().ok()?,
        cpu: caps[2].parse().ok()?,
        memory: caps[3].parse().ok()?,
        name: caps[4].to_string(),
        command: caps[5].trim_end().to_string(),
        cwd: None,
    })
}

/// Extracts the working directory from `lsof -a -p <pid> -d cwd -Fn` output.
///
/// Field output is one record per line, prefixed by its field letter (`p`, `f`, `n`).
/// The path is the first `n` record following an `fcwd` record, or the first `n`
/// record when no descriptor records are present.
pub fn parse_lsof_cwd(output: &str) -> Option<String> {
    let mut saw_fd = false;
    let mut in_cwd = false;
    for line in output.lines() {
        if let Some(fd) = line.strip_prefix('f') {
            saw_fd = true;
            in_cwd = fd == "cwd";
        } else if let Some(name) = line.strip_prefix('n')
            && (in_cwd || !saw_fd)
            && !name.is_empty()
        {
            return Some(name.to_string());
        }
    }
    None
}

/// Parses `ps -o user=,lstart=,args= -p <pid>` output.
pub fn parse_process_details(output: &str) -> Option<ProcessDetails> {
    let line = output.lines().find(|l| !l.trim().is_empty())?;
    let caps = DETAILS_LINE.captures(line.trim())?;
    Some(ProcessDetails {
        user: caps[1].to_string(),
        start_time: lstart_to_rfc3339(&caps[2]),
        command: caps[3].trim_end().to_string(),
    })
}

/// `ps` prints lstart in local time, e.g. `Sun Oct 18 09:15:42 2026`.
fn lstart_to_rfc3339(lstart: &str) -> Option<String> {
    let normalized = lstart.split_whitespace().collect::<Vec<_>>().join(" ");
    let naive = NaiveDateTime::parse_from_str(&normalized, "%a %b %d %H:%M:%S %Y").ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.to_rfc3339())
}
