use crate::ir::Author;
use once_cell::sync::Lazy;
use regex::Regex;

/// `git log --date=iso --format=...` output in the field order below.
pub const LOG_FORMAT: &str =
    "hash:%h,parents:%p,branch:%S,msg:%s,cdate:%cd,adate:%ad,author:%an,email:%ae";

static LOG_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^hash:(?P<hash>[0-9a-fA-F]+),parents:(?P<parents>[0-9a-fA-F ]*),branch:(?P<branch>\S+),msg:(?P<message>.*),cdate:(?P<cdate>\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2} [+-]\d{4}),adate:(?P<adate>\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2} [+-]\d{4})(?:,author:(?P<author>[^,]*),email:(?P<email>.*))?$",
    )
    .unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub hash: String,
    pub parents: Vec<String>,
    pub branch: String,
    pub message: String,
    pub committer_date: String,
    pub author_date: String,
    pub author: Option<Author>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    /// 1-based line number in the input.
    pub line_number: usize,
    pub line: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedLog {
    pub entries: Vec<LogEntry>,
    pub failures: Vec<ParseFailure>,
}

impl ParsedLog {
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Parses line-oriented log records. Malformed lines are skipped and reported
/// in `failures`; they never abort the batch.
pub fn parse_git_log(input: &str) -> ParsedLog {
    let mut parsed = ParsedLog::default();
    for (idx, raw_line) in input.lines().enumerate() {
        let line = raw_line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        match parse_log_line(line) {
            Some(entry) => parsed.entries.push(entry),
            None => {
                tracing::warn!(line_number = idx + 1, "skipping malformed log line");
                parsed.failures.push(ParseFailure {
                    line_number: idx + 1,
                    line: line.to_string(),
                });
            }
        }
    }
    tracing::debug!(
        entries = parsed.entries.len(),
        failures = parsed.failures.len(),
        "parsed git log"
    );
    parsed
}

fn parse_log_line(line: &str) -> Option<LogEntry> {
    let caps = LOG_LINE_RE.captures(line.trim())?;
    let parents = caps
        .name("parents")
        .map(|m| {
            m.as_str()
                .split_whitespace()
                .map(|hash| hash.to_string())
                .collect()
        })
        .unwrap_or_default();
    let author = parse_author(
        caps.name("author").map(|m| m.as_str()),
        caps.name("email").map(|m| m.as_str()),
    );
    Some(LogEntry {
        hash: caps["hash"].to_string(),
        parents,
        branch: caps["branch"].to_string(),
        message: caps["message"].to_string(),
        committer_date: caps["cdate"].to_string(),
        author_date: caps["adate"].to_string(),
        author,
    })
}

fn parse_author(name: Option<&str>, email: Option<&str>) -> Option<Author> {
    let name = name.map(str::trim).filter(|v| !v.is_empty());
    let email = email.map(str::trim).filter(|v| !v.is_empty());
    if name.is_none() && email.is_none() {
        return None;
    }
    Some(Author {
        name: name.map(str::to_string),
        email: email.map(str::to_string),
    })
}
