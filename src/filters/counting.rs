//! Count how often each active filter matches in a set of log files.
//!
//! Files are processed in parallel; each file is read line by line so a match
//! never spans a line break. Unreadable files are reported, not fatal.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::ops::Range;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use regex::Regex;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::request::FilterRequest;

/// Thread-safe copy of what counting needs from a filter
#[derive(Debug, Clone)]
pub struct CountPattern {
    pub uuid: String,
    pub label: String,
    pub regex: Regex,
}

impl From<&FilterRequest> for CountPattern {
    fn from(filter: &FilterRequest) -> Self {
        Self {
            uuid: filter.uuid().to_string(),
            label: filter.definition().filter.filter.clone(),
            regex: filter.as_regex().clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCounts {
    pub path: PathBuf,
    /// One count per pattern, in pattern order
    pub counts: Vec<usize>,
    pub error: Option<String>,
}

/// One line matched by a pattern; `ranges` are byte ranges into `text`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedLine {
    pub number: usize,
    pub text: String,
    pub ranges: Vec<Range<usize>>,
}

/// Matches of one pattern in one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchListing {
    pub label: String,
    pub total: usize,
    /// The first matched lines, up to the requested limit
    pub lines: Vec<MatchedLine>,
}

/// Expand directories into the regular files below them; files are kept as given.
/// The result is sorted and deduplicated.
pub fn collect_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).follow_links(false) {
                match entry {
                    Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
                    Ok(_) => {}
                    Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable entry"),
                }
            }
        } else {
            files.push(path.clone());
        }
    }
    files.sort();
    files.dedup();
    files
}

fn count_file(path: &Path, patterns: &[CountPattern]) -> FileCounts {
    let mut counts = vec![0; patterns.len()];
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            return FileCounts { path: path.to_path_buf(), counts, error: Some(e.to_string()) };
        }
    };
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                for (count, pattern) in counts.iter_mut().zip(patterns) {
                    *count += pattern.regex.find_iter(&line).count();
                }
            }
            Err(e) => {
                return FileCounts { path: path.to_path_buf(), counts, error: Some(e.to_string()) };
            }
        }
    }
    debug!(path = %path.display(), ?counts, "file counted");
    FileCounts { path: path.to_path_buf(), counts, error: None }
}

/// Count every pattern in every file
pub fn count_matches(files: &[PathBuf], patterns: &[CountPattern]) -> Vec<FileCounts> {
    files.par_iter().map(|path| count_file(path, patterns)).collect()
}

/// Collect the lines of `path` matched by `pattern`, keeping at most `limit`
/// of them while still counting every match
pub fn find_matches(
    path: &Path,
    pattern: &CountPattern,
    limit: usize,
) -> std::io::Result<MatchListing> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut listing = MatchListing { label: pattern.label.clone(), total: 0, lines: Vec::new() };
    let mut buf = Vec::new();
    let mut number = 0;
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        number += 1;
        let line = String::from_utf8_lossy(&buf);
        let text = line.trim_end_matches(['\n', '\r']);
        let ranges: Vec<Range<usize>> =
            pattern.regex.find_iter(text).map(|found| found.range()).collect();
        if ranges.is_empty() {
            continue;
        }
        listing.total += ranges.len();
        if listing.lines.len() < limit {
            listing.lines.push(MatchedLine { number, text: text.to_string(), ranges });
        }
    }
    debug!(path = %path.display(), label = %listing.label, total = listing.total, "matches listed");
    Ok(listing)
}

/// Per-pattern totals across all files
pub fn totals(results: &[FileCounts], patterns: usize) -> Vec<usize> {
    let mut totals = vec![0; patterns];
    for result in results {
        for (total, count) in totals.iter_mut().zip(&result.counts) {
            *total += count;
        }
    }
    totals
}
