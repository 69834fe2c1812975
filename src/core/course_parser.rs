use log::{debug, warn};

use crate::error::scrape::ScrapeError;
use crate::model::course::CourseRecord;
use crate::utils::text::join_lines;

const CREDITS_MARKER: &str = "Credits";

/// Byte offsets of one recognised entry inside a department block.
///
/// `start..code_end` is the course code, `start..end` runs through the
/// closing `Credits` marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourseSpan {
    pub start: usize,
    pub code_end: usize,
    pub end: usize,
}

/// Length of a course code token (2-3 ASCII letters then 3 digits) starting
/// at `at`, preferring the three-letter form.
fn code_token_len(bytes: &[u8], at: usize) -> Option<usize> {
    [3usize, 2].into_iter().find_map(|letters| {
        let token = bytes.get(at..at + letters + 3)?;
        let (prefix, digits) = token.split_at(letters);
        (prefix.iter().all(u8::is_ascii_alphabetic) && digits.iter().all(u8::is_ascii_digit))
            .then_some(letters + 3)
    })
}

/// Walks a block left to right yielding non-overlapping course spans.
///
/// From each code token the scan moves forward until it meets either the
/// `Credits` marker (the entry ends there) or another code token (the entry
/// is abandoned and scanning resumes at that token). An entry therefore never
/// contains a second course code.
pub struct CourseScanner<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> CourseScanner<'a> {
    pub fn new(block: &'a str) -> Self {
        CourseScanner {
            bytes: block.as_bytes(),
            pos: 0,
        }
    }
}

impl Iterator for CourseScanner<'_> {
    type Item = CourseSpan;

    fn next(&mut self) -> Option<CourseSpan> {
        let bytes = self.bytes;
        let marker = CREDITS_MARKER.as_bytes();

        while self.pos < bytes.len() {
            let start = self.pos;
            let Some(code_len) = code_token_len(bytes, start) else {
                self.pos += 1;
                continue;
            };
            let code_end = start + code_len;

            let mut cursor = code_end;
            loop {
                if cursor >= bytes.len() {
                    // No marker left anywhere after this point.
                    self.pos = bytes.len();
                    return None;
                }
                if bytes[cursor..].starts_with(marker) {
                    let end = cursor + marker.len();
                    self.pos = end;
                    return Some(CourseSpan {
                        start,
                        code_end,
                        end,
                    });
                }
                if code_token_len(bytes, cursor).is_some() {
                    break;
                }
                cursor += 1;
            }
            self.pos = cursor;
        }
        None
    }
}

/// Finds the offset where a credit value (`4`, `4.0`, ...) followed by
/// whitespace and `Credits` begins. The search starts after the code so the
/// code's own digits are never read as credits.
fn credits_offset(entry: &str, code_len: usize) -> Option<usize> {
    (code_len..entry.len()).find(|&at| credit_phrase_at(entry, at))
}

fn credit_phrase_at(entry: &str, at: usize) -> bool {
    let bytes = entry.as_bytes();
    let digits = |from: usize| bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count();

    let whole = digits(at);
    if whole == 0 {
        return false;
    }
    let mut cursor = at + whole;
    if bytes.get(cursor) == Some(&b'.') {
        let fraction = digits(cursor + 1);
        if fraction > 0 {
            cursor += 1 + fraction;
        }
    }

    let rest = &entry[cursor..];
    let trimmed = rest.trim_start();
    trimmed.len() < rest.len() && trimmed.starts_with(CREDITS_MARKER)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn course_from_span(block: &str, span: CourseSpan, department: &str) -> Result<CourseRecord, ScrapeError> {
    let code = &block[span.start..span.code_end];
    let entry = &block[span.start..span.end];

    let split = credits_offset(entry, code.len()).ok_or_else(|| {
        ScrapeError::layout(format!(
            "course {code} has no credit value before '{CREDITS_MARKER}'"
        ))
    })?;
    let title = collapse_whitespace(&entry[code.len()..split]);
    let credits = entry[split..]
        .trim_end()
        .strip_suffix(CREDITS_MARKER)
        .unwrap_or(&entry[split..])
        .trim();

    Ok(CourseRecord::new(code, &title, credits, department))
}

/// Parses one department block into its courses.
///
/// The department name is everything before the first course entry, with
/// line breaks turned into spaces. A block with no entries is a layout error:
/// there is nothing to anchor the department name on.
pub fn parse_department_block(block: &str) -> Result<Vec<CourseRecord>, ScrapeError> {
    let spans: Vec<CourseSpan> = CourseScanner::new(block).collect();
    let first = spans
        .first()
        .ok_or_else(|| ScrapeError::layout("department block contains no course entries"))?;

    let department = join_lines(&block[..first.start]);
    if department.is_empty() {
        warn!("department block starts directly with a course entry; department name is empty");
    }

    spans
        .into_iter()
        .map(|span| course_from_span(block, span, &department))
        .collect()
}

/// Splits the document on `delimiter`, dropping the preamble before the first
/// department.
pub fn split_departments<'a>(text: &'a str, delimiter: &str) -> Vec<&'a str> {
    text.split(delimiter).skip(1).collect()
}

/// Parses the whole course document into one course list per department, in
/// document order. Any failing block fails the document.
pub fn parse_course_document(
    text: &str,
    delimiter: &str,
) -> Result<Vec<Vec<CourseRecord>>, ScrapeError> {
    let blocks = split_departments(text, delimiter);
    if blocks.is_empty() {
        return Err(ScrapeError::layout(format!(
            "no department section starts with '{}'",
            delimiter.trim()
        )));
    }

    blocks
        .iter()
        .enumerate()
        .map(|(index, block)| {
            let courses = parse_department_block(block).map_err(|err| {
                ScrapeError::layout(format!("department block {}: {}", index + 1, err.message))
            })?;
            debug!(
                "block {}: {} courses for '{}'",
                index + 1,
                courses.len(),
                courses.first().map(|c| c.department.as_str()).unwrap_or_default()
            );
            Ok(courses)
        })
        .collect()
}
