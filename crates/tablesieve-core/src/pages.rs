use crate::error::SieveError;
use std::fmt;
use std::str::FromStr;

/// An inclusive page range; `end == None` runs to the last page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PageRange {
    start: usize,
    end: Option<usize>,
}

/// Which pages of a document to process: `all`, or a list like `1,3-5,8-end`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageSelection {
    ranges: Vec<PageRange>,
}

impl PageSelection {
    pub fn all() -> Self {
        PageSelection::default()
    }

    pub fn is_all(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Whether the 1-based `page` is selected.
    pub fn contains(&self, page: usize) -> bool {
        self.is_all()
            || self
                .ranges
                .iter()
                .any(|r| page >= r.start && r.end.map_or(true, |end| page <= end))
    }
}

impl FromStr for PageSelection {
    type Err = SieveError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        if input.eq_ignore_ascii_case("all") {
            return Ok(PageSelection::all());
        }

        let mut ranges = Vec::new();
        for token in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let range = match token.split_once('-') {
                Some((start, end)) => {
                    let start = parse_page(start)?;
                    let end = end.trim();
                    if end.eq_ignore_ascii_case("end") {
                        PageRange { start, end: None }
                    } else {
                        let end = parse_page(end)?;
                        if end < start {
                            return Err(SieveError::InvalidPageSelection(format!(
                                "range '{token}' ends before it starts"
                            )));
                        }
                        PageRange {
                            start,
                            end: Some(end),
                        }
                    }
                }
                None => {
                    let page = parse_page(token)?;
                    PageRange {
                        start: page,
                        end: Some(page),
                    }
                }
            };
            ranges.push(range);
        }

        if ranges.is_empty() {
            return Err(SieveError::InvalidPageSelection(
                "page selection cannot be empty".into(),
            ));
        }

        Ok(PageSelection { ranges })
    }
}

fn parse_page(s: &str) -> Result<usize, SieveError> {
    let s = s.trim();
    let page: usize = s
        .parse()
        .map_err(|_| SieveError::InvalidPageSelection(format!("invalid page number '{s}'")))?;
    if page == 0 {
        return Err(SieveError::InvalidPageSelection("pages are 1-based".into()));
    }
    Ok(page)
}

impl fmt::Display for PageSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_all() {
            return write!(f, "all");
        }
        let parts: Vec<String> = self
            .ranges
            .iter()
            .map(|r| match r.end {
                Some(end) if end == r.start => r.start.to_string(),
                Some(end) => format!("{}-{}", r.start, end),
                None => format!("{}-end", r.start),
            })
            .collect();
        write!(f, "{}", parts.join(","))
    }
}
