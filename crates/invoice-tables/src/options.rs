use std::collections::BTreeSet;
use std::str::FromStr;

/// 1-based pages to read, parsed from text like `1-3,5`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelection {
    pages: BTreeSet<u32>,
}

impl PageSelection {
    #[must_use]
    pub fn contains(&self, page: u32) -> bool {
        self.pages.contains(&page)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

fn parse_page_number(token: &str, what: &str) -> Result<u32, String> {
    let page = token
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid {what}: '{}'", token.trim()))?;
    if page == 0 {
        return Err("pages are 1-based".to_string());
    }
    Ok(page)
}

impl FromStr for PageSelection {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut pages = BTreeSet::new();
        for token in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match token.split_once('-') {
                Some((start, end)) => {
                    let start = parse_page_number(start, "page range start")?;
                    let end = parse_page_number(end, "page range end")?;
                    if end < start {
                        return Err(format!(
                            "invalid range '{token}': end is smaller than start"
                        ));
                    }
                    pages.extend(start..=end);
                }
                None => {
                    pages.insert(parse_page_number(token, "page number")?);
                }
            }
        }

        if pages.is_empty() {
            return Err("page selection cannot be empty".to_string());
        }

        Ok(Self { pages })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Pages to read; every page when `None`.
    pub pages: Option<PageSelection>,
    /// Minimum cells a line needs to count as a table row.
    pub min_cols: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            pages: None,
            min_cols: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PageSelection;
    use std::str::FromStr;

    #[test]
    fn parse_page_selection_range_and_single() {
        let selection = PageSelection::from_str("1-3, 5").expect("selection should parse");
        assert_eq!(selection.len(), 4);
        assert!(selection.contains(2));
        assert!(selection.contains(5));
        assert!(!selection.contains(4));
    }

    #[test]
    fn reject_reversed_range() {
        let err = PageSelection::from_str("3-1").expect_err("invalid range should fail");
        assert!(err.contains("invalid range"));
    }

    #[test]
    fn reject_page_zero_and_empty_selection() {
        assert_eq!(
            PageSelection::from_str("0").expect_err("page 0 should fail"),
            "pages are 1-based"
        );
        assert!(PageSelection::from_str(" , ").is_err());
    }

    #[test]
    fn reject_garbage_page_number() {
        let err = PageSelection::from_str("two").expect_err("text should fail");
        assert_eq!(err, "invalid page number: 'two'");
    }
}
