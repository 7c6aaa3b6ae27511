//! Year-range summarization.

/// Collapse sorted, de-duplicated years into ranges like `2001-2003, 2005`.
pub fn summarize_years(years: &[i32]) -> String {
    let mut ranges: Vec<String> = Vec::new();
    let mut iter = years.iter().copied();

    let Some(first) = iter.next() else {
        return String::new();
    };
    let (mut start, mut prev) = (first, first);

    for year in iter {
        if year == prev + 1 {
            prev = year;
        } else {
            ranges.push(format_range(start, prev));
            start = year;
            prev = year;
        }
    }
    ranges.push(format_range(start, prev));

    ranges.join(", ")
}

fn format_range(start: i32, end: i32) -> String {
    if start == end {
        start.to_string()
    } else {
        format!("{}-{}", start, end)
    }
}

/// Sort and de-duplicate years, then summarize.
pub fn summarize_unsorted(years: impl IntoIterator<Item = i32>) -> String {
    let mut years: Vec<i32> = years.into_iter().collect();
    years.sort_unstable();
    years.dedup();
    summarize_years(&years)
}
