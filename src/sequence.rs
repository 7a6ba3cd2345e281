//! Page ordering for image filenames
//!
//! Photos named by cameras and phones carry an incrementing number somewhere
//! in the name (`IMG_9.jpg`, `IMG_10.jpg`), which plain lexicographic order
//! gets wrong. [`compare_filenames`] orders by the last run of digits in each
//! name and falls back to byte-wise comparison so that the result is a total
//! order and every run produces the same page sequence.
//!
//! # Example
//!
//! ```
//! use images_to_pdf::sequence::sort_filenames;
//!
//! let mut names = vec!["photo10.png", "Image (2).jpg", "photo2.png", "Image.jpg"];
//! sort_filenames(&mut names);
//! assert_eq!(names, ["Image.jpg", "Image (2).jpg", "photo2.png", "photo10.png"]);
//! ```

use std::cmp::Ordering;

use once_cell::sync::Lazy;
use regex::Regex;

/// Unsuffixed first file of an OS duplicate series (`Image.jpg`, `Image (2).jpg`, ...)
pub const SERIES_BASE_NAME: &str = "Image.jpg";

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").unwrap());

/// Sort key for one filename. Field order is the comparison order.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct SequenceKey<'a> {
    rank: Rank,
    number: Option<DigitRun<'a>>,
    name: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Rank {
    SeriesBase,
    Numbered,
    Plain,
}

/// Decimal digit run compared by numeric value without parsing, so runs of
/// any length are fine.
#[derive(Debug, Clone, Copy)]
struct DigitRun<'a>(&'a str);

impl<'a> DigitRun<'a> {
    fn significant(&self) -> &'a str {
        let trimmed = self.0.trim_start_matches('0');
        if trimmed.is_empty() {
            "0"
        } else {
            trimmed
        }
    }
}

impl Ord for DigitRun<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b) = (self.significant(), other.significant());
        a.len().cmp(&b.len()).then_with(|| a.cmp(b))
    }
}

impl PartialEq for DigitRun<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DigitRun<'_> {}

impl PartialOrd for DigitRun<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Last maximal run of ASCII digits in `name`, if any
fn last_digit_run(name: &str) -> Option<DigitRun<'_>> {
    DIGIT_RUN.find_iter(name).last().map(|m| DigitRun(m.as_str()))
}

impl<'a> SequenceKey<'a> {
    fn new(name: &'a str) -> Self {
        if name == SERIES_BASE_NAME {
            return Self { rank: Rank::SeriesBase, number: None, name };
        }
        match last_digit_run(name) {
            Some(run) => Self { rank: Rank::Numbered, number: Some(run), name },
            None => Self { rank: Rank::Plain, number: None, name },
        }
    }
}

/// Decide which of two filenames comes first in the page sequence.
///
/// - `Image.jpg` comes before every other name, in particular before the
///   `Image (N).jpg` duplicates of the same series.
/// - Names that both contain digits compare by the value of their last digit
///   run (`photo2` before `photo10`).
/// - A name with digits comes before a name without.
/// - Everything else, including equal numbers, compares byte-wise.
///
/// The comparison is a strict total order: it returns `Equal` only for
/// identical names.
pub fn compare_filenames(a: &str, b: &str) -> Ordering {
    SequenceKey::new(a).cmp(&SequenceKey::new(b))
}

/// Sort filenames into page order in place
pub fn sort_filenames<T: AsRef<str>>(names: &mut [T]) {
    names.sort_unstable_by(|a, b| compare_filenames(a.as_ref(), b.as_ref()));
}

/// Sort arbitrary items into page order using the filename `name` returns
pub fn sort_by_filename<T, F>(items: &mut [T], name: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_unstable_by(|a, b| compare_filenames(name(a), name(b)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(names: &[&'static str]) -> Vec<&'static str> {
        let mut names = names.to_vec();
        sort_filenames(&mut names);
        names
    }

    #[test]
    fn test_series_base_before_duplicates() {
        for n in [1u64, 2, 9, 10, 99, 12345] {
            let dup = format!("Image ({}).jpg", n);
            assert_eq!(compare_filenames(SERIES_BASE_NAME, &dup), Ordering::Less);
            assert_eq!(compare_filenames(&dup, SERIES_BASE_NAME), Ordering::Greater);
        }
    }

    #[test]
    fn test_series_base_before_non_numeric_duplicate() {
        assert_eq!(compare_filenames("Image.jpg", "Image (copy).jpg"), Ordering::Less);
        assert_eq!(compare_filenames("Image (copy).jpg", "Image.jpg"), Ordering::Greater);
    }

    #[test]
    fn test_numeric_not_lexicographic() {
        assert_eq!(compare_filenames("photo2.jpg", "photo10.jpg"), Ordering::Less);
        assert_eq!(compare_filenames("img9.png", "img10.png"), Ordering::Less);
        assert_eq!(sorted(&["img10.png", "img9.png", "img1.png"]), ["img1.png", "img9.png", "img10.png"]);
    }

    #[test]
    fn test_uses_last_digit_run() {
        // 2023 appears in both, only the trailing counter matters
        assert_eq!(
            compare_filenames("2023-trip-7.jpg", "2023-trip-12.jpg"),
            Ordering::Less
        );
        assert_eq!(compare_filenames("a100b3.jpg", "a1b20.jpg"), Ordering::Less);
    }

    #[test]
    fn test_numeric_tie_falls_back_to_bytes() {
        assert_eq!(compare_filenames("beta5.jpg", "alpha5.jpg"), Ordering::Greater);
        assert_eq!(compare_filenames("x05.jpg", "x5.jpg"), Ordering::Less);
        assert_eq!(sorted(&["b07.png", "a7.png", "c007.png"]), ["a7.png", "b07.png", "c007.png"]);
    }

    #[test]
    fn test_numbered_before_plain() {
        assert_eq!(compare_filenames("zeta1.png", "alpha.png"), Ordering::Less);
        assert_eq!(compare_filenames("alpha.png", "zeta1.png"), Ordering::Greater);
    }

    #[test]
    fn test_plain_names_lexicographic() {
        assert_eq!(sorted(&["cat.png", "Bird.png", "apple.png"]), ["Bird.png", "apple.png", "cat.png"]);
    }

    #[test]
    fn test_long_digit_runs_do_not_overflow() {
        let big = "scan99999999999999999999999999.png";
        let bigger = "scan100000000000000000000000000.png";
        assert_eq!(compare_filenames(big, bigger), Ordering::Less);
        assert_eq!(compare_filenames("n000.png", "n0.png"), Ordering::Greater);
    }

    #[test]
    fn test_equal_only_for_identical_names() {
        assert_eq!(compare_filenames("a1.png", "a1.png"), Ordering::Equal);
        assert_ne!(compare_filenames("a1.png", "a01.png"), Ordering::Equal);
        assert_ne!(compare_filenames("", "x"), Ordering::Equal);
    }

    #[test]
    fn test_end_to_end_order() {
        assert_eq!(
            sorted(&["Image (2).jpg", "photo10.png", "Image.jpg", "photo2.png"]),
            ["Image.jpg", "Image (2).jpg", "photo2.png", "photo10.png"]
        );
    }

    #[test]
    fn test_idempotent_and_antisymmetric() {
        let names = [
            "Image.jpg", "Image (2).jpg", "Image (10).jpg", "photo3.png", "photo03.png",
            "photo10.png", "cover.gif", "back.JPG", "IMG_0001.jpeg", "img1.png", "", "9",
        ];
        let once = sorted(&names);
        let twice = sorted(&once);
        assert_eq!(once, twice);

        for a in &names {
            for b in &names {
                assert_eq!(compare_filenames(a, b), compare_filenames(b, a).reverse(), "{a} vs {b}");
                for c in &names {
                    if compare_filenames(a, b).is_lt() && compare_filenames(b, c).is_lt() {
                        assert!(compare_filenames(a, c).is_lt(), "{a} < {b} < {c}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_sort_by_filename_on_structs() {
        struct Entry {
            name: String,
        }
        let mut entries: Vec<Entry> = ["p10.png", "p2.png"]
            .iter()
            .map(|n| Entry { name: n.to_string() })
            .collect();
        sort_by_filename(&mut entries, |e| e.name.as_str());
        assert_eq!(entries[0].name, "p2.png");
    }
}
