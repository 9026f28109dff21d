use std::cmp::Ordering;

/// Digit runs compare by value (`"item2" < "item10"`); runs starting with
/// `'0'` compare left-aligned, like decimal fractions.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    compare(a.as_bytes(), b.as_bytes(), false)
}

/// Like [`natural_cmp`], with ASCII letters folded to upper case.
pub fn natural_cmp_ignore_case(a: &str, b: &str) -> Ordering {
    compare(a.as_bytes(), b.as_bytes(), true)
}

fn at(s: &[u8], i: usize) -> u8 {
    s.get(i).copied().unwrap_or(0)
}

fn is_space(c: u8) -> bool {
    // includes vertical tab, which `u8::is_ascii_whitespace` does not
    c.is_ascii_whitespace() || c == 0x0b
}

fn compare(a: &[u8], b: &[u8], fold_case: bool) -> Ordering {
    let (mut ai, mut bi) = (0, 0);
    loop {
        while is_space(at(a, ai)) {
            ai += 1;
        }
        while is_space(at(b, bi)) {
            bi += 1;
        }
        let mut ca = at(a, ai);
        let mut cb = at(b, bi);

        if ca.is_ascii_digit() && cb.is_ascii_digit() {
            let ord = if ca == b'0' || cb == b'0' {
                compare_left(&a[ai..], &b[bi..])
            } else {
                compare_right(&a[ai..], &b[bi..])
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }

        if ca == 0 && cb == 0 {
            return Ordering::Equal;
        }

        if fold_case {
            ca = ca.to_ascii_uppercase();
            cb = cb.to_ascii_uppercase();
        }

        match ca.cmp(&cb) {
            Ordering::Equal => {}
            ord => return ord,
        }

        ai += 1;
        bi += 1;
    }
}

// Integer runs: the longer run is larger, otherwise the first differing digit
// decides.
fn compare_right(a: &[u8], b: &[u8]) -> Ordering {
    let mut bias = Ordering::Equal;
    let mut i = 0;
    loop {
        let (ca, cb) = (at(a, i), at(b, i));
        match (ca.is_ascii_digit(), cb.is_ascii_digit()) {
            (false, false) => return bias,
            (false, true) => return Ordering::Less,
            (true, false) => return Ordering::Greater,
            (true, true) => {
                if bias == Ordering::Equal {
                    bias = ca.cmp(&cb);
                }
            }
        }
        i += 1;
    }
}

// Fractional runs: the first differing digit decides.
fn compare_left(a: &[u8], b: &[u8]) -> Ordering {
    let mut i = 0;
    loop {
        let (ca, cb) = (at(a, i), at(b, i));
        match (ca.is_ascii_digit(), cb.is_ascii_digit()) {
            (false, false) => return Ordering::Equal,
            (false, true) => return Ordering::Less,
            (true, false) => return Ordering::Greater,
            (true, true) => match ca.cmp(&cb) {
                Ordering::Equal => {}
                ord => return ord,
            },
        }
        i += 1;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::cmp::Ordering::*;

    #[test]
    fn test_numeric_runs() {
        assert_eq!(natural_cmp("item2", "item10"), Less);
        assert_eq!(natural_cmp("item10", "item2"), Greater);
        assert_eq!(natural_cmp("item10", "item10"), Equal);
        assert_eq!(natural_cmp("a1b2", "a1b10"), Less);
        assert_eq!(natural_cmp("x9", "x9y"), Less);
        assert_eq!(natural_cmp("123", "45"), Greater);
    }

    #[test]
    fn test_leading_zeros_compare_as_fraction() {
        assert_eq!(natural_cmp("1.010", "1.02"), Less);
        assert_eq!(natural_cmp("x01", "x1"), Less);
        assert_eq!(natural_cmp("x001", "x01"), Less);
    }

    #[test]
    fn test_whitespace_and_case() {
        assert_eq!(natural_cmp("  abc", "abc"), Equal);
        assert_eq!(natural_cmp("a \x0b1", "a1"), Equal);
        assert_eq!(natural_cmp("B", "a"), Less);
        assert_eq!(natural_cmp_ignore_case("B", "a"), Greater);
        assert_eq!(natural_cmp_ignore_case("File7", "file07"), Greater);
        assert_eq!(natural_cmp_ignore_case("ABC", "abc"), Equal);
    }

    #[test]
    fn test_prefix_and_empty() {
        assert_eq!(natural_cmp("", ""), Equal);
        assert_eq!(natural_cmp("", "a"), Less);
        assert_eq!(natural_cmp("abc", "ab"), Greater);
        assert_eq!(natural_cmp("a\0b", "a\0c"), Equal);
    }

    #[test]
    fn test_sorts_like_a_human() {
        let mut names = vec!["img12.png", "img10.png", "IMG3.png", "img2.png", "img1.png"];
        names.sort_by(|a, b| natural_cmp_ignore_case(a, b));
        assert_eq!(
            names,
            ["img1.png", "img2.png", "IMG3.png", "img10.png", "img12.png"]
        );
    }
}
