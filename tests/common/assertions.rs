//! Domain-specific assertion macros for nstat harnesses.
//!
//! These add context-rich failure messages naming the metric that broke.

/// Assert the verdict of the row for a metric key.
///
/// ```rust
/// assert_verdict!(rows, "nrAvoided", Verdict::Regressed);
/// ```
#[macro_export]
macro_rules! assert_verdict {
    ($rows:expr, $key:expr, $verdict:expr) => {{
        let key: &str = $key;
        let row = $rows
            .iter()
            .find(|r| r.metric.key == key)
            .unwrap_or_else(|| panic!("assert_verdict! failed: no row for {key:?}"));
        if row.verdict != $verdict {
            panic!(
                "assert_verdict! failed for {key:?}\n  expected: {:?}\n  actual:   {:?}\n  row: {row:?}",
                $verdict, row.verdict
            );
        }
    }};
}

/// Assert two floats are within `1e-9` of each other.
#[macro_export]
macro_rules! assert_close {
    ($actual:expr, $expected:expr) => {{
        let (a, e): (f64, f64) = ($actual, $expected);
        if (a - e).abs() > 1e-9 {
            panic!("assert_close! failed\n  expected: {e}\n  actual:   {a}");
        }
    }};
}
