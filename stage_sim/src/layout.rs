//! On-disk layout of a run.
//!
//! ```text
//! <out_dir>/
//!   <YYYYmmddHHMMSS>-<root_seed>/
//!     iter_<index>-a_<actor_seed>-s_<scenario_seed>.log
//! ```
//!
//! Indices are zero-padded to the width of the largest index so a directory
//! listing sorts iterations numerically.

use crate::seeds::SeedPair;
use chrono::NaiveDateTime;
use std::io;
use std::path::Path;

const RUN_DIR_TIME_FORMAT: &str = "%Y%m%d%H%M%S";

/// Number of decimal digits in `n`.
pub fn digit_width(n: usize) -> usize {
    let mut width = 1;
    let mut rest = n / 10;
    while rest > 0 {
        width += 1;
        rest /= 10;
    }
    width
}

/// Name of a run's directory.
pub fn run_dir_name(start_at: NaiveDateTime, root_seed: u64) -> String {
    format!("{}-{}", start_at.format(RUN_DIR_TIME_FORMAT), root_seed)
}

/// Name of an iteration's log file.
///
/// Carries both seeds so a single iteration can be replayed by handing them
/// back to the actor and scenario factories.
pub fn log_file_name(index: usize, total: usize, seeds: SeedPair) -> String {
    let width = digit_width(total.saturating_sub(1));
    format!(
        "iter_{:0width$}-a_{}-s_{}.log",
        index,
        seeds.actor,
        seeds.scenario,
        width = width
    )
}

/// Creates `path` and its parents if missing.
pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    std::fs::create_dir_all(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn seeds(actor: u64, scenario: u64) -> SeedPair {
        SeedPair { actor, scenario }
    }

    #[test]
    fn test_digit_width() {
        assert_eq!(digit_width(0), 1);
        assert_eq!(digit_width(9), 1);
        assert_eq!(digit_width(10), 2);
        assert_eq!(digit_width(999), 3);
        assert_eq!(digit_width(1000), 4);
    }

    #[test]
    fn test_run_dir_name() {
        let start_at = NaiveDate::from_ymd_opt(2020, 5, 27)
            .unwrap()
            .and_hms_opt(15, 14, 13)
            .unwrap();
        assert_eq!(run_dir_name(start_at, 20), "20200527151413-20");
    }

    #[test]
    fn test_log_file_name_padding() {
        assert_eq!(log_file_name(10, 1000, seeds(30, 40)), "iter_010-a_30-s_40.log");
        assert_eq!(log_file_name(10, 1001, seeds(30, 40)), "iter_0010-a_30-s_40.log");
        assert_eq!(log_file_name(3, 10, seeds(1, 2)), "iter_3-a_1-s_2.log");
        assert_eq!(log_file_name(0, 1, seeds(1, 2)), "iter_0-a_1-s_2.log");
        assert_eq!(log_file_name(0, 0, seeds(1, 2)), "iter_0-a_1-s_2.log");
    }

    #[test]
    fn test_ensure_dir_creates_parents() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a").join("b");

        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());

        // Existing directories are fine
        ensure_dir(&nested).unwrap();
    }

    #[test]
    fn test_ensure_dir_rejects_file() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("taken");
        std::fs::write(&file, b"x").unwrap();

        assert!(ensure_dir(&file).is_err());
    }

    proptest! {
        #[test]
        fn prop_names_sort_like_indices(
            total in 2usize..5000,
            a in any::<u64>(),
            b in any::<u64>(),
            pick in any::<(usize, usize)>(),
        ) {
            let i = pick.0 % total;
            let j = pick.1 % total;
            prop_assume!(i < j);
            let lhs = log_file_name(i, total, seeds(a >> 1, b >> 1));
            let rhs = log_file_name(j, total, seeds(b >> 1, a >> 1));
            prop_assert!(lhs < rhs);
        }
    }
}
