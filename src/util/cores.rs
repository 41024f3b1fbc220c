//! CPU core counting for the CLI's `-t 0` (auto thread count) default.

/// Returns the number of logical CPU cores available on the system.
///
/// Guaranteed to return a value >= 1.
pub fn count_cores() -> usize {
    num_cpus::get()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_cores_at_least_one() {
        assert!(count_cores() >= 1);
    }
}
