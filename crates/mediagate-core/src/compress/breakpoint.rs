//! Nearest-breakpoint selection

use std::collections::BTreeMap;

/// Pick the configured breakpoint closest to `target`.
///
/// Every candidate is visited once. A later candidate at a distance less than
/// or equal to the best so far replaces it, so among ties the last one in
/// iteration order wins (`[100, 200]` with target 150 selects 200).
///
/// Returns `None` when there are no candidates.
pub fn select_breakpoint(candidates: &[u32], target: u32) -> Option<u32> {
    let mut best: Option<(u32, u32)> = None;

    for &candidate in candidates {
        let distance = target.abs_diff(candidate);
        match best {
            Some((best_distance, _)) if distance > best_distance => continue,
            _ => best = Some((distance, candidate)),
        }
    }

    best.map(|(_, candidate)| candidate)
}

/// Candidate breakpoints for a platform.
///
/// A platform with its own non-empty table uses it as is; otherwise every
/// platform's table is concatenated in key order.
pub fn platform_candidates(resolutions: &BTreeMap<String, Vec<u32>>, platform: &str) -> Vec<u32> {
    match resolutions.get(platform) {
        Some(widths) if !widths.is_empty() => widths.clone(),
        _ => resolutions.values().flatten().copied().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tie_goes_to_last_candidate() {
        assert_eq!(select_breakpoint(&[100, 200], 150), Some(200));
        assert_eq!(select_breakpoint(&[200, 100], 150), Some(100));
    }

    #[test]
    fn test_exact_match() {
        assert_eq!(select_breakpoint(&[320, 640, 750], 640), Some(640));
    }

    #[test]
    fn test_nearest_wins_regardless_of_order() {
        assert_eq!(select_breakpoint(&[750, 320, 640], 700), Some(750));
        assert_eq!(select_breakpoint(&[320, 640, 750], 1), Some(320));
        assert_eq!(select_breakpoint(&[320, 640, 750], 4000), Some(750));
    }

    #[test]
    fn test_empty_candidates() {
        assert_eq!(select_breakpoint(&[], 640), None);
    }

    #[test]
    fn test_result_is_always_a_candidate() {
        let candidates = [320, 414, 640, 750, 1080, 1242];
        for target in (1..1500).step_by(37) {
            let picked = select_breakpoint(&candidates, target).unwrap();
            assert!(candidates.contains(&picked), "target {}", target);
        }
    }

    #[test]
    fn test_platform_candidates_prefers_own_table() {
        let resolutions = BTreeMap::from([
            ("android".to_string(), vec![720, 1080]),
            ("iphone".to_string(), vec![320, 640]),
            ("ipad".to_string(), vec![]),
        ]);

        assert_eq!(platform_candidates(&resolutions, "iphone"), vec![320, 640]);
        assert_eq!(
            platform_candidates(&resolutions, "ipad"),
            vec![720, 1080, 320, 640]
        );
        assert_eq!(
            platform_candidates(&resolutions, "h5"),
            vec![720, 1080, 320, 640]
        );
        assert!(platform_candidates(&BTreeMap::new(), "h5").is_empty());
    }
}
