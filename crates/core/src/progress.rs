//! Completion-percentage math for quest participation.

/// Progress value at which a participation counts as finished.
pub const PROGRESS_COMPLETE: u8 = 100;

/// Share of a quest's photos that have been verified, as a rounded
/// percentage. Zero when the quest has no photos.
///
/// Monotone non-decreasing in `checked` for a fixed `total`.
pub fn progress_percent(checked: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let percent = (checked as f64 * 100.0 / total as f64).round();
    // Legacy progress policy can push the checked count past the photo
    // count; the stored value is capped at the u8 range, not at 100.
    percent.min(u8::MAX as f64) as u8
}
