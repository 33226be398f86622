use std::ops::RangeInclusive;

/// First visible row of a list so that `selected` stays in a window of
/// `visible` rows. Without a selection the current offset is only clamped.
pub(super) fn reveal_offset(
    selected: Option<usize>,
    len: usize,
    visible: usize,
    offset: usize,
) -> usize {
    if len == 0 || visible == 0 {
        return 0;
    }

    let offset = offset.min(len.saturating_sub(visible));
    match selected {
        Some(idx) if idx < offset => idx,
        Some(idx) if idx >= offset + visible => idx + 1 - visible,
        _ => offset,
    }
}

/// Moves `value` by `delta` steps of `step`, staying inside `bounds`.
pub(super) fn step_within(value: u16, delta: isize, step: u16, bounds: RangeInclusive<u16>) -> u16 {
    let moved = i64::from(value) + delta as i64 * i64::from(step);
    let clamped = moved.clamp(i64::from(*bounds.start()), i64::from(*bounds.end()));
    u16::try_from(clamped).unwrap_or(*bounds.end())
}
