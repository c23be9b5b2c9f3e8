/// Convert decibels to linear amplitude.
#[inline]
pub fn db_to_lin(db: f32) -> f32 {
    10f32.powf(db / 20.0)
}

/// Convert decibels to linear amplitude, treating anything at or below
/// `floor_db` as silence.
#[inline]
pub fn db_to_lin_or_mute(db: f32, floor_db: f32) -> f32 {
    if db <= floor_db { 0.0 } else { db_to_lin(db) }
}
