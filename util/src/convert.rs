//! Conversions between commonly used units.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Convert an angle in degrees into radians.
pub fn deg_to_rad<T>(angle_deg: T) -> T
where
    T: Float,
{
    angle_deg * T::from(std::f64::consts::PI / 180.0).unwrap()
}

/// Convert an angle in radians into degrees.
pub fn rad_to_deg<T>(angle_rad: T) -> T
where
    T: Float,
{
    angle_rad * T::from(180.0 / std::f64::consts::PI).unwrap()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_deg_rad_conversions() {
        assert_eq!(deg_to_rad(180f64), std::f64::consts::PI);
        assert_eq!(rad_to_deg(std::f64::consts::PI), 180f64);
        assert_eq!(deg_to_rad(0f64), 0f64);
    }
}
