//! Value-domain conversions between the Hue device ranges and the
//! accessory-protocol ranges.
//!
//! Every conversion lives here as a named pure function so the numeric
//! edge cases stay testable in one place instead of being scattered
//! through callback closures.

/// Upper bound of the device brightness range.
pub const DEVICE_BRIGHTNESS_MAX: u8 = 254;
/// Upper bound of the accessory brightness range (percent).
pub const ACCESSORY_BRIGHTNESS_MAX: u8 = 100;

/// Color temperature bounds of the device, in mired.
pub const DEVICE_MIRED_MIN: u16 = 153;
pub const DEVICE_MIRED_MAX: u16 = 500;

/// Color temperature bounds of the accessory protocol, in mired.
pub const ACCESSORY_MIRED_MIN: u16 = 50;
pub const ACCESSORY_MIRED_MAX: u16 = 400;

/// Upper bound of the accessory hue range, in degrees.
pub const HUE_DEGREES_MAX: f32 = 360.0;
/// Upper bound of the accessory saturation range, in percent.
pub const SATURATION_PERCENT_MAX: f32 = 100.0;

/// Convert an accessory brightness percentage to the device range.
///
/// Values above 100 percent are treated as full brightness. Rounds to
/// the nearest device step so converting back stays within one unit.
///
/// # Examples
///
/// ```
/// use huelink::convert::brightness_to_device;
///
/// assert_eq!(brightness_to_device(0), 0);
/// assert_eq!(brightness_to_device(50), 127);
/// assert_eq!(brightness_to_device(100), 254);
/// ```
pub fn brightness_to_device(percent: u8) -> u8 {
    let percent = percent.min(ACCESSORY_BRIGHTNESS_MAX) as u32;
    ((percent * DEVICE_BRIGHTNESS_MAX as u32 + 50) / 100) as u8
}

/// Convert a device brightness value to the accessory percentage.
///
/// # Examples
///
/// ```
/// use huelink::convert::brightness_to_accessory;
///
/// assert_eq!(brightness_to_accessory(0), 0);
/// assert_eq!(brightness_to_accessory(127), 50);
/// assert_eq!(brightness_to_accessory(254), 100);
/// ```
pub fn brightness_to_accessory(device: u8) -> u8 {
    let device = device.min(DEVICE_BRIGHTNESS_MAX) as u32;
    ((device * 100 + 127) / 254) as u8
}

/// Clamp an accessory-supplied color temperature before forwarding it to
/// the device.
///
/// # Examples
///
/// ```
/// use huelink::convert::clamp_mired_for_update;
///
/// assert_eq!(clamp_mired_for_update(600), 400);
/// assert_eq!(clamp_mired_for_update(10), 50);
/// assert_eq!(clamp_mired_for_update(320), 320);
/// ```
pub fn clamp_mired_for_update(mired: u16) -> u16 {
    mired.clamp(ACCESSORY_MIRED_MIN, ACCESSORY_MIRED_MAX)
}

/// Clamp a device-reported color temperature before handing it to the
/// accessory protocol.
///
/// # Examples
///
/// ```
/// use huelink::convert::clamp_mired_for_read;
///
/// assert_eq!(clamp_mired_for_read(100), 153);
/// assert_eq!(clamp_mired_for_read(700), 500);
/// assert_eq!(clamp_mired_for_read(467), 467);
/// ```
pub fn clamp_mired_for_read(mired: u16) -> u16 {
    mired.clamp(DEVICE_MIRED_MIN, DEVICE_MIRED_MAX)
}

/// Clamp a hue angle to the accessory range of 0-360 degrees.
pub fn clamp_hue(degrees: f32) -> f32 {
    degrees.clamp(0.0, HUE_DEGREES_MAX)
}

/// Clamp a saturation value to the accessory range of 0-100 percent.
pub fn clamp_saturation(percent: f32) -> f32 {
    percent.clamp(0.0, SATURATION_PERCENT_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_brightness_to_device_bounds() {
        assert_eq!(brightness_to_device(0), 0);
        assert_eq!(brightness_to_device(100), 254);
        // Values beyond the accessory range saturate at full brightness.
        assert_eq!(brightness_to_device(255), 254);
    }

    #[test]
    fn test_brightness_to_accessory_bounds() {
        assert_eq!(brightness_to_accessory(0), 0);
        assert_eq!(brightness_to_accessory(254), 100);
        assert_eq!(brightness_to_accessory(255), 100);
    }

    #[test]
    fn test_mired_update_clamps_to_accessory_range() {
        assert_eq!(clamp_mired_for_update(600), 400);
        assert_eq!(clamp_mired_for_update(10), 50);
        assert_eq!(clamp_mired_for_update(50), 50);
        assert_eq!(clamp_mired_for_update(400), 400);
    }

    #[test]
    fn test_mired_read_clamps_to_device_range() {
        assert_eq!(clamp_mired_for_read(0), 153);
        assert_eq!(clamp_mired_for_read(65535), 500);
        assert_eq!(clamp_mired_for_read(153), 153);
        assert_eq!(clamp_mired_for_read(500), 500);
    }

    #[test]
    fn test_hue_clamp() {
        assert_eq!(clamp_hue(-10.0), 0.0);
        assert_eq!(clamp_hue(400.0), 360.0);
        assert_eq!(clamp_hue(180.0), 180.0);
    }

    #[test]
    fn test_saturation_clamp() {
        assert_eq!(clamp_saturation(-1.0), 0.0);
        assert_eq!(clamp_saturation(150.0), 100.0);
        assert_eq!(clamp_saturation(42.5), 42.5);
    }

    proptest! {
        /// Converting a device brightness to the accessory domain and
        /// back must land within one device unit of the original.
        #[test]
        fn brightness_round_trip_within_one_unit(device in 0u8..=254u8) {
            let round_tripped = brightness_to_device(brightness_to_accessory(device));
            let diff = (round_tripped as i16 - device as i16).abs();
            prop_assert!(diff <= 1, "device {device} round-tripped to {round_tripped}");
        }

        #[test]
        fn brightness_to_accessory_stays_in_range(device in 0u8..=255u8) {
            prop_assert!(brightness_to_accessory(device) <= ACCESSORY_BRIGHTNESS_MAX);
        }

        #[test]
        fn brightness_to_device_stays_in_range(percent in 0u8..=255u8) {
            prop_assert!(brightness_to_device(percent) <= DEVICE_BRIGHTNESS_MAX);
        }
    }
}
