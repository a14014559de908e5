use crate::device::{DeviceClass, DeviceEntry, DeviceKey};
use std::path::PathBuf;

fn led(current: u32, max: u32) -> DeviceEntry {
    DeviceEntry::new(
        DeviceKey::new(DeviceClass::Led, "tpacpi::kbd_backlight"),
        current,
        max,
        PathBuf::from("/sys/class/leds/tpacpi::kbd_backlight/brightness"),
    )
}

#[test]
fn test_values_stay_in_range() {
    let mut entry = led(1, 2);
    assert!(entry.set_current(2));
    assert!(!entry.set_current(2));
    assert!(!entry.set_current(7));
    assert_eq!(entry.current(), 2);
    assert!(entry.set_current(0));
    assert_eq!(led(9, 2).current(), 2);
}

#[test]
fn test_normalization() {
    assert_eq!(led(1, 2).normalized(), 0.5);
    assert_eq!(led(0, 0).normalized(), 0.0);
    let snapshot = led(1, 4).snapshot();
    assert_eq!(snapshot.percent(), 25.0);
    assert_eq!(snapshot.key.to_string(), "leds/tpacpi::kbd_backlight");
}

#[test]
fn test_class_names() {
    assert_eq!("backlight".parse::<DeviceClass>().unwrap(), DeviceClass::Backlight);
    assert_eq!("leds".parse::<DeviceClass>().unwrap(), DeviceClass::Led);
    assert_eq!("led".parse::<DeviceClass>().unwrap(), DeviceClass::Led);
    assert!("hwmon".parse::<DeviceClass>().is_err());
    assert_eq!(DeviceClass::Led.to_string(), "leds");
}
