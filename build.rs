fn main() {
    // Only propagate the ESP-IDF build environment when targeting the device.
    // Host-side builds (unit, property and fuzz tests) skip this entirely.
    if std::env::var("CARGO_FEATURE_ESPIDF").is_ok() {
        embuild::espidf::sysenv::output();
    }
}
