fn main() {
    // ESP-IDF link/env plumbing — only present when building for the device.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
