fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Only the ESP-IDF build needs the toolchain environment exported;
    // host simulation builds have nothing to generate.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
