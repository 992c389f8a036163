//! Build script for papalink-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Checks that exactly one LogLED variant is selected

use std::env;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

const VARIANTS: [&str; 3] = ["LOGLED_311", "LOGLED_111", "LOGLED_103"];

fn main() {
    setup_linker();
    check_variant();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Fail early on an ambiguous variant selection
fn check_variant() {
    let enabled: Vec<&str> = VARIANTS
        .iter()
        .copied()
        .filter(|v| env::var_os(format!("CARGO_FEATURE_{v}")).is_some())
        .collect();

    match enabled.len() {
        1 => {}
        0 => panic!(
            "no LogLED variant selected; build with \
             --no-default-features --features defmt,logled-XXX"
        ),
        _ => panic!(
            "several LogLED variants selected ({}); build with \
             --no-default-features --features defmt,logled-XXX",
            enabled.join(", ")
        ),
    }
}
