//! Build script for rust_sfit
//!
//! Links the external `libsfit` routines when the `sfit` feature is enabled.

use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=SFIT_LIB_DIR");

    if env::var_os("CARGO_FEATURE_SFIT").is_none() {
        return;
    }

    // Strategy 1: explicit library directory
    if let Ok(lib_dir) = env::var("SFIT_LIB_DIR") {
        println!("cargo:rustc-link-search=native={lib_dir}");
        println!("cargo:rustc-link-lib=sfit");
        return;
    }

    // Strategy 2: common install locations
    let search_paths = ["/usr/local/lib", "/usr/lib", "/usr/lib/x86_64-linux-gnu"];
    for path in &search_paths {
        let dir = PathBuf::from(path);
        if dir.join("libsfit.a").exists() || dir.join("libsfit.so").exists() {
            println!("cargo:rustc-link-search=native={path}");
            println!("cargo:rustc-link-lib=sfit");
            return;
        }
    }

    // Fall back to the linker's default search path.
    println!("cargo:warning=libsfit not found in SFIT_LIB_DIR or common locations");
    println!("cargo:rustc-link-lib=sfit");
}
