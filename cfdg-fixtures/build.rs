use std::env;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!(
        "cargo:rustc-env=FIXTURES_PATH={}",
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("fixtures")
            .to_str()
            .unwrap()
    )
}
