use std::env;

fn main() {
    let version = env::var("POULTRY_CLASSIFY_VERSION")
        .unwrap_or_else(|_| env::var("CARGO_PKG_VERSION").unwrap());
    println!("cargo:rerun-if-env-changed=POULTRY_CLASSIFY_VERSION");
    println!("cargo:rustc-env=POULTRY_CLASSIFY_VERSION={version}");
}
