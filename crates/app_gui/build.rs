use std::env;

fn main() {
    let version =
        env::var("CAMELID_VERSION").unwrap_or_else(|_| env::var("CARGO_PKG_VERSION").unwrap());
    println!("cargo:rerun-if-env-changed=CAMELID_VERSION");
    println!("cargo:rustc-env=CAMELID_VERSION={version}");
}
