use std::{env, fs, path::Path};

// Put config.json next to the auth-mock and receiver-mock binaries so they
// find it without MOCK_CONFIG.
fn main() {
    println!("cargo:rerun-if-changed=config.json");

    let Ok(out_dir) = env::var("OUT_DIR") else {
        println!("cargo:warning=OUT_DIR not set, config.json not copied");
        return;
    };

    // OUT_DIR = target/<profile>/build/<crate>-<hash>/out
    let Some(exe_dir) = Path::new(&out_dir).ancestors().nth(3) else {
        println!("cargo:warning=Cannot find executable directory");
        return;
    };

    let dst = exe_dir.join("config.json");
    if let Err(e) = fs::copy("config.json", &dst) {
        println!("cargo:warning=Could not copy config.json to {}: {}", dst.display(), e);
    }
}
