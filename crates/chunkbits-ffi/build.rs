use std::env;
use std::error::Error;
use std::fs;
use std::path::PathBuf;

const HEADER: &str = "chunkbits.h";

fn main() -> Result<(), Box<dyn Error>> {
    let crate_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let config_path = crate_dir.join("cbindgen.toml");

    println!("cargo:rerun-if-changed={}", config_path.display());
    println!("cargo:rerun-if-changed=src");

    let config = cbindgen::Config::from_file(&config_path)?;
    let include_dir = crate_dir.join("include");
    fs::create_dir_all(&include_dir)?;

    cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_config(config)
        .generate()?
        .write_to_file(include_dir.join(HEADER));
    Ok(())
}
