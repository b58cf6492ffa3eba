use std::{env, path::PathBuf};

use anyhow::Result;
use fs_extra::{copy_items, dir::CopyOptions};

fn main() -> Result<()> {
    // Rerun this script when demo assets change.
    println!("cargo:rerun-if-changed=assets/*");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let assets = manifest_dir.join("assets");
    if assets.exists() {
        let out_dir = env::var("OUT_DIR")?;
        let mut copy_options = CopyOptions::new();
        copy_options.overwrite = true;
        copy_items(&[assets], out_dir, &copy_options)?;
    }

    Ok(())
}
