use std::env;
use std::error::Error;
use std::path::PathBuf;

use fluent_should_gen::{GeneratorOptions, generate_path};

fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo:rerun-if-changed=src/lib.rs");
    let output = PathBuf::from(env::var("OUT_DIR")?).join("accessors.rs");
    let generation = generate_path("src/lib.rs", &output, &GeneratorOptions::default())?;
    for diagnostic in &generation.diagnostics {
        println!("cargo:warning={diagnostic}");
    }
    Ok(())
}
