fn main() {
    let crate_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();

    match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("TREMOLO_H")
        .generate()
    {
        Ok(bindings) => {
            bindings.write_to_file("include/tremolo.h");
        }
        Err(err) => {
            // Header generation is best-effort; the Rust build itself must
            // not depend on it.
            println!("cargo:warning=cbindgen failed: {}", err);
        }
    }
}
