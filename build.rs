use vergen::{BuildBuilder, Emitter, RustcBuilder};
use vergen_git2::Git2Builder;

// Emits the metadata shown by `chairchat --version`.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let build = BuildBuilder::default().build_date(true).build()?;
    let rustc = RustcBuilder::default().semver(true).build()?;

    let git2_result = Git2Builder::default()
        .describe(true, true, None)
        .sha(true)
        .build();

    match git2_result {
        Ok(git2) => {
            Emitter::default()
                .add_instructions(&build)?
                .add_instructions(&rustc)?
                .add_instructions(&git2)?
                .emit()?;
        }
        Err(_) => {
            // Source tarballs and crates.io builds carry no git metadata.
            println!("cargo:rustc-env=VERGEN_GIT_DESCRIBE=unknown");
            println!("cargo:rustc-env=VERGEN_GIT_SHA=unknown");

            Emitter::default()
                .add_instructions(&build)?
                .add_instructions(&rustc)?
                .emit()?;
        }
    }

    Ok(())
}
