//! Version reporting.

/// Package name.
pub const C_PKG_NAME: &str = env!("CARGO_PKG_NAME");
/// Package version.
pub const C_PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Multi-line summary of the package version and build target.
pub fn version_summary() -> String {
    format!(
        "{C_PKG_NAME} version: {C_PKG_VERSION}\ntarget: {}-{}\nprofile: {}",
        std::env::consts::ARCH,
        std::env::consts::OS,
        if cfg!(debug_assertions) {
            "debug"
        } else {
            "release"
        }
    )
}

/// Print [`version_summary`] to stdout.
pub fn show_config() {
    println!("{}", version_summary());
}

#[cfg(test)]
mod tests {
    use super::{C_PKG_VERSION, version_summary};

    #[test]
    fn version_summary_names_package_and_version() {
        let txt = version_summary();
        let first_line = txt.lines().next().expect("first line");
        assert_eq!(first_line, format!("bitgrab_io_fs version: {C_PKG_VERSION}"));
        assert!(txt.contains(std::env::consts::OS));
        assert_eq!(txt.lines().count(), 3);
    }
}
