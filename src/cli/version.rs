//! Version command handler

/// Commit the binary was built from, injected at build time
const GIT_SHA: Option<&str> = option_env!("KONFLUXCTL_GIT_SHA");

/// `konfluxctl <version> (<git sha>)`
pub fn version_line() -> String {
    format!(
        "konfluxctl {} ({})",
        env!("CARGO_PKG_VERSION"),
        GIT_SHA.filter(|sha| !sha.is_empty()).unwrap_or("unknown")
    )
}

/// Display version information
pub fn display_version() {
    println!("{}", version_line());
    println!("  {}", env!("CARGO_PKG_DESCRIPTION"));
    println!("  License: {}", env!("CARGO_PKG_LICENSE"));
}
