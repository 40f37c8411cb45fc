//! Configuration for the mrk compiler
//!
//! Hard limits come from `config/<profile>.toml`, baked into
//! [`compile_time`] by the build script. Everything a user may tune lives
//! in [`runtime`].

include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod runtime;

/// Build information and configuration metadata
pub mod build_info {
    /// Configuration profile used during build
    pub fn profile() -> &'static str {
        option_env!("MRK_BUILD_PROFILE").unwrap_or("development")
    }

    /// Configuration directory used during build
    pub fn config_dir() -> &'static str {
        option_env!("MRK_CONFIG_DIR").unwrap_or("config")
    }

    pub fn source_info() -> String {
        format!("Generated from {}/{}.toml", config_dir(), profile())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_limits_are_consistent() {
        assert!(compile_time::file_processing::LARGE_FILE_THRESHOLD
            <= compile_time::file_processing::MAX_FILE_SIZE);
        assert!(compile_time::lexical::MAX_TOKEN_COUNT > 0);
        assert!(compile_time::batch_processing::MAX_WORKER_THREADS > 0);
        assert!(compile_time::logging::MAX_LOG_EVENTS_PER_FILE
            <= compile_time::logging::LOG_BUFFER_SIZE);
        assert!(compile_time::logging::MAX_LOG_VERBOSITY <= 3);
    }

    #[test]
    fn test_source_info_names_profile() {
        assert!(build_info::source_info().ends_with(&format!("{}.toml", build_info::profile())));
    }
}
