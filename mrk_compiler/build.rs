// build.rs - bakes config/<profile>.toml into `config::compile_time`
use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

#[derive(serde::Deserialize)]
struct Limits {
    file_processing: FileProcessing,
    lexical: Lexical,
    batch_processing: BatchProcessing,
    logging: Logging,
}

#[derive(serde::Deserialize)]
struct FileProcessing {
    max_file_size: u64,
    large_file_threshold: u64,
}

#[derive(serde::Deserialize)]
struct Lexical {
    max_token_count: usize,
}

#[derive(serde::Deserialize)]
struct BatchProcessing {
    max_worker_threads: usize,
    max_files_per_batch: usize,
}

#[derive(serde::Deserialize)]
struct Logging {
    log_buffer_size: usize,
    max_log_events_per_file: usize,
    max_log_verbosity: u8,
}

const HARD_MAX_FILE_SIZE: u64 = 1_000_000_000;
const HARD_MAX_TOKEN_COUNT: usize = 100_000_000;
const PRODUCTION_MAX_FILE_SIZE: u64 = 50_000_000;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=MRK_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=MRK_CONFIG_DIR");

    let profile = env::var("MRK_BUILD_PROFILE").unwrap_or_else(|_| "development".into());
    let config_dir = env::var("MRK_CONFIG_DIR").unwrap_or_else(|_| "config".into());

    // config/ sits at the workspace root, one level above this crate
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let workspace_root = manifest_dir.parent().unwrap_or(&manifest_dir);
    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));
    println!("cargo:rerun-if-changed={}", config_path.display());

    let text = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        panic!(
            "cannot read build profile '{}' at {}: {}",
            profile,
            config_path.display(),
            e
        )
    });
    let limits: Limits = toml::from_str(&text)
        .unwrap_or_else(|e| panic!("{} is not a valid limits file: {}", config_path.display(), e));

    let problems = check(&limits, &profile);
    if !problems.is_empty() {
        panic!(
            "{} rejected:\n  - {}",
            config_path.display(),
            problems.join("\n  - ")
        );
    }

    let out = PathBuf::from(env::var("OUT_DIR").unwrap()).join("constants.rs");
    fs::write(&out, render(&limits, &profile))
        .unwrap_or_else(|e| panic!("cannot write {}: {}", out.display(), e));
}

fn check(limits: &Limits, profile: &str) -> Vec<String> {
    let mut problems = Vec::new();
    let files = &limits.file_processing;
    let logging = &limits.logging;

    if files.max_file_size > HARD_MAX_FILE_SIZE {
        problems.push(format!("max_file_size above {}", HARD_MAX_FILE_SIZE));
    }
    if files.large_file_threshold > files.max_file_size {
        problems.push("large_file_threshold above max_file_size".into());
    }
    if !(1..=HARD_MAX_TOKEN_COUNT).contains(&limits.lexical.max_token_count) {
        problems.push(format!("max_token_count outside 1..={}", HARD_MAX_TOKEN_COUNT));
    }
    if limits.batch_processing.max_worker_threads == 0 {
        problems.push("max_worker_threads must be at least 1".into());
    }
    if logging.max_log_events_per_file > logging.log_buffer_size {
        problems.push("max_log_events_per_file above log_buffer_size".into());
    }
    if logging.max_log_verbosity > 3 {
        problems.push("max_log_verbosity must be 0 (error) through 3 (debug)".into());
    }
    if profile == "production" && files.max_file_size > PRODUCTION_MAX_FILE_SIZE {
        problems.push(format!(
            "production max_file_size above {}",
            PRODUCTION_MAX_FILE_SIZE
        ));
    }

    problems
}

fn render(limits: &Limits, profile: &str) -> String {
    let sections: [(&str, Vec<(&str, &str, String)>); 4] = [
        (
            "file_processing",
            vec![
                ("MAX_FILE_SIZE", "u64", limits.file_processing.max_file_size.to_string()),
                (
                    "LARGE_FILE_THRESHOLD",
                    "u64",
                    limits.file_processing.large_file_threshold.to_string(),
                ),
            ],
        ),
        (
            "lexical",
            vec![("MAX_TOKEN_COUNT", "usize", limits.lexical.max_token_count.to_string())],
        ),
        (
            "batch_processing",
            vec![
                (
                    "MAX_WORKER_THREADS",
                    "usize",
                    limits.batch_processing.max_worker_threads.to_string(),
                ),
                (
                    "MAX_FILES_PER_BATCH",
                    "usize",
                    limits.batch_processing.max_files_per_batch.to_string(),
                ),
            ],
        ),
        (
            "logging",
            vec![
                ("LOG_BUFFER_SIZE", "usize", limits.logging.log_buffer_size.to_string()),
                (
                    "MAX_LOG_EVENTS_PER_FILE",
                    "usize",
                    limits.logging.max_log_events_per_file.to_string(),
                ),
                ("MAX_LOG_VERBOSITY", "u8", limits.logging.max_log_verbosity.to_string()),
            ],
        ),
    ];

    let mut code = format!("// Generated by build.rs from the '{}' profile\n\n", profile);
    code.push_str("pub mod compile_time {\n");
    for (module, constants) in &sections {
        let _ = writeln!(code, "    pub mod {} {{", module);
        for (name, ty, value) in constants {
            let _ = writeln!(code, "        pub const {}: {} = {};", name, ty, value);
        }
        code.push_str("    }\n");
    }
    code.push_str("}\n");
    code
}
