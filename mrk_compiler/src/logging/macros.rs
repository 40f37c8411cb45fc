//! Logging macros taking a code, a message and `"key" => value` context
//! pairs. Context values may be any `Display` type.
//!
//! Errors and warnings also reach the global error collector. Debug events
//! are not built at all unless the effective level admits them.

#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr, span = $span:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::log_error_with_context(
            $code,
            $message,
            Some($span),
            vec![$(($key, format!("{}", $value))),*],
        )
    };

    ($code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::log_error_with_context(
            $code,
            $message,
            None,
            vec![$(($key, format!("{}", $value))),*],
        )
    };
}

#[macro_export]
macro_rules! log_success {
    ($code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::log_success_with_context(
            $code,
            $message,
            vec![$(($key, format!("{}", $value))),*],
        )
    };
}

#[macro_export]
macro_rules! log_info {
    ($message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::log_info_with_context(
            $message,
            vec![$(($key, format!("{}", $value))),*],
        )
    };
}

#[macro_export]
macro_rules! log_warning {
    ($message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::logging::log_warning_with_context(
            $message,
            vec![$(($key, format!("{}", $value))),*],
        )
    };
}

#[macro_export]
macro_rules! log_debug {
    ($message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        if $crate::logging::debug_enabled() {
            $crate::logging::log_debug_with_context(
                $message,
                vec![$(($key, format!("{}", $value))),*],
            )
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::logging::codes;

    #[test]
    fn test_macros_accept_display_values() {
        // Must not panic whether or not global logging is initialized
        let tokens: usize = 42;
        let path = std::path::PathBuf::from("demo.mrk");

        log_error!(codes::syntax::EXPECTED_SEMICOLON, "Expected ';'",
            "file" => path.display(),
            "fatal" => true
        );
        log_success!(codes::success::TOKENIZATION_COMPLETE, "Tokenization completed",
            "tokens" => tokens
        );
        log_info!("Processing file", "path" => path.display());
        log_warning!("Malformed literal", "token" => "'\\q'");
        log_debug!("Scopes matched", "count" => 3);
    }
}
