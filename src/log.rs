//! Logging macros
//!
//! The macros expand to:
//! - `defmt` logging when the `defmt` feature is enabled
//! - a level-prefixed line on stderr when only `std` is enabled
//! - nothing otherwise (arguments are still type-checked)

macro_rules! log_error {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::error!($($arg)*);

        #[cfg(all(feature = "std", not(feature = "defmt")))]
        ::std::eprintln!("[ERROR] {}", ::core::format_args!($($arg)*));

        #[cfg(not(any(feature = "std", feature = "defmt")))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::warn!($($arg)*);

        #[cfg(all(feature = "std", not(feature = "defmt")))]
        ::std::eprintln!("[WARN]  {}", ::core::format_args!($($arg)*));

        #[cfg(not(any(feature = "std", feature = "defmt")))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::info!($($arg)*);

        #[cfg(all(feature = "std", not(feature = "defmt")))]
        ::std::eprintln!("[INFO]  {}", ::core::format_args!($($arg)*));

        #[cfg(not(any(feature = "std", feature = "defmt")))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::debug!($($arg)*);

        #[cfg(all(feature = "std", not(feature = "defmt"), debug_assertions))]
        ::std::eprintln!("[DEBUG] {}", ::core::format_args!($($arg)*));

        #[cfg(not(any(all(feature = "std", debug_assertions), feature = "defmt")))]
        let _ = ::core::format_args!($($arg)*);
    }};
}
