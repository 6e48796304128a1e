pub mod range;
pub mod unit;

/// A macro to measure the evaluation time of an expression. Wraps an
/// expression, logs how long it took, and evaluates to the value of the
/// expression.
#[cfg(not(target_arch = "wasm32"))]
#[macro_export]
macro_rules! timed {
    ($label:expr, $ex:expr) => {
        timed!($label, log::Level::Debug, $ex)
    };
    ($label:expr, $log_level:expr, $ex:expr) => {{
        let now = std::time::Instant::now();
        let value = $ex;
        let elapsed = now.elapsed();
        log::log!($log_level, "{} took {} ms", $label, elapsed.as_millis());
        value
    }};
}

/// Re-implementation of the above macro for wasm. `Instant` isn't available
/// in the browser without pulling in web APIs, so this just logs completion.
#[cfg(target_arch = "wasm32")]
#[doc(hidden)]
#[macro_export]
macro_rules! timed {
    ($label:expr, $ex:expr) => {
        timed!($label, log::Level::Debug, $ex)
    };
    ($label:expr, $log_level:expr, $ex:expr) => {{
        let value = $ex;
        log::log!($log_level, "{} done", $label);
        value
    }};
}

/// Calculate the number of tiles in a hexagon-shaped region based on its
/// radius. Radius 0 means 1 tile, 1 is 7 tiles, 2 is 19, etc.
pub fn hex_count(radius: u16) -> usize {
    // We'll always have 3r^2+3r+1 tiles (a reduction of a geometric sum).
    // f(0) = 1, and we add 6r tiles for every step after that, so:
    // 1, (+6) 7, (+12) 19, (+18) 37, ...
    let r = radius as usize;
    3 * r * r + 3 * r + 1
}
