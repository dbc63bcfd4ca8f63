//! Pure functions available to every script without an actor prefix.

use carlo_foundation::Value;

use crate::dispatcher::Arguments;

/// Names of the inbuilt functions.
pub const NAMES: [&str; 3] = ["pi", "sine", "cosine"];

/// Runs the inbuilt function `name`.
///
/// A missing `x` argument reads as zero. Returns `None` for unknown names
/// and for non-numeric arguments.
#[must_use]
pub fn perform(name: &str, args: &Arguments) -> Option<Value> {
    match name {
        "pi" => Some(Value::from(std::f64::consts::PI)),
        "sine" => argument(args, "x").map(|x| Value::from(x.sin())),
        "cosine" => argument(args, "x").map(|x| Value::from(x.cos())),
        _ => None,
    }
}

fn argument(args: &Arguments, name: &str) -> Option<f64> {
    args.get(name).map_or(Some(0.0), |value| value.as_number().ok())
}
