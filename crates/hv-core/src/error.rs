use thiserror::Error;

pub type HvResult<T> = Result<T, HvError>;

#[derive(Error, Debug)]
pub enum HvError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Value out of bounds for {what}: {value} not in [{min}, {max}]")]
    OutOfBounds {
        what: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}
