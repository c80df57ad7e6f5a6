use std::{fmt::Display, panic::Location};

use anyhow::Context;

pub mod prelude {
    extern crate anyhow;
    pub use anyhow::{anyhow, bail, Context, Result};

    extern crate thiserror;
    pub use thiserror::Error;

    pub use super::{LocatedError, LocatedOption};
    pub use crate::loc;
}

#[doc(hidden)]
pub use anyhow as __anyhow;

/// Format a caller location as `[file:line:column]`
fn locate(caller: &Location) -> String {
    format!("[{}:{}:{}]", caller.file(), caller.line(), caller.column())
}

/// Return early with an `Err(anyhow::Error)`, tagged with the location at which the macro was invoked.
///
/// ```
/// use located_error::prelude::*;
/// fn always_fails() -> Result<()> {
///     loc!("Whoops")
/// }
/// assert!(always_fails().is_err());
/// ```
#[macro_export]
macro_rules! loc {
    ($err:expr) => {
        $crate::LocatedError::with_loc(
            ::core::result::Result::Err($crate::__anyhow::anyhow!($err)),
            || "Raised here"
        )
    };
}

pub trait LocatedError<T, E> {
    /// Wrap the error value with additional context + the location at which it was called.
    fn loc<C>(self, context: C) -> anyhow::Result<T>
    where
        C: Display + Send + Sync + 'static;

    /// Wrap the error value with additional context that is evaluated lazily
    /// only once an error does occur + the location at which it was called.
    fn with_loc<C, F>(self, f: F) -> anyhow::Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> LocatedError<T, E> for Result<T, E>
where
    E: Display + Send + Sync + 'static,
    Result<T, E>: Context<T, E>,
{
    #[track_caller]
    fn loc<C>(self, context: C) -> anyhow::Result<T>
    where
        C: Display + Send + Sync + 'static
    {
        let caller = Location::caller();
        self.with_context(|| format!("{} {context}", locate(caller)))
    }

    #[track_caller]
    fn with_loc<C, F>(self, f: F) -> anyhow::Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C
    {
        let caller = Location::caller();
        self.with_context(|| format!("{} {}", locate(caller), f()))
    }
}

pub trait LocatedOption<T> {
    /// Convert a `None` into an error carrying `context` + the location at which it was called.
    fn loc<C>(self, context: C) -> anyhow::Result<T>
    where
        C: Display + Send + Sync + 'static;

    /// Lazy variant of [`LocatedOption::loc`]
    fn with_loc<C, F>(self, f: F) -> anyhow::Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T> LocatedOption<T> for Option<T> {
    #[track_caller]
    fn loc<C>(self, context: C) -> anyhow::Result<T>
    where
        C: Display + Send + Sync + 'static
    {
        let caller = Location::caller();
        self.with_context(|| format!("{} {context}", locate(caller)))
    }

    #[track_caller]
    fn with_loc<C, F>(self, f: F) -> anyhow::Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C
    {
        let caller = Location::caller();
        self.with_context(|| format!("{} {}", locate(caller), f()))
    }
}
