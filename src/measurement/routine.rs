//! The unit of work being timed.
//!
//! A [`Routine`] is invoked with a borrowed input and returns a future of
//! its result. Synchronous closures are adapted into already-resolved
//! futures, so the measurer awaits every invocation the same way and never
//! branches on whether the work was asynchronous.
//!
//! ```ignore
//! use microbench::measurement::{from_async_fn, from_fn, infallible};
//!
//! let sync = infallible(|n: &u64| (0..*n).sum::<u64>());
//! let fallible = from_fn(|path: &String| std::fs::metadata(path).map(|m| m.len()));
//! let asynchronous = from_async_fn(|ms: &u64| {
//!     let ms = *ms;
//!     async move {
//!         tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
//!         Ok::<_, std::io::Error>(())
//!     }
//! });
//! ```

use std::convert::Infallible;
use std::future::{ready, Future, Ready};

use crate::error::BoxError;

/// A timed unit of work taking `&A`.
pub trait Routine<A: ?Sized> {
    /// Value produced by one invocation; passed through `black_box`.
    type Output;
    /// Error that aborts the run.
    type Error: Into<BoxError>;
    /// Future resolving to the invocation's result.
    type Future: Future<Output = Result<Self::Output, Self::Error>>;

    /// Start one invocation.
    fn invoke(&mut self, input: &A) -> Self::Future;
}

/// Synchronous fallible routine. See [`from_fn`].
#[derive(Debug, Clone)]
pub struct FromFn<F>(F);

/// Wrap a synchronous closure returning `Result`.
pub fn from_fn<F>(f: F) -> FromFn<F> {
    FromFn(f)
}

impl<A, F, T, E> Routine<A> for FromFn<F>
where
    A: ?Sized,
    F: FnMut(&A) -> Result<T, E>,
    E: Into<BoxError>,
{
    type Output = T;
    type Error = E;
    type Future = Ready<Result<T, E>>;

    fn invoke(&mut self, input: &A) -> Self::Future {
        ready((self.0)(input))
    }
}

/// Synchronous routine that cannot fail. See [`infallible`].
#[derive(Debug, Clone)]
pub struct InfallibleFn<F>(F);

/// Wrap a synchronous closure that cannot fail.
pub fn infallible<F>(f: F) -> InfallibleFn<F> {
    InfallibleFn(f)
}

impl<A, F, T> Routine<A> for InfallibleFn<F>
where
    A: ?Sized,
    F: FnMut(&A) -> T,
{
    type Output = T;
    type Error = Infallible;
    type Future = Ready<Result<T, Infallible>>;

    fn invoke(&mut self, input: &A) -> Self::Future {
        ready(Ok((self.0)(input)))
    }
}

/// Asynchronous routine. See [`from_async_fn`].
#[derive(Debug, Clone)]
pub struct FromAsyncFn<F>(F);

/// Wrap a closure returning a future of `Result`.
///
/// The returned future must not borrow the input; clone what it needs.
pub fn from_async_fn<F>(f: F) -> FromAsyncFn<F> {
    FromAsyncFn(f)
}

impl<A, F, Fut, T, E> Routine<A> for FromAsyncFn<F>
where
    A: ?Sized,
    F: FnMut(&A) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Into<BoxError>,
{
    type Output = T;
    type Error = E;
    type Future = Fut;

    fn invoke(&mut self, input: &A) -> Self::Future {
        (self.0)(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_on<F: Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime")
            .block_on(future)
    }

    #[test]
    fn test_infallible_routine() {
        let mut routine = infallible(|n: &u32| n * 2);
        assert_eq!(block_on(routine.invoke(&21u32)).unwrap(), 42);
    }

    #[test]
    fn test_fallible_routine_propagates_error() {
        let mut routine = from_fn(|n: &i32| {
            if *n < 0 {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "negative"))
            } else {
                Ok(*n)
            }
        });
        assert_eq!(block_on(routine.invoke(&3i32)).unwrap(), 3);
        let err: BoxError = block_on(routine.invoke(&-1i32)).unwrap_err().into();
        assert_eq!(err.to_string(), "negative");
    }

    #[test]
    fn test_async_routine() {
        let mut calls = 0u32;
        let mut routine = from_async_fn(|n: &u32| {
            calls += 1;
            let n = *n;
            async move { Ok::<_, Infallible>(n + 1) }
        });
        assert_eq!(block_on(routine.invoke(&1u32)).unwrap(), 2);
        assert_eq!(block_on(routine.invoke(&2u32)).unwrap(), 3);
        drop(routine);
        assert_eq!(calls, 2);
    }
}
