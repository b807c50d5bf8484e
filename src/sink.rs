//! The callback interface events are dispatched to.

/// Receives events from a [`crate::Generator`].
///
/// Every method defaults to a no-op that returns `true`; implement only the
/// events you care about. Returning `false` from any method requests that
/// the generator stop — the originating parse (if any) fails with
/// [`crate::ErrorKind::Terminated`], unless [`Sink::take_error`] supplies a
/// more specific error to prefer instead.
pub trait Sink {
    fn null(&mut self) -> bool {
        true
    }

    fn boolean(&mut self, _is_true: bool) -> bool {
        true
    }

    fn integer(&mut self, _value: i64) -> bool {
        true
    }

    fn real(&mut self, _value: f64) -> bool {
        true
    }

    fn string(&mut self, _bytes: &[u8]) -> bool {
        true
    }

    fn key(&mut self, _bytes: &[u8]) -> bool {
        true
    }

    fn start_array(&mut self) -> bool {
        true
    }

    fn end_array(&mut self) -> bool {
        true
    }

    fn start_object(&mut self) -> bool {
        true
    }

    fn end_object(&mut self) -> bool {
        true
    }

    /// A more specific error to report instead of
    /// [`crate::ErrorKind::Terminated`], if the last call returning `false`
    /// has one. Taken (and cleared) once read.
    fn take_error(&mut self) -> Option<crate::error::Error> {
        None
    }
}
