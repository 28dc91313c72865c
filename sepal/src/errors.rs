use thiserror::Error;

/// A type alias for a result with a [BoxedSimError] as the error type
pub type SimResult<T> = Result<T, BoxedSimError>;

/// A wrapper type for [SimError]. This exists to keep the return size of
/// results small since the error type carries owned strings.
pub struct BoxedSimError(Box<SimError>);

impl std::fmt::Display for BoxedSimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&*self.0, f)
    }
}

impl std::fmt::Debug for BoxedSimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self, f)
    }
}

impl std::error::Error for BoxedSimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl std::ops::Deref for BoxedSimError {
    type Target = SimError;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> From<T> for BoxedSimError
where
    T: Into<SimError>,
{
    fn from(e: T) -> Self {
        Self(Box::new(T::into(e)))
    }
}

/// An enum representing the different types of errors that can occur
/// while assembling or driving a simulation.
///
/// Failures *inside* a process routine are deliberately not represented
/// here: the kernel does not contain them, they unwind to the caller of
/// [`run`](crate::Simulator::run). Structural misuse of the process
/// handle (operations outside a running process) is a defined panic, not
/// an error value.
#[derive(Error)]
pub enum SimError {
    /// A process with this name has already been registered.
    #[error("a process named '{0}' is already registered")]
    DuplicateProcess(String),

    /// A nonspecific error, used for arbitrary messages
    #[error("{0}")]
    GenericError(String),
}

// needed to make the program print something sensible when returning
// a result from `main`
impl std::fmt::Debug for SimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self, f)
    }
}
