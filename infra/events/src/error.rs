use std::borrow::Cow;

/// Errors raised by [`crate::EventBus`].
#[autoani_derive::autoani_error]
pub enum EventBusError {
    /// The registry holds a channel of another type under the same key.
    #[error("Type mismatch{}: {message}", format_context(.context))]
    TypeMismatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid capacity{}: {message}", format_context(.context))]
    InvalidCapacity { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
