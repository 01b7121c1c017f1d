use autoani_derive::autoani_error;
use std::borrow::Cow;

#[autoani_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn load() -> Result<(), DemoError> {
    std::fs::read("missing").context("loading fixture")?;
    Err("unreachable".into())
}

fn main() {
    let _ = load();
}
