use std::any::Any;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    #[error("{0}")]
    Panic(String),
    #[error("{combinator} expected {expected}, got {received}")]
    TypeMismatch {
        combinator: &'static str,
        expected:   &'static str,
        received:   String,
    },
    #[error("settlement callbacks dropped without settling")]
    Unsettled,
}

impl Error {
    pub fn mismatch(combinator: &'static str, expected: &'static str, received: impl Into<String>) -> Self {
        Self::TypeMismatch {
            combinator: combinator,
            expected:   expected,
            received:   received.into(),
        }
    }

    pub(crate) fn panic(payload: Box<dyn Any + Send>) -> Self {
        let message = match payload.downcast::<String>() {
            Ok(s)  => *s,
            Err(p) => match p.downcast::<&'static str>() {
                Ok(s)  => (*s).to_owned(),
                Err(_) => "panic with non-string payload".to_owned(),
            },
        };
        Self::Panic(message)
    }
}
