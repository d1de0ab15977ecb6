#![no_std]

use core::{any::type_name, fmt};

/// An error kind paired with the data the failed operation hands back.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Error<K, T: ?Sized> {
    pub kind: K,
    pub data: T,
}

impl<K, T> Error<K, T> {
    pub fn into_data(self) -> T {
        self.data
    }
}

impl<K: fmt::Display, T: ?Sized> fmt::Display for Error<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, type_name::<T>())
    }
}

impl<K: fmt::Display + fmt::Debug, T: fmt::Debug> core::error::Error for Error<K, T> {}

#[macro_export]
macro_rules! make_error {
    ($kind:ident => $v:vis $err:ident) => {
        $v type $err<T> = meshnet_error::Error<$kind, T>;

        impl $kind {
            $v fn with<T>(self, data: T) -> $err<T> {
                $err { kind: self, data }
            }
        }
    };
}
