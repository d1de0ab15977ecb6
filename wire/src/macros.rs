macro_rules! enum_with_unknown {
    (
        $( #[$enum_attr:meta] )*
        pub enum $name:ident($ty:ty) {
            $(
              $( #[$variant_attr:meta] )*
              $variant:ident = $value:expr
            ),+ $(,)?
        }
    ) => {
        #[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
        $( #[$enum_attr] )*
        pub enum $name {
            $(
              $( #[$variant_attr] )*
              $variant
            ),*,
            Unknown($ty)
        }

        impl ::core::convert::From<$ty> for $name {
            fn from(value: $ty) -> Self {
                match value {
                    $( $value => $name::$variant ),*,
                    other => $name::Unknown(other)
                }
            }
        }

        impl ::core::convert::From<$name> for $ty {
            fn from(value: $name) -> Self {
                match value {
                    $( $name::$variant => $value ),*,
                    $name::Unknown(other) => other
                }
            }
        }
    }
}

/// Generate a getter/setter pair per header field on a byte-slice wrapper.
macro_rules! wire {
    (impl $packet:ident {
        $(
            $(#[$attr:meta])*
            $vis:vis $get:ident/$set:ident: $ty:ty =>
                |$data:ident| $getter:expr;
                |$data_mut:ident, $arg:ident| $setter:expr;
        )*
    }) => {
        impl<T: AsRef<[u8]> + ?Sized> $packet<T> {
            $(
                $(#[$attr])*
                $vis fn $get(&self) -> $ty {
                    let $data: &[u8] = self.0.as_ref();
                    $getter
                }
            )*
        }

        impl<T: AsMut<[u8]> + ?Sized> $packet<T> {
            $(
                $vis fn $set(&mut self, $arg: $ty) {
                    let $data_mut: &mut [u8] = self.0.as_mut();
                    $setter
                }
            )*
        }
    };
}
