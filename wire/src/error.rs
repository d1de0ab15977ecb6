use core::fmt;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ParseErrorKind {
    PacketTooShort,
    VersionInvalid,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::PacketTooShort => write!(f, "packet too short"),
            ParseErrorKind::VersionInvalid => write!(f, "version invalid"),
        }
    }
}

meshnet_error::make_error!(ParseErrorKind => pub ParseError);
