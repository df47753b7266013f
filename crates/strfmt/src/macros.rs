//! Variadic wrappers. Every argument must implement `AsRef<str>`.

/// `sprintf!("fmt", a, b)` is `sprintf("fmt", &[a, b])`.
#[macro_export]
macro_rules! sprintf {
    ($format:expr $(, $arg:expr)* $(,)?) => {
        $crate::sprintf($format, &[$(::core::convert::AsRef::<str>::as_ref(&$arg)),*] as &[&str])
    };
}

#[macro_export]
macro_rules! printf {
    ($format:expr $(, $arg:expr)* $(,)?) => {
        $crate::printf($format, &[$(::core::convert::AsRef::<str>::as_ref(&$arg)),*] as &[&str])
    };
}

/// `fprintf!(writer, "fmt", args...)`; `writer` is anything that derefs to
/// an `io::Write`, typically `&mut w`.
#[macro_export]
macro_rules! fprintf {
    ($writer:expr, $format:expr $(, $arg:expr)* $(,)?) => {
        $crate::fprintf($writer, $format, &[$(::core::convert::AsRef::<str>::as_ref(&$arg)),*] as &[&str])
    };
}

#[macro_export]
macro_rules! errorf {
    ($format:expr $(, $arg:expr)* $(,)?) => {
        $crate::errorf($format, &[$(::core::convert::AsRef::<str>::as_ref(&$arg)),*] as &[&str])
    };
}
