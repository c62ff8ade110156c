/// Builds a [`Record`](crate::Record) from literal pairs.
///
/// `null` in key position stands for the unlabeled key, in value position for
/// a key without a value.
///
/// ```rust
/// use ltsv_stream::record;
///
/// let record = record! { "host" => "example.com", "referer" => null };
/// assert_eq!(record.len(), 2);
/// ```
#[macro_export]
macro_rules! record {
    (@part null) => {
        ::core::option::Option::None
    };

    (@part $part:expr) => {
        ::core::option::Option::Some(::std::string::String::from($part))
    };

    () => {
        $crate::Record::new()
    };

    ($($key:tt => $value:tt),+ $(,)?) => {{
        let mut record = $crate::Record::new();
        $(
            record.insert($crate::record!(@part $key), $crate::record!(@part $value));
        )+
        record
    }};
}
