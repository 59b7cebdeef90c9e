/// Adds `new` and `as_str` to one or more `String` newtypes.
#[macro_export]
macro_rules! impl_string_newtype {
    ($($name:ty),+ $(,)?) => {
        $(
            impl $name {
                pub fn new(s: impl Into<String>) -> Self {
                    Self(s.into())
                }

                pub fn as_str(&self) -> &str {
                    &self.0
                }
            }
        )+
    };
}
