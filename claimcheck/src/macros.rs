//! Declarative macros for writing signatures with less boilerplate.

/// Build a `Vec<Specifier>` from literals and generators alike
///
/// # Examples
///
/// ```rust
/// use claimcheck::{Specifier, integer, specs};
///
/// let signature: Vec<Specifier> = specs![integer(), "literal", 3.5, true];
/// assert_eq!(signature.len(), 4);
/// assert!(signature[0].is_generator());
/// assert!(!signature[1].is_generator());
/// ```
#[macro_export]
macro_rules! specs {
    () => { ::std::vec::Vec::<$crate::Specifier>::new() };
    ($($spec:expr),+ $(,)?) => { ::std::vec![$($crate::Specifier::from($spec)),+] };
}

/// Build the field list for [`object_of`](crate::object_of)
///
/// # Examples
///
/// ```rust
/// use claimcheck::{boolean, fields, object_of};
///
/// let mut user = object_of(fields! {
///     "name" => "ada",
///     "admin" => boolean(),
/// });
/// let mut rng = claimcheck::rng::create_seeded_rng(3);
/// let value = user.resolve(&mut rng, &[]).unwrap();
/// assert_eq!(value.as_object().unwrap().len(), 2);
/// ```
#[macro_export]
macro_rules! fields {
    () => { ::std::vec::Vec::<(::std::string::String, $crate::Specifier)>::new() };
    ($($key:expr => $spec:expr),+ $(,)?) => {
        ::std::vec![$((::std::string::String::from($key), $crate::Specifier::from($spec))),+]
    };
}

#[cfg(test)]
mod tests {
    use crate::{Specifier, Value};

    #[test]
    fn test_specs_macro() {
        let empty = specs![];
        assert!(empty.is_empty());

        let signature = specs![1, "two", crate::boolean(),];
        assert_eq!(signature.len(), 3);
        assert_eq!(signature[1].as_value(), Some(&Value::from("two")));
        assert!(signature[2].is_generator());
    }

    #[test]
    fn test_fields_macro() {
        let list: Vec<(String, Specifier)> = fields! { "a" => 1, "b" => "x" };
        assert_eq!(list[0].0, "a");
        assert_eq!(list[1].1.as_value(), Some(&Value::from("x")));
        assert!(fields!().is_empty());
    }
}
