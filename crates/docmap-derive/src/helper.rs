use proc_macro2::TokenStream;
use quote::quote;

// Quoting helpers

/// Quote an `Option`, applying the transform to the inner value when present.
pub fn quote_option<T, F>(opt: Option<&T>, transform: F) -> TokenStream
where
    F: FnOnce(&T) -> TokenStream,
{
    if let Some(v) = opt {
        let transformed = transform(v);
        quote!(Some(#transformed))
    } else {
        quote!(None)
    }
}

/// Quote a slice by transforming each element and returning a token array.
pub fn quote_slice<T, F>(items: &[T], transform: F) -> TokenStream
where
    F: Fn(&T) -> TokenStream,
{
    let items = items.iter().map(transform);

    quote! {
        &[#(#items),*]
    }
}

// Transform helpers

/// Quote a string as a string literal token.
#[allow(clippy::ptr_arg)]
pub fn to_str_lit(s: &String) -> TokenStream {
    quote!(#s)
}

/// Resolve an `EntityKind` implementor to its associated `MODEL` constant.
pub fn to_model<T: quote::ToTokens>(t: &T) -> TokenStream {
    quote! { <#t as ::docmap::traits::EntityKind>::MODEL }
}

/// Split a comma-separated field list.
///
/// Items are trimmed but kept when empty, so `"a, "` yields `["a", ""]` and
/// the blank entry is reported when the descriptor is resolved. A wholly
/// blank string is an empty list.
#[must_use]
pub fn split_fields(s: &str) -> Vec<String> {
    if s.trim().is_empty() {
        return Vec::new();
    }

    s.split(',').map(|item| item.trim().to_string()).collect()
}

/// Lowercase the first character of an identifier.
#[must_use]
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();

    chars.next().map_or_else(String::new, |first| {
        first.to_lowercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_keeps_blank_items() {
        assert_eq!(split_fields("tenant, ts"), vec!["tenant", "ts"]);
        assert_eq!(split_fields("a, "), vec!["a", ""]);
        assert_eq!(split_fields("  "), Vec::<String>::new());
        assert_eq!(split_fields("address.country"), vec!["address.country"]);
    }

    #[test]
    fn lower_first_only_touches_first_char() {
        assert_eq!(lower_first("UserAccount"), "userAccount");
        assert_eq!(lower_first("order"), "order");
        assert_eq!(lower_first(""), "");
    }
}
