use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitStr, Type};

/// Per-field settings parsed from `#[env(...)]`
#[derive(Default)]
struct FieldAttrs {
    key: Option<String>,
    default: Option<String>,
    separator: Option<String>,
    prefix: Option<String>,
    nested: bool,
}

/// How a field's type is bound, resolved once at expansion time
enum FieldShape<'a> {
    /// `Vec<u8>`: the raw text's bytes, never split
    Bytes,
    /// `Vec<T>`: split on the separator, each piece bound to `T`
    Seq(&'a Type),
    /// `HashMap<K, V>` / `BTreeMap<K, V>`: split into `key:value` pairs
    Map(&'a Type, &'a Type),
    /// Everything else goes through the capability probe
    Leaf,
}

/// Derives the field walk that binds a struct from environment variables
#[proc_macro_derive(FromEnv, attributes(env))]
pub fn derive_from_env(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "FromEnv only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "FromEnv only supports structs",
            ));
        }
    };

    let mut binds = Vec::new();

    for field in fields {
        let ident = field.ident.as_ref().unwrap();
        let attrs = parse_env_attrs(field)?;

        // Nested records get a prefix, never a key of their own; the walk
        // recurses before any capability of the field type is consulted.
        if attrs.nested || attrs.prefix.is_some() {
            let child = attrs.prefix.clone().unwrap_or_default();
            binds.push(quote! {
                ::envbind::FromEnv::bind_from(
                    &mut self.#ident,
                    source,
                    &::envbind::__private::join_prefix(prefix, #child),
                )?;
            });
            continue;
        }

        let lookup_name = attrs
            .key
            .clone()
            .unwrap_or_else(|| ident.to_string())
            .to_uppercase();
        let default_tokens = match &attrs.default {
            Some(text) => quote! { ::core::option::Option::Some(#text) },
            None => quote! { ::core::option::Option::None },
        };
        let separator = attrs.separator.clone().unwrap_or_else(|| ",".to_string());

        let spec_tokens = quote! {
            ::envbind::FieldSpec {
                name: #lookup_name,
                default: #default_tokens,
                separator: #separator,
            }
        };

        let bind = match resolve_shape(&field.ty) {
            FieldShape::Bytes => quote! {
                {
                    let spec = #spec_tokens;
                    let (_key, raw) = spec.resolve(source, prefix);
                    self.#ident = raw.into_bytes();
                }
            },
            FieldShape::Seq(elem) => {
                let elem_probe = probe_expr(elem, quote!(item));
                checked_bind(ident, &spec_tokens, quote! {
                    ::envbind::__private::decode_seq(&raw, spec.separator, |item| #elem_probe)
                })
            }
            FieldShape::Map(key_ty, value_ty) => {
                let key_probe = probe_expr(key_ty, quote!(item));
                let value_probe = probe_expr(value_ty, quote!(item));
                checked_bind(ident, &spec_tokens, quote! {
                    ::envbind::__private::decode_map(
                        &raw,
                        spec.separator,
                        |item| #key_probe,
                        |item| #value_probe,
                    )
                })
            }
            FieldShape::Leaf => {
                let probe = probe_expr(&field.ty, quote!(&raw));
                checked_bind(ident, &spec_tokens, probe)
            }
        };
        binds.push(bind);
    }

    Ok(quote! {
        #[automatically_derived]
        impl ::envbind::FromEnv for #name {
            fn bind_from(
                &mut self,
                source: &dyn ::envbind::EnvSource,
                prefix: &str,
            ) -> ::core::result::Result<(), ::envbind::BindError> {
                #(#binds)*
                ::core::result::Result::Ok(())
            }
        }
    })
}

/// Resolves the field's lookup key and raw text, runs `value_expr` and wraps
/// any decode failure with the key before aborting the walk.
fn checked_bind(
    ident: &syn::Ident,
    spec_tokens: &proc_macro2::TokenStream,
    value_expr: proc_macro2::TokenStream,
) -> proc_macro2::TokenStream {
    quote! {
        {
            let spec = #spec_tokens;
            let (key, raw) = spec.resolve(source, prefix);
            self.#ident = match #value_expr {
                ::core::result::Result::Ok(value) => value,
                ::core::result::Result::Err(err) => {
                    return ::core::result::Result::Err(
                        ::envbind::BindError::conversion(key, err),
                    );
                }
            };
        }
    }
}

/// Conversion of one piece of text into `ty`, dispatching ParseText, then
/// SetText, then the built-in kinds, by method resolution on the probe.
fn probe_expr(ty: &Type, raw: proc_macro2::TokenStream) -> proc_macro2::TokenStream {
    quote! {
        {
            #[allow(unused_imports)]
            use ::envbind::__private::{
                ViaFromEnvValue as _, ViaParseText as _, ViaSetText as _,
            };
            (&&&::envbind::__private::Probe::<#ty>::new()).bind(#raw, spec.separator)
        }
    }
}

fn resolve_shape(ty: &Type) -> FieldShape<'_> {
    let path = match ty {
        Type::Path(path) if path.qself.is_none() => &path.path,
        _ => return FieldShape::Leaf,
    };
    let segment = match path.segments.last() {
        Some(segment) => segment,
        None => return FieldShape::Leaf,
    };

    let args = type_args(segment);
    if segment.ident == "Vec" && args.len() == 1 {
        if is_u8(args[0]) {
            return FieldShape::Bytes;
        }
        return FieldShape::Seq(args[0]);
    }
    if (segment.ident == "HashMap" || segment.ident == "BTreeMap") && args.len() >= 2 {
        return FieldShape::Map(args[0], args[1]);
    }

    FieldShape::Leaf
}

fn type_args(segment: &syn::PathSegment) -> Vec<&Type> {
    match &segment.arguments {
        syn::PathArguments::AngleBracketed(args) => args
            .args
            .iter()
            .filter_map(|arg| match arg {
                syn::GenericArgument::Type(ty) => Some(ty),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn is_u8(ty: &Type) -> bool {
    match ty {
        Type::Path(path) => path.qself.is_none() && path.path.is_ident("u8"),
        _ => false,
    }
}

/// Parse `#[env(key = "X", default = "Y", separator = ";", prefix = "Z", nested)]`
fn parse_env_attrs(field: &syn::Field) -> syn::Result<FieldAttrs> {
    let mut parsed = FieldAttrs::default();

    for attr in &field.attrs {
        if !attr.path().is_ident("env") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("key") {
                let value: LitStr = meta.value()?.parse()?;
                parsed.key = Some(value.value());
            } else if meta.path.is_ident("default") {
                let value: LitStr = meta.value()?.parse()?;
                parsed.default = Some(value.value());
            } else if meta.path.is_ident("separator") {
                let value: LitStr = meta.value()?.parse()?;
                if value.value().is_empty() {
                    return Err(meta.error("separator must not be empty"));
                }
                parsed.separator = Some(value.value());
            } else if meta.path.is_ident("prefix") {
                let value: LitStr = meta.value()?.parse()?;
                parsed.prefix = Some(value.value());
            } else if meta.path.is_ident("nested") {
                parsed.nested = true;
            } else {
                return Err(meta.error(
                    "unknown env attribute, expected one of: key, default, separator, prefix, nested",
                ));
            }
            Ok(())
        })?;
    }

    if (parsed.nested || parsed.prefix.is_some())
        && (parsed.key.is_some() || parsed.default.is_some() || parsed.separator.is_some())
    {
        return Err(syn::Error::new_spanned(
            field,
            "nested fields have a prefix, not a key; key, default and separator do not apply",
        ));
    }

    Ok(parsed)
}
