use fxhash::FxHashSet;
use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::parse::Parser;
use syn::{Attribute, Expr, Item, ItemFn, Lit, LitStr, Meta, MetaNameValue};

use super::derived_trait_names;

/// Expands `#[api_model]` for structs and unit enums.
pub fn expand_api_model(args: TokenStream, input: Item) -> TokenStream {
    let (attrs, ident, is_struct) = match &input {
        Item::Struct(item) => (&item.attrs, &item.ident, true),
        Item::Enum(item) => (&item.attrs, &item.ident, false),
        other => {
            return syn::Error::new_spanned(other, "api_model supports structs and enums only")
                .to_compile_error();
        },
    };

    let result = parse_args(args).and_then(|args| {
        let serde = SerdeInfo::collect(attrs)?;
        let rename = rename_attr(args.rename_all, &serde, is_struct)?;
        let deny = if is_struct {
            deny_unknown_attr(args.deny_unknown_fields, &serde, ident)?
        } else if args.deny_unknown_fields.is_some() {
            return Err(syn::Error::new_spanned(
                ident,
                "deny_unknown_fields only applies to structs",
            ));
        } else {
            quote! {}
        };
        Ok((rename, deny))
    });
    let (rename, deny) = match result {
        Ok(parts) => parts,
        Err(err) => return err.to_compile_error(),
    };

    let derives = derived_trait_names(attrs);
    let derive = derive_attr(&derives);

    quote! {
        #derive
        #rename
        #deny
        #input
    }
}

/// Expands `#[api_handler]`: attaches `utoipa::path` and keeps the handler body as is.
pub fn expand_api_handler(args: TokenStream, input: ItemFn) -> TokenStream {
    let ItemFn { attrs, vis, sig, block } = &input;

    quote! {
        #(#attrs)*
        #[allow(clippy::unused_async)]
        #[::utoipa::path(#args)]
        #vis #sig #block
    }
}

#[derive(Default)]
struct ModelArgs {
    rename_all: Option<LitStr>,
    deny_unknown_fields: Option<bool>,
}

fn parse_args(args: TokenStream) -> syn::Result<ModelArgs> {
    let metas = syn::punctuated::Punctuated::<Meta, syn::Token![,]>::parse_terminated.parse2(args)?;
    let mut parsed = ModelArgs::default();

    for meta in metas {
        let Meta::NameValue(nv) = meta else {
            return Err(syn::Error::new_spanned(
                meta,
                "expected name-value arguments like `rename_all = \"...\"`",
            ));
        };

        if nv.path.is_ident("rename_all") {
            let Lit::Str(lit) = literal(&nv)? else {
                return Err(syn::Error::new_spanned(&nv.value, "rename_all must be a string"));
            };
            set_once(&mut parsed.rename_all, &nv, lit)?;
        } else if nv.path.is_ident("deny_unknown_fields") {
            let Lit::Bool(lit) = literal(&nv)? else {
                return Err(syn::Error::new_spanned(
                    &nv.value,
                    "deny_unknown_fields must be a boolean",
                ));
            };
            set_once(&mut parsed.deny_unknown_fields, &nv, lit.value)?;
        } else {
            return Err(syn::Error::new_spanned(
                &nv.path,
                "unsupported argument; expected rename_all or deny_unknown_fields",
            ));
        }
    }

    Ok(parsed)
}

fn literal(nv: &MetaNameValue) -> syn::Result<Lit> {
    match &nv.value {
        Expr::Lit(expr) => Ok(expr.lit.clone()),
        other => Err(syn::Error::new_spanned(other, "expected a literal")),
    }
}

fn set_once<T>(slot: &mut Option<T>, nv: &MetaNameValue, value: T) -> syn::Result<()> {
    if slot.is_some() {
        return Err(syn::Error::new_spanned(nv.to_token_stream(), "duplicate argument"));
    }
    *slot = Some(value);
    Ok(())
}

struct SerdeInfo {
    rename_all: Option<LitStr>,
    deny_unknown_fields: bool,
}

impl SerdeInfo {
    fn collect(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut info = Self { rename_all: None, deny_unknown_fields: false };

        for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename_all") {
                    info.rename_all = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("deny_unknown_fields") {
                    info.deny_unknown_fields = true;
                } else if meta.input.peek(syn::Token![=]) {
                    let _: Expr = meta.value()?.parse()?;
                }
                Ok(())
            })?;
        }

        Ok(info)
    }
}

fn derive_attr(derives: &FxHashSet<String>) -> TokenStream {
    let mut tokens = Vec::new();
    if !derives.contains("Debug") {
        tokens.push(quote! { Debug });
    }
    if !derives.contains("Serialize") {
        tokens.push(quote! { ::serde::Serialize });
    }
    if !derives.contains("Deserialize") {
        tokens.push(quote! { ::serde::Deserialize });
    }
    if !derives.contains("ToSchema") {
        tokens.push(quote! { ::utoipa::ToSchema });
    }

    if tokens.is_empty() { quote! {} } else { quote! { #[derive(#(#tokens),*)] } }
}

fn rename_attr(
    requested: Option<LitStr>,
    serde: &SerdeInfo,
    is_struct: bool,
) -> syn::Result<TokenStream> {
    let requested = match requested {
        Some(lit) => Some(lit),
        None if is_struct => Some(LitStr::new("camelCase", proc_macro2::Span::call_site())),
        None => None,
    };

    match (&serde.rename_all, requested) {
        (Some(existing), Some(wanted)) if existing.value() != wanted.value() => {
            Err(syn::Error::new_spanned(
                existing,
                "conflicting serde rename_all; remove it or pass the same value to api_model",
            ))
        },
        (Some(_), _) | (None, None) => Ok(quote! {}),
        (None, Some(wanted)) => Ok(quote! { #[serde(rename_all = #wanted)] }),
    }
}

fn deny_unknown_attr(
    requested: Option<bool>,
    serde: &SerdeInfo,
    ident: &syn::Ident,
) -> syn::Result<TokenStream> {
    let deny = requested.unwrap_or(true);
    match (serde.deny_unknown_fields, deny) {
        (true, false) => Err(syn::Error::new_spanned(
            ident,
            "deny_unknown_fields is already set via serde; remove it before disabling",
        )),
        (true, true) | (false, false) => Ok(quote! {}),
        (false, true) => Ok(quote! { #[serde(deny_unknown_fields)] }),
    }
}
