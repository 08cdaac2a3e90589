//! `#[derive(Fault)]`.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    Attribute, Data, DeriveInput, Ident, LitInt, LitStr, Token,
    parse::{Parse, ParseStream},
    parse_macro_input,
};

/// Arguments of a `#[fault(...)]` attribute.
#[derive(Default)]
struct FaultArgs {
    code: Option<u16>,
    status: Option<String>,
}

impl Parse for FaultArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut args = FaultArgs::default();

        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            match ident.to_string().as_str() {
                "code" => {
                    let lit: LitInt = input.parse()?;
                    args.code = Some(lit.base10_parse()?);
                }
                "status" => {
                    let lit: LitStr = input.parse()?;
                    args.status = Some(lit.value());
                }
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown fault attribute: {}", other),
                    ));
                }
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(args)
    }
}

impl FaultArgs {
    fn from_attrs(attrs: &[Attribute]) -> syn::Result<Option<Self>> {
        let mut found = None;
        for attr in attrs.iter().filter(|attr| attr.path().is_ident("fault")) {
            if found.is_some() {
                return Err(syn::Error::new_spanned(attr, "duplicate #[fault] attribute"));
            }
            found = Some(attr.parse_args_with(FaultArgs::parse)?);
        }
        Ok(found)
    }

    /// Fill an unset code from the type-level default.
    ///
    /// The status is not inherited: a variant with its own attribute falls
    /// back to its name.
    fn with_default_code(self, default: Option<&FaultArgs>) -> Self {
        FaultArgs {
            code: self.code.or_else(|| default.and_then(|d| d.code)),
            status: self.status,
        }
    }
}

/// Implementation of `#[derive(Fault)]`.
pub fn derive_fault_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let type_args = FaultArgs::from_attrs(&input.attrs)?;

    let lookup = match &input.data {
        Data::Enum(data_enum) => {
            let arms = data_enum
                .variants
                .iter()
                .map(|variant| {
                    let variant_name = &variant.ident;
                    let args = match FaultArgs::from_attrs(&variant.attrs)? {
                        Some(args) => args.with_default_code(type_args.as_ref()),
                        None => FaultArgs {
                            code: type_args.as_ref().and_then(|d| d.code),
                            status: type_args.as_ref().and_then(|d| d.status.clone()),
                        },
                    };
                    let (code, status) = resolve(args, variant_name)?;
                    Ok(quote! {
                        #name::#variant_name { .. } => (#code, #status)
                    })
                })
                .collect::<syn::Result<Vec<_>>>()?;

            if arms.is_empty() {
                return Err(syn::Error::new_spanned(
                    input,
                    "#[derive(Fault)] needs at least one variant",
                ));
            }

            quote! {
                match &fault {
                    #(#arms),*
                }
            }
        }
        Data::Struct(_) => {
            let args = type_args.unwrap_or_default();
            let (code, status) = resolve(args, name)?;
            quote! { (#code, #status) }
        }
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                input,
                "#[derive(Fault)] can only be used on enums and structs",
            ));
        }
    };

    Ok(quote! {
        impl #impl_generics ::core::convert::From<#name #ty_generics> for ::scaffold::StructuredError
        #where_clause
        {
            fn from(fault: #name #ty_generics) -> Self {
                let (code, status): (u16, &'static str) = #lookup;
                ::scaffold::StructuredError::new(code, status)
                    .with_field("message", ::std::string::ToString::to_string(&fault))
            }
        }
    })
}

fn resolve(args: FaultArgs, ident: &Ident) -> syn::Result<(u16, String)> {
    let code = args.code.ok_or_else(|| {
        syn::Error::new(
            ident.span(),
            "missing fault code: add #[fault(code = N)] here or on the type",
        )
    })?;
    let status = args.status.unwrap_or_else(|| ident.to_string());
    Ok((code, status))
}
