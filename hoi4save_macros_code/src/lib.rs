//! Implementation of the hoi4save derive macros.
//!
//! Lives outside the proc-macro crate so the expansion logic can be unit
//! tested against plain token streams.
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, Meta};

#[derive(Default)]
struct StructAttrs {
    internal: bool,
}

impl StructAttrs {
    fn path(&self) -> TokenStream {
        if self.internal {
            quote! { crate }
        } else {
            quote! { ::hoi4save }
        }
    }

    fn parse(attrs: &[Attribute]) -> StructAttrs {
        let mut ret = StructAttrs::default();
        attrs
            .iter()
            .filter_map(|attr| match &attr.meta {
                Meta::List(l) => Some(l),
                _ => None,
            })
            .filter(|list| list.path.is_ident("hoi4"))
            .for_each(|list| {
                list.parse_nested_meta(|meta| {
                    let s = meta.path.get_ident().expect("failed to get ident");
                    match s.to_string().as_str() {
                        "crate" => ret.internal = true,
                        other => panic!("invalid attr {other}"),
                    }
                    Ok(())
                })
                .expect("parse_nested_meta()");
            });
        ret
    }
}

#[derive(Default)]
struct FieldAttrs {
    rename: Option<String>,
    flatten: bool,
}

impl FieldAttrs {
    fn parse(attrs: &[Attribute]) -> FieldAttrs {
        let mut ret = FieldAttrs::default();
        attrs
            .iter()
            .filter_map(|attr| match &attr.meta {
                Meta::List(l) => Some(l),
                _ => None,
            })
            .filter(|list| list.path.is_ident("hoi4"))
            .for_each(|list| {
                list.parse_nested_meta(|meta| {
                    let s = meta.path.get_ident().expect("failed to get ident");
                    match s.to_string().as_str() {
                        "rename" => {
                            let value = meta.value()?;
                            let lit: syn::LitStr = value.parse()?;
                            ret.rename = Some(lit.value());
                        }
                        "flatten" => ret.flatten = true,
                        other => panic!("invalid attr {other}"),
                    }
                    Ok(())
                })
                .expect("parse_nested_meta()");
            });
        assert!(
            !(ret.flatten && ret.rename.is_some()),
            "flatten and rename cannot be combined"
        );
        ret
    }
}

struct ParsedField<'a> {
    field: &'a syn::Field,
    attrs: FieldAttrs,
}

struct Parsed<'a> {
    name: &'a syn::Ident,
    attrs: StructAttrs,
    generics: (
        syn::ImplGenerics<'a>,
        syn::TypeGenerics<'a>,
        Option<&'a syn::WhereClause>,
    ),
    fields: Vec<ParsedField<'a>>,
}

impl<'a> Parsed<'a> {
    fn parse(input: &'a DeriveInput) -> Self {
        let Data::Struct(data_struct) = &input.data else {
            panic!("can only use on struct");
        };
        let Fields::Named(fields_named) = &data_struct.fields else {
            panic!("fields is what? {:?}", data_struct.fields);
        };
        Self {
            name: &input.ident,
            attrs: StructAttrs::parse(&input.attrs),
            generics: input.generics.split_for_impl(),
            fields: fields_named
                .named
                .iter()
                .map(|field| ParsedField {
                    attrs: FieldAttrs::parse(&field.attrs),
                    field,
                })
                .collect(),
        }
    }

    #[must_use]
    fn expand_specs(&self, path: &TokenStream) -> Vec<TokenStream> {
        self.fields
            .iter()
            .map(|pf| {
                if pf.attrs.flatten {
                    let ty = &pf.field.ty;
                    quote! {
                        #path::record::FieldSpec::Embedded {
                            fields: <#ty as #path::record::Record>::fields,
                        }
                    }
                } else {
                    let name = match &pf.attrs.rename {
                        Some(name) => name.clone(),
                        None => pf.field.ident.as_ref().unwrap().to_string(),
                    };
                    quote! { #path::record::FieldSpec::Field { name: #name } }
                }
            })
            .collect()
    }

    #[must_use]
    fn expand_field_mut(&self, path: &TokenStream) -> Vec<TokenStream> {
        self.fields
            .iter()
            .enumerate()
            .map(|(index, pf)| {
                let ident = pf.field.ident.as_ref().unwrap();
                if pf.attrs.flatten {
                    quote! {
                        #index => #path::record::FieldMut::Embedded(&mut self.#ident)
                    }
                } else {
                    quote! {
                        #index => #path::record::FieldMut::Value(&mut self.#ident)
                    }
                }
            })
            .collect()
    }

    #[must_use]
    fn expand(&self) -> TokenStream {
        let name = self.name;
        let path = self.attrs.path();
        let (impl_generics, ty_generics, where_clause) = &self.generics;
        let specs = self.expand_specs(&path);
        let arms = self.expand_field_mut(&path);
        quote! {
            impl #impl_generics #path::de::Decode for #name #ty_generics #where_clause {
                fn decode(
                    &mut self,
                    dec: &mut #path::decoder::Decoder<'_, '_>,
                ) -> #path::Result<()> {
                    #path::record::decode_record(self, dec)
                }
            }
            impl #impl_generics #path::record::Record for #name #ty_generics #where_clause {
                fn fields() -> &'static [#path::record::FieldSpec] {
                    const FIELDS: &[#path::record::FieldSpec] = &[#(#specs),*];
                    FIELDS
                }
                fn field_mut(
                    &mut self,
                    index: usize,
                ) -> #path::record::FieldMut<'_> {
                    match index {
                        #(#arms,)*
                        _ => panic!("field index out of range"),
                    }
                }
            }
        }
    }
}

/// Backend function for the hoi4save_macros::Decode derive macro.
///
/// Use the macro, not this function.
#[must_use]
pub fn derive_decode(input: TokenStream) -> TokenStream {
    let input = syn::parse2::<DeriveInput>(input).unwrap();
    let parsed = Parsed::parse(&input);
    parsed.expand()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_baseline() {
        let input = quote! {
            struct Save {
                player: String,
                id: u64,
            }
        };
        let actual = derive_decode(input).to_string();
        assert!(actual.contains("Decode for Save"), "{actual}");
        assert!(actual.contains("Record for Save"), "{actual}");
        assert!(actual.contains("decode_record"), "{actual}");
        assert!(actual.contains("\"player\""), "{actual}");
        assert!(actual.contains("\"id\""), "{actual}");
        assert!(!actual.contains("Embedded"), "{actual}");
    }

    #[test]
    fn derive_empty_struct() {
        let input = quote! { struct Save {} };
        let actual = derive_decode(input);
        let expected = quote! {
            impl ::hoi4save::de::Decode for Save {
                fn decode(
                    &mut self,
                    dec: &mut ::hoi4save::decoder::Decoder<'_, '_>,
                ) -> ::hoi4save::Result<()> {
                    ::hoi4save::record::decode_record(self, dec)
                }
            }
            impl ::hoi4save::record::Record for Save {
                fn fields() -> &'static [::hoi4save::record::FieldSpec] {
                    const FIELDS: &[::hoi4save::record::FieldSpec] = &[];
                    FIELDS
                }
                fn field_mut(
                    &mut self,
                    index: usize,
                ) -> ::hoi4save::record::FieldMut<'_> {
                    match index {
                        _ => panic!("field index out of range"),
                    }
                }
            }
        };
        assert_eq!(actual.to_string(), expected.to_string());
    }

    #[test]
    fn derive_rename_and_flatten() {
        let input = quote! {
            struct Country {
                #[hoi4(rename = "country_leader")]
                leader: bool,
                #[hoi4(flatten)]
                common: Common,
            }
        };
        let actual = derive_decode(input).to_string();
        assert!(actual.contains("\"country_leader\""), "{actual}");
        assert!(!actual.contains("\"leader\""), "{actual}");
        assert!(
            actual.contains("< Common as :: hoi4save :: record :: Record > :: fields"),
            "{actual}"
        );
        assert!(actual.contains("FieldMut :: Embedded"), "{actual}");
    }

    #[test]
    fn derive_crate_paths() {
        let input = quote! {
            #[hoi4(crate)]
            struct Save {
                player: String,
            }
        };
        let actual = derive_decode(input).to_string();
        assert!(actual.contains("crate :: record :: decode_record"), "{actual}");
        assert!(!actual.contains("hoi4save"), "{actual}");
    }

    #[test]
    fn derive_bad_inputs() {
        for (name, q) in [
            ("enum", quote! { enum E { A } }),
            ("tuple struct", quote! { struct S(u32); }),
            ("unknown struct attr", quote! { #[hoi4(new)] struct S {} }),
            (
                "unknown field attr",
                quote! { struct S { #[hoi4(in)] x: u32 } },
            ),
            (
                "flatten with rename",
                quote! { struct S { #[hoi4(flatten, rename = "x")] x: Inner } },
            ),
        ] {
            let result = std::panic::catch_unwind(|| {
                let _ = derive_decode(q);
            });
            assert!(result.is_err(), "Expected {name} to panic. It didn't");
        }
    }
}
/* vim: textwidth=80
 */
