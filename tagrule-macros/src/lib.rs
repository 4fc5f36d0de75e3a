use proc_macro::TokenStream;
use proc_macro2::{Ident, TokenStream as TokenStream2, TokenTree};
use quote::{quote, ToTokens};
use syn::ext::IdentExt;
use syn::{
    parse_macro_input, parse_quote, Data, DeriveInput, Expr, ExprLit, Field, Lit, LitStr, Meta,
    Type,
};

const ATTR: &str = "validate_as";

// 只有 Option 字段才能做空值检查
const NIL_RULES: &[&str] = &["not_nil", "skip_nil"];

// 检测类型是否是 Option<T>
fn is_option(ty: &Type) -> bool {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident == "Option")
            .unwrap_or(false),
        Type::Group(group) => is_option(&group.elem),
        Type::Paren(paren) => is_option(&paren.elem),
        _ => false,
    }
}

/// 为结构体生成 `tagrule::Record` 和 `tagrule::AsFieldValue` 实现
///
/// 字段上的 `#[validate_as("rule1, rule2")]`（或 `#[validate_as = "..."]`）声明规则列表；
/// 未标注的字段不会被读取，也不要求实现 `AsFieldValue`。
#[proc_macro_derive(Record, attributes(validate_as))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let mut generics = input.generics.clone();
    let type_params: Vec<Ident> = generics.type_params().map(|p| p.ident.clone()).collect();

    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "#[derive(Record)] can only be used on structs",
            ))
        }
    };

    let mut entries = Vec::new();
    let mut bounded: Vec<&Ident> = Vec::new();
    for (index, field) in fields.iter().enumerate() {
        let (member, field_name) = match &field.ident {
            Some(ident) => (quote! { #ident }, ident.unraw().to_string()),
            None => {
                let index = syn::Index::from(index);
                let field_name = index.index.to_string();
                (quote! { #index }, field_name)
            }
        };

        match field_rules(field)? {
            Some(rules) => {
                check_nullable(field, &rules)?;
                for param in &type_params {
                    if !bounded.contains(&param) && mentions(field.ty.to_token_stream(), param) {
                        bounded.push(param);
                    }
                }
                entries.push(quote! {
                    ::tagrule::RecordField::new(
                        #field_name,
                        #rules,
                        ::tagrule::AsFieldValue::as_field_value(&self.#member)
                    )
                });
            }
            None => entries.push(quote! {
                ::tagrule::RecordField::opaque(#field_name)
            }),
        }
    }

    // 被标注字段用到的类型参数需要能转换为 FieldValue
    if !bounded.is_empty() {
        let where_clause = generics.make_where_clause();
        for param in bounded {
            where_clause
                .predicates
                .push(parse_quote! { #param: ::tagrule::AsFieldValue });
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::tagrule::Record for #name #ty_generics #where_clause {
            fn fields(&self) -> ::std::vec::Vec<::tagrule::RecordField<'_>> {
                ::std::vec![#(#entries),*]
            }
        }

        impl #impl_generics ::tagrule::AsFieldValue for #name #ty_generics #where_clause {
            fn as_field_value(&self) -> ::tagrule::FieldValue<'_> {
                ::tagrule::FieldValue::Record(self)
            }

            fn nil_value() -> ::tagrule::FieldValue<'static> {
                ::tagrule::FieldValue::OptionalRecord(::std::option::Option::None)
            }
        }
    })
}

fn mentions(tokens: TokenStream2, ident: &Ident) -> bool {
    tokens.into_iter().any(|tt| match tt {
        TokenTree::Ident(i) => i == *ident,
        TokenTree::Group(group) => mentions(group.stream(), ident),
        _ => false,
    })
}

// 读取字段上唯一的 validate_as 规则列表
fn field_rules(field: &Field) -> syn::Result<Option<LitStr>> {
    let mut rules: Option<LitStr> = None;

    for attr in &field.attrs {
        if !attr.path().is_ident(ATTR) {
            continue;
        }
        if rules.is_some() {
            return Err(syn::Error::new_spanned(
                attr,
                "duplicate #[validate_as] attribute, list all rules in one attribute",
            ));
        }

        let lit = match &attr.meta {
            Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(lit_str),
                    ..
                }) => lit_str.clone(),
                other => {
                    return Err(syn::Error::new_spanned(
                        other,
                        "expected a string literal, e.g. #[validate_as = \"rule1, rule2\"]",
                    ))
                }
            },
            _ => attr.parse_args::<LitStr>()?,
        };
        rules = Some(lit);
    }

    Ok(rules)
}

fn check_nullable(field: &Field, rules: &LitStr) -> syn::Result<()> {
    if is_option(&field.ty) {
        return Ok(());
    }

    let value = rules.value();
    match value
        .split(',')
        .map(str::trim)
        .find(|token| NIL_RULES.contains(token))
    {
        Some(token) => Err(syn::Error::new_spanned(
            &field.ty,
            format!("`{}` can only be used on `Option<_>` fields", token),
        )),
        None => Ok(()),
    }
}
