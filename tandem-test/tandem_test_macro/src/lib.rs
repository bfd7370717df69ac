/*
 * Copyright (c) 2024. Govcraft
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */

use proc_macro::TokenStream;

use quote::quote;
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{parse_macro_input, Expr, ExprLit, ItemFn, Lit, MetaNameValue, Token};

fn parse_timeout(attr: TokenStream) -> syn::Result<Option<u64>> {
    let options = Punctuated::<MetaNameValue, Token![,]>::parse_terminated.parse(attr)?;
    let mut timeout_ms = None;
    for option in options {
        if !option.path.is_ident("timeout_ms") {
            return Err(syn::Error::new_spanned(&option.path, "unknown option, expected `timeout_ms`"));
        }
        let Expr::Lit(ExprLit { lit: Lit::Int(value), .. }) = &option.value else {
            return Err(syn::Error::new_spanned(&option.value, "timeout_ms must be an integer"));
        };
        timeout_ms = Some(value.base10_parse::<u64>()?);
    }
    Ok(timeout_ms)
}

#[proc_macro_attribute]
pub fn tandem_test(attr: TokenStream, item: TokenStream) -> TokenStream {
    let timeout_ms = match parse_timeout(attr) {
        Ok(timeout_ms) => timeout_ms,
        Err(err) => return err.to_compile_error().into(),
    };

    let input = parse_macro_input!(item as ItemFn);
    let vis = &input.vis;
    let sig = &input.sig;
    let body = &input.block;
    let attrs = &input.attrs;
    let name = &sig.ident;
    let inputs = &sig.inputs;
    let output = &sig.output;

    if sig.asyncness.is_none() {
        return syn::Error::new_spanned(sig.fn_token, "tandem_test functions must be async")
            .to_compile_error()
            .into();
    }

    let async_name = syn::Ident::new(&format!("__{name}_async"), name.span());

    let drive = match timeout_ms {
        Some(ms) => quote! {
            match ::tandem_test::__private::tokio::time::timeout(
                ::std::time::Duration::from_millis(#ms),
                #async_name().instrument(test_span),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => panic!("test `{}` did not finish within {} ms", stringify!(#name), #ms),
            }
        },
        None => quote! {
            #async_name().instrument(test_span).await
        },
    };

    let output_tokens = quote! {
        #[test]
        #(#attrs)*
        #vis fn #name() #output {
            use ::std::sync::atomic::{AtomicBool, Ordering};
            use ::std::sync::Arc;
            use ::tandem_test::__private::tracing::Instrument;

            // Tasks spawned on a current-thread runtime run on this thread, so only
            // panics raised here belong to this test.
            let test_thread = ::std::thread::current().id();
            let panicked = Arc::new(AtomicBool::new(false));
            let panic_report = Arc::new(::tandem_test::__private::parking_lot::Mutex::new(None::<String>));
            {
                let panicked = Arc::clone(&panicked);
                let panic_report = Arc::clone(&panic_report);
                let previous_hook = ::std::panic::take_hook();
                ::std::panic::set_hook(Box::new(move |info| {
                    if ::std::thread::current().id() == test_thread {
                        panicked.store(true, Ordering::SeqCst);
                        let message = info
                            .payload()
                            .downcast_ref::<&str>()
                            .map(|s| (*s).to_string())
                            .or_else(|| info.payload().downcast_ref::<String>().cloned())
                            .unwrap_or_else(|| "No error message".to_string());
                        let location = info
                            .location()
                            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
                            .unwrap_or_else(|| "unknown location".to_string());
                        let report = format!("{location}: {}", message.trim().replace('\n', " "));
                        ::tandem_test::__private::tracing::error!("Panic at {}", report);
                        *panic_report.lock() = Some(report);
                    }
                    previous_hook(info);
                }));
            }

            let runtime = ::tandem_test::__private::tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to build the test runtime");

            let result = runtime.block_on(async {
                let test_span = ::tandem_test::__private::tracing::info_span!("tandem_test", name = stringify!(#name));
                #drive
            });
            drop(runtime);

            if panicked.load(Ordering::SeqCst) {
                let report = panic_report
                    .lock()
                    .clone()
                    .unwrap_or_else(|| "unknown panic".to_string());
                panic!("Panic at {}", report);
            }

            result
        }

        async fn #async_name(#inputs) #output #body
    };

    output_tokens.into()
}
