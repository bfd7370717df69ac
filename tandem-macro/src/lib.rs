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
#![forbid(unsafe_code)]

//! Tandem Macro Library
//!
//! Procedural macros for applications built on the Tandem agent framework.
//!
//! # Main Entry Point
//!
//! The [`tandem_main`] macro turns an `async fn main` into a synchronous entry
//! point that drives the body on a Tokio runtime:
//!
//! ```ignore
//! use tandem::prelude::*;
//!
//! #[tandem_main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = TandemApp::launch();
//!     // ... wire and start agents
//!     runtime.shutdown_all().await;
//!     Ok(())
//! }
//! ```

use proc_macro::TokenStream;

use quote::quote;
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{parse_macro_input, Expr, ExprLit, ItemFn, Lit, MetaNameValue, Token};

/// Runtime options parsed from `#[tandem_main(...)]`.
#[derive(Default)]
struct MainConfig {
    /// Use the multi-threaded scheduler instead of the default current-thread one.
    multi_thread: bool,
    /// Worker count for the multi-threaded scheduler.
    worker_threads: Option<usize>,
}

impl MainConfig {
    fn parse(attr: TokenStream) -> syn::Result<Self> {
        let mut config = Self::default();
        let options = Punctuated::<MetaNameValue, Token![,]>::parse_terminated.parse(attr)?;

        for option in options {
            let Expr::Lit(ExprLit { lit, .. }) = &option.value else {
                return Err(syn::Error::new_spanned(&option.value, "expected a literal value"));
            };
            if option.path.is_ident("flavor") {
                let Lit::Str(flavor) = lit else {
                    return Err(syn::Error::new_spanned(lit, "flavor must be a string"));
                };
                match flavor.value().as_str() {
                    "current_thread" => config.multi_thread = false,
                    "multi_thread" => config.multi_thread = true,
                    other => {
                        return Err(syn::Error::new_spanned(
                            flavor,
                            format!("unknown flavor `{other}`, expected `current_thread` or `multi_thread`"),
                        ));
                    }
                }
            } else if option.path.is_ident("worker_threads") {
                let Lit::Int(count) = lit else {
                    return Err(syn::Error::new_spanned(lit, "worker_threads must be an integer"));
                };
                config.worker_threads = Some(count.base10_parse()?);
                config.multi_thread = true;
            } else {
                return Err(syn::Error::new_spanned(
                    &option.path,
                    "unknown option, expected `flavor` or `worker_threads`",
                ));
            }
        }

        Ok(config)
    }
}

/// Entry point macro for Tandem applications.
///
/// Marks an `async fn main` as the program entry point and runs its body on a
/// Tokio runtime. Agents are cooperative tasks, so the default is a
/// current-thread runtime where every consume and behavior loop is multiplexed
/// on one scheduler.
///
/// # Configuration
///
/// - `flavor`: `"current_thread"` (default) or `"multi_thread"`
/// - `worker_threads`: number of workers; implies `"multi_thread"`
///
/// ```ignore
/// #[tandem_main(flavor = "multi_thread")]
/// async fn main() { }
///
/// #[tandem_main(worker_threads = 2)]
/// async fn main() { }
/// ```
#[proc_macro_attribute]
pub fn tandem_main(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);

    let config = match MainConfig::parse(attr) {
        Ok(config) => config,
        Err(err) => return err.to_compile_error().into(),
    };

    let attrs = &input.attrs;
    let vis = &input.vis;
    let sig = &input.sig;
    let body = &input.block;

    if sig.asyncness.is_none() {
        return syn::Error::new_spanned(
            sig.fn_token,
            "the async keyword is missing from the function declaration",
        )
        .to_compile_error()
        .into();
    }

    if sig.ident != "main" {
        return syn::Error::new_spanned(&sig.ident, "tandem_main can only be applied to the main function")
            .to_compile_error()
            .into();
    }

    let runtime_builder = match (config.multi_thread, config.worker_threads) {
        (true, Some(threads)) => quote! {
            ::tandem::prelude::tokio::runtime::Builder::new_multi_thread()
                .worker_threads(#threads)
        },
        (true, None) => quote! {
            ::tandem::prelude::tokio::runtime::Builder::new_multi_thread()
        },
        (false, _) => quote! {
            ::tandem::prelude::tokio::runtime::Builder::new_current_thread()
        },
    };

    let fn_name = &sig.ident;
    let fn_inputs = &sig.inputs;
    let fn_output = &sig.output;

    let expanded = quote! {
        #(#attrs)*
        #vis fn #fn_name(#fn_inputs) #fn_output {
            #runtime_builder
                .enable_all()
                .build()
                .expect("Failed to build Tandem runtime")
                .block_on(async #body)
        }
    };

    TokenStream::from(expanded)
}
