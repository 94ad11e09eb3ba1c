//! Leptos client-side app wiring and routes.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
mod api;
mod components;
mod config;
mod error;
mod pages;

// Top-Level pages
use crate::config::ApiConfig;
use crate::pages::document::DocumentPage;
use crate::pages::document_list::DocumentListPage;
use crate::pages::network::NetworkPage;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// The knowledge-base router: the graph pages, document detail and 404's.
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	let config = ApiConfig::default();
	info!("Using knowledge API at {}", config.base_url);
	provide_context(config);

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />

		// sets the document title
		<Title text="Knowledge Network" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=DocumentListPage />
				<Route path=path!("/document-list") view=DocumentListPage />
				<Route path=path!("/network") view=NetworkPage />
				<Route path=path!("/documents/:id") view=DocumentPage />
			</Routes>
		</Router>
	}
}
