use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_params_map;

/// Landing point for document clicks in the graph. The detail view itself
/// lives with the knowledge list screens.
#[component]
pub fn DocumentPage() -> impl IntoView {
	let params = use_params_map();
	let document_id = move || params.with(|p| p.get("id")).unwrap_or_default();

	view! {
		<div class="page">
			<A href="/document-list">"Back to the network"</A>
			<h2>{move || format!("Document #{}", document_id())}</h2>
		</div>
	}
}
