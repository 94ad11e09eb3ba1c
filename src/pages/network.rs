use leptos::prelude::*;
use leptos_router::components::A;

use crate::components::force_graph::KnowledgeNetwork;

/// Whole knowledge base as one graph. Genre clicks fall through to the
/// component's default navigation into the filtered document list.
#[component]
pub fn NetworkPage() -> impl IntoView {
	view! {
		<div class="page">
			<header class="page-header">
				<A href="/document-list">"Knowledge Base"</A>
			</header>
			<main>
				<h2>"Knowledge Network"</h2>
				<p class="subtitle">
					"Relationships between knowledge articles. Click a node to open it."
				</p>
				<div class="graph-card">
					<KnowledgeNetwork />
				</div>
			</main>
		</div>
	}
}
